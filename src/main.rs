use std::path::PathBuf;

use clap::Parser;
use dialoguer::Password;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ad_noexpire_audit::category::AccountCategory;
use ad_noexpire_audit::config::AuditConfig;
use ad_noexpire_audit::enumerator::AuditClient;
use ad_noexpire_audit::error::{AuditError, AuditResult};
use ad_noexpire_audit::namespace::SearchNamespace;
use ad_noexpire_audit::report;

/// Report directory accounts whose password never expires.
#[derive(Parser, Debug)]
#[command(name = "ad-noexpire-audit", version, about)]
struct Cli {
    /// Directory server hostname or IP address
    #[arg(short, long)]
    server: String,

    /// Domain name (e.g. corp.example.com) or search base DN
    #[arg(short, long)]
    domain: String,

    /// DN or UPN of the bind account
    #[arg(short = 'u', long)]
    bind_dn: String,

    /// Bind password; prompted for when omitted
    #[arg(short, long)]
    password: Option<String>,

    /// Audit user accounts only
    #[arg(long)]
    users: bool,

    /// Audit computer accounts only
    #[arg(long)]
    computers: bool,

    /// Connect over LDAPS
    #[arg(long)]
    ldaps: bool,

    /// Directory server port; defaults to 389, or 636 with --ldaps
    #[arg(long)]
    port: Option<u16>,

    /// Entries requested per page of search results
    #[arg(long, default_value_t = 1000)]
    page_size: u32,

    /// Output CSV path; defaults to a timestamped file in the working
    /// directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

async fn run(cli: Cli) -> AuditResult<()> {
    let namespace = SearchNamespace::resolve(&cli.domain)?;

    let password = match cli.password {
        Some(p) => p,
        None => Password::new()
            .with_prompt(format!("Password for {}", cli.bind_dn))
            .interact()
            .map_err(|e| AuditError::invalid_input(format!("failed to read password: {}", e)))?,
    };

    let mut config = AuditConfig::new(cli.server, cli.bind_dn)
        .with_password(password)
        .with_page_size(cli.page_size);
    if cli.ldaps {
        config = config.with_ldaps();
    }
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }

    let mut client = AuditClient::connect(config).await?;

    let categories = AccountCategory::selected(cli.users, cli.computers);
    let mut batches = Vec::new();
    let mut last_error = None;
    for category in &categories {
        match client.enumerate(&namespace, *category).await {
            Ok(records) => {
                info!(category = category.label(), count = records.len(), "category audited");
                batches.push(records);
            }
            Err(e) => {
                warn!(category = category.label(), error = %e, "category failed");
                last_error = Some(e);
            }
        }
    }
    client.close().await;

    if batches.is_empty() {
        if let Some(e) = last_error {
            return Err(e);
        }
    }

    let records = report::assemble(batches);
    let path = cli.output.unwrap_or_else(report::default_output_path);
    report::write_csv_file(&path, &records)?;
    info!(rows = records.len(), path = %path.display(), "report written");
    println!("{} accounts written to {}", records.len(), path.display());

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
