// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use legitscan::{Aggregator, ScannerConfig};
use legitscan_server::{logging, rest, SharedState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "legitscan",
    about = "legitscan: aggregate legitimacy evidence for a website or contract address",
    version,
    after_help = "Credentials are read from WHOIS_API_KEY, SAFE_BROWSING_API_KEY,\nETHERSCAN_API_KEY and GITHUB_TOKEN. Checks without a credential are skipped."
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Per-check time budget in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Include internal error detail in 500 responses
    #[arg(long, global = true)]
    dev: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the scan endpoint over HTTP (default)
    Serve {
        /// Listen address (host:port)
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Scan a single target and print the report as JSON
    Scan {
        /// Website URL or contract address
        target: String,
        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

fn scanner_config(cli: &Cli) -> ScannerConfig {
    let mut config = ScannerConfig::from_env();
    if let Some(ms) = cli.timeout_ms.filter(|ms| *ms > 0) {
        config = config.with_check_timeout(Duration::from_millis(ms));
    }
    if cli.dev {
        config = config.with_development_mode(true);
    }
    config
}

async fn run_scan(aggregator: &Aggregator, target: &str, pretty: bool) -> Result<()> {
    let scan = aggregator.scan(target).await?;
    let out = if pretty {
        serde_json::to_string_pretty(&scan.report)
    } else {
        serde_json::to_string(&scan.report)
    }
    .context("failed to serialize report")?;
    println!("{out}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "legitscan", &mut std::io::stdout());
        return Ok(());
    }

    logging::init(&cli.log_level, cli.log_json);
    let aggregator = Aggregator::new(scanner_config(&cli));
    tracing::info!("starting legitscan v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        None => rest::start(default_bind(), Arc::new(SharedState::new(aggregator))).await,
        Some(Commands::Serve { bind }) => {
            rest::start(bind, Arc::new(SharedState::new(aggregator))).await
        }
        Some(Commands::Scan { target, pretty }) => run_scan(&aggregator, &target, pretty).await,
        Some(Commands::Completions { .. }) => Ok(()),
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        println!("{}", serde_json::json!({ "error": format!("{e:#}") }));
        std::process::exit(1);
    }

    result
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}
