//! Zoltar - Kick chat relay for the Unreal fortune teller
//!
//! Main entry point: loads `.env`, resolves configuration, starts the server.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use zoltar_config::RelayConfig;
use zoltar_server::{AppState, Server};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Zoltar - Kick chat relay for the Unreal fortune teller
///
/// Required environment: KICK_CLIENT_ID, KICK_CLIENT_SECRET, REDIRECT_URI.
#[derive(Parser)]
#[command(name = "zoltar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Port to listen on (overrides AUTH_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory for pkce.json, tokens.json and logs (overrides ZOLTAR_DATA_DIR)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Chat phrase that triggers a prediction (overrides ZOLTAR_TRIGGER)
    #[arg(long)]
    pub trigger: Option<String>,

    /// Outbound HTTP timeout in seconds (overrides ZOLTAR_HTTP_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub http_timeout: Option<u64>,

    /// Load variables from this file instead of ./.env
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
        }
        None => {
            // A missing .env is fine; the process environment may be complete.
            dotenvy::dotenv().ok();
        }
    }

    let config = apply_overrides(
        RelayConfig::from_env().context("invalid configuration")?,
        &cli,
    );

    let _guard = init_tracing(cli.verbose, &config.data_dir);

    info!(
        port = config.port,
        trigger = %config.trigger,
        redirect_uri = %config.kick.redirect_uri,
        "Zoltar relay starting"
    );

    let state = AppState::from_relay_config(&config)?;
    let server = Server::new(state);

    println!("Zoltar relay listening on http://{}", server.bind_address());
    println!("Authorize at http://localhost:{}/auth/start", config.port);
    println!("Press Ctrl+C to stop");

    server.run_with_shutdown(shutdown_signal()).await?;

    info!("Zoltar relay stopped");
    Ok(())
}

/// Command-line flags win over the environment.
fn apply_overrides(mut config: RelayConfig, cli: &Cli) -> RelayConfig {
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(trigger) = &cli.trigger {
        config = config.with_trigger(trigger);
    }
    if let Some(secs) = cli.http_timeout {
        config = config.with_http_timeout(Duration::from_secs(secs));
    }
    config
}

/// Console (human-readable) plus a daily JSON file under `<data_dir>/logs`.
fn init_tracing(verbose: bool, data_dir: &Path) -> WorkerGuard {
    let filter = if verbose {
        "zoltar=debug,zoltar_server=debug,zoltar_oauth=debug,zoltar_webhook=debug,zoltar_config=debug,tower_http=debug,info"
    } else {
        "zoltar=info,zoltar_server=info,zoltar_oauth=info,zoltar_webhook=info,warn"
    };

    let file_appender = tracing_appender::rolling::daily(data_dir.join("logs"), "zoltar.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "zoltar=trace,zoltar_server=trace,zoltar_oauth=trace,zoltar_webhook=trace,zoltar_config=trace,info",
                )),
        )
        .init();

    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use zoltar_config::KickConfig;

    fn base() -> RelayConfig {
        RelayConfig::new(KickConfig::new("id", "secret", "http://localhost/cb"))
    }

    #[test]
    fn test_no_flags_keep_environment() {
        let cli = Cli::try_parse_from(["zoltar"]).unwrap();
        let config = apply_overrides(base().with_port(4000), &cli);

        assert_eq!(config.port, 4000);
        assert_eq!(config.trigger, zoltar_config::DEFAULT_TRIGGER);
        assert_eq!(config.http_timeout, zoltar_config::DEFAULT_HTTP_TIMEOUT);
    }

    #[test]
    fn test_flags_override_environment() {
        let cli = Cli::try_parse_from([
            "zoltar",
            "--port",
            "8081",
            "--data-dir",
            "/var/lib/zoltar",
            "--trigger",
            "!fortune",
            "--http-timeout",
            "3",
        ])
        .unwrap();
        let config = apply_overrides(base(), &cli);

        assert_eq!(config.port, 8081);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/zoltar"));
        assert_eq!(config.trigger, "!fortune");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_zero_timeout_flag_rejected() {
        assert!(Cli::try_parse_from(["zoltar", "--http-timeout", "0"]).is_err());
    }
}
