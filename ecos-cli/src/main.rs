//! ECoS CLI — entry point.
//!
//! ```text
//! ecos status                     Show GO / STOP
//! ecos --train 1004 speed 40      Set a train's speed
//! ecos roster --json              List locomotives as JSON
//! ecos --config <path> ...        Use a custom config TOML
//! ecos --gen-config               Dump default config and exit
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ecos_cli::command::Action;
use ecos_cli::config::CliConfig;
use ecos_cli::display::TerminalSink;
use ecos_cli::session::ConsoleSession;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ecos", about = "Drive an ECoS model-railway command station")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "ecos.toml")]
    config: PathBuf,

    /// Console host (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Console port (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Train object id (overrides config).
    #[arg(short, long)]
    train: Option<u32>,

    /// Fail on unreadable replies instead of showing a default value.
    #[arg(long)]
    strict: bool,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    #[command(subcommand)]
    action: Option<Action>,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&CliConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let Some(action) = cli.action else {
        return Err("no command given; see --help".into());
    };

    let mut config = CliConfig::load(&cli.config)
        .map_err(|e| format!("invalid config {}: {e}", cli.config.display()))?;
    if let Some(host) = cli.host {
        config.console.host = host;
    }
    if let Some(port) = cli.port {
        config.console.port = port;
    }
    if let Some(train) = cli.train {
        config.console.train_id = train;
    }

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("ecos v{}", env!("CARGO_PKG_VERSION"));

    let mut session = ConsoleSession::connect(&config.console, cli.strict).await?;
    let result = session.run(action, &TerminalSink).await;

    if let Err(e) = session.close().await {
        warn!("close failed: {e}");
    }

    if let Some(text) = result?.render()? {
        println!("{text}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_parse() {
        let cli = Cli::try_parse_from(["ecos", "--host", "ecos.local", "-t", "1004", "speed", "40"])
            .unwrap();
        assert_eq!(cli.host.as_deref(), Some("ecos.local"));
        assert_eq!(cli.train, Some(1004));
        assert_eq!(cli.action, Some(Action::Speed { value: Some(40) }));
    }

    #[test]
    fn gen_config_needs_no_command() {
        let cli = Cli::try_parse_from(["ecos", "--gen-config"]).unwrap();
        assert!(cli.gen_config);
        assert!(cli.action.is_none());
    }
}
