//! # Scan POS Terminal
//!
//! The checkout screen: barcode lookup, cart, purchase. Runs in a terminal,
//! reading operator commands from stdin and camera codes from the scanner.
//!
//! ## Module Organization
//! ```text
//! scanpos_terminal/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── app.rs          ◄─── Event loop, input parsing, scanner lifecycle
//! ├── view.rs         ◄─── View model and text rendering
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── checkout.rs ◄─── Product, cart, popup, error banner
//! │   ├── scanner.rs  ◄─── Debounced scanner open/close
//! │   └── config.rs   ◄─── TerminalConfig (file + env)
//! ├── commands/
//! │   ├── product.rs  ◄─── lookup_product, manual entry
//! │   ├── cart.rs     ◄─── add_to_cart, clear_cart
//! │   ├── sale.rs     ◄─── submit_purchase, close_popup
//! │   └── scanner.rs  ◄─── open/close scanner, decoded codes
//! └── error.rs        ◄─── Error → banner message mapping
//! ```

pub mod app;
pub mod commands;
pub mod error;
pub mod state;
pub mod view;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use scanpos_client::{ClientConfig, HttpBackend};
use scanpos_scanner::ScriptedCamera;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use app::{App, OutputFormat, HELP};
use state::{AppState, TerminalConfig};

/// Command-line options.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    format: OutputFormat,
    help: bool,
}

impl Args {
    fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().context("--config requires a path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--json" => parsed.format = OutputFormat::Json,
                "--help" | "-h" => parsed.help = true,
                other => bail!("unknown argument: {}", other),
            }
        }
        Ok(parsed)
    }
}

/// Runs the terminal.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Terminal Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging (stderr, RUST_LOG or default filter)            │
/// │  2. Parse arguments (--config <path>, --json)                          │
/// │  3. Load TerminalConfig (defaults → file → SCANPOS_* env)              │
/// │  4. Build HttpBackend (base URL, timeout)                              │
/// │  5. Build camera (scripted from scanner.script_path, else none)        │
/// │  6. Run the event loop on stdin/stdout                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("Usage: scanpos [--config <path>] [--json]\n\n{}", HELP);
        return Ok(());
    }

    let config = TerminalConfig::load(args.config).context("loading configuration")?;
    info!(
        terminal_id = %config.terminal.id,
        name = %config.terminal.name,
        api = %config.api.base_url,
        "Starting Scan POS terminal"
    );

    let backend = HttpBackend::new(
        ClientConfig::new(config.api.base_url.clone()).with_timeout(config.request_timeout()),
    )
    .context("building backend client")?;

    let camera = match &config.scanner.script_path {
        Some(path) => ScriptedCamera::from_file(path, config.frame_interval())
            .await
            .with_context(|| format!("loading scan script {}", path.display()))?
            .with_style(config.frame_style()),
        None => {
            info!("No scan script configured, camera scanning unavailable");
            ScriptedCamera::new(Vec::new(), config.frame_interval()).with_devices(Vec::new())
        }
    };

    let state = AppState::new(Arc::new(backend), &config);
    let mut app = App::new(
        state,
        Arc::new(camera),
        config.frame_decoder(),
        config.scanner_options(),
    )
    .with_format(args.format);

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    app.run(input, &mut output)
        .instrument(info_span!("terminal", id = %config.terminal.id))
        .await?;

    info!("Terminal stopped");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr; stdout carries the screen.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=scanpos_client=trace` - Trace one crate only
/// - Default: `info,scanpos=debug,reqwest=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scanpos=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> anyhow::Result<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(args(&[]).unwrap(), Args::default());

        let parsed = args(&["--config", "/etc/scanpos.toml", "--json"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("/etc/scanpos.toml")));
        assert_eq!(parsed.format, OutputFormat::Json);

        assert!(args(&["--config"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }
}
