//! # Terminal Event Loop
//!
//! Drives the checkout from operator input lines and scanner events, and
//! re-renders the screen after each one.
//!
//! ## Event Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Event Loop                                      │
//! │                                                                         │
//! │   stdin lines ────────────┐                                             │
//! │   ("scan", "add", digits) │                                             │
//! │                           ▼                                             │
//! │   scanner events ───► tokio::select! ───► commands::* ───► render      │
//! │   (decoded code,          ▲                                             │
//! │    start failure)         │                                             │
//! │                           │                                             │
//! │   scanner toggle ─────────┘  open  ──► Scanner::spawn(...)             │
//! │   (watch<bool>)              close ──► ScannerHandle::stop()           │
//! │                                                                         │
//! │   Ctrl-C / EOF / "quit" ──► stop scanner, exit                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use scanpos_scanner::{
    CameraBackend, FrameDecoder, Scanner, ScannerHandle, ScannerOptions, ScannerStatus,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::commands;
use crate::error::ApiError;
use crate::state::AppState;
use crate::view::view;

/// Operator help, printed by `help`.
pub const HELP: &str = "\
Commands:
  scan            open the camera scanner
  close           close the camera scanner
  <digits>        look up a barcode typed by hand
  add             add the displayed product to the cart
  buy | purchase  purchase the cart
  ok              dismiss the purchase popup
  clear           empty the cart
  help            show this help
  quit | exit     leave
";

// =============================================================================
// Commands
// =============================================================================

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan,
    Close,
    Add,
    Purchase,
    Ok,
    Clear,
    Help,
    Quit,
    /// Anything else is manual barcode entry.
    Entry(String),
}

impl Command {
    /// Parses an input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let command = match line.to_ascii_lowercase().as_str() {
            "scan" => Command::Scan,
            "close" => Command::Close,
            "add" => Command::Add,
            "buy" | "purchase" => Command::Purchase,
            "ok" => Command::Ok,
            "clear" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Entry(line.to_string()),
        };
        Some(command)
    }
}

/// Screen output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable screen.
    #[default]
    Text,
    /// One JSON view model per line.
    Json,
}

/// Events produced by the scanner task.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScannerEvent {
    Decoded(String),
    Failed(String),
}

// =============================================================================
// App
// =============================================================================

/// The interactive checkout terminal.
pub struct App {
    state: AppState,
    camera: Arc<dyn CameraBackend>,
    decoder: Arc<dyn FrameDecoder>,
    options: ScannerOptions,
    format: OutputFormat,
    events_tx: mpsc::UnboundedSender<ScannerEvent>,
    events_rx: mpsc::UnboundedReceiver<ScannerEvent>,
    scanner: Option<ScannerHandle>,
}

impl App {
    pub fn new(
        state: AppState,
        camera: Arc<dyn CameraBackend>,
        decoder: Arc<dyn FrameDecoder>,
        options: ScannerOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        App {
            state,
            camera,
            decoder,
            options,
            format: OutputFormat::default(),
            events_tx,
            events_rx,
            scanner: None,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Runs until `quit`, end of input, or Ctrl-C.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut open_rx = self.state.scanner.subscribe();

        self.render(output).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => {
                        if !self.handle_line(&line, output).await? {
                            break;
                        }
                    }
                    None => {
                        debug!("End of input");
                        break;
                    }
                },

                Some(event) = self.events_rx.recv() => self.handle_scanner_event(event).await,

                changed = open_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let open = *open_rx.borrow_and_update();
                    self.sync_scanner(open).await;
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
            }

            self.render(output).await?;
        }

        self.state.scanner.close();
        self.sync_scanner(false).await;
        Ok(())
    }

    /// Handles one input line. Returns `false` to quit.
    async fn handle_line<W>(&mut self, line: &str, output: &mut W) -> std::io::Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        let Some(command) = Command::parse(line) else {
            return Ok(true);
        };
        debug!(?command, "Operator command");

        match command {
            Command::Scan => commands::open_scanner(&self.state),
            Command::Close => commands::close_scanner(&self.state),
            Command::Add => {
                if !commands::add_to_cart(&self.state) {
                    output.write_all(b"Add is disabled: no product loaded\n").await?;
                }
            }
            Command::Purchase => {
                if self.state.checkout.with(|c| c.can_purchase()) {
                    log_failure("purchase", commands::submit_purchase(&self.state).await);
                } else {
                    output.write_all(b"Purchase is disabled: the cart is empty\n").await?;
                }
            }
            Command::Ok => commands::close_popup(&self.state),
            Command::Clear => commands::clear_cart(&self.state),
            Command::Help => output.write_all(HELP.as_bytes()).await?,
            Command::Quit => return Ok(false),
            Command::Entry(text) => {
                commands::manual_input_changed(&self.state, &text);
                log_failure("entry", commands::submit_manual_entry(&self.state).await);
            }
        }
        Ok(true)
    }

    async fn handle_scanner_event(&mut self, event: ScannerEvent) {
        match event {
            ScannerEvent::Decoded(code) => {
                if let Some(result) = commands::handle_decoded(&self.state, &code).await {
                    log_failure("decoded", result);
                }
            }
            ScannerEvent::Failed(message) => commands::scanner_failed(&self.state, &message),
        }
    }

    /// Starts or stops the scanner task to match the toggle.
    async fn sync_scanner(&mut self, open: bool) {
        match (open, self.scanner.take()) {
            (true, None) => self.scanner = Some(self.start_scanner()),
            (true, Some(handle)) => self.scanner = Some(handle),
            (false, Some(handle)) => {
                debug!("Stopping scanner");
                handle.stop().await;
            }
            (false, None) => {}
        }
    }

    fn start_scanner(&self) -> ScannerHandle {
        let decoded_tx = self.events_tx.clone();
        let handle = Scanner::spawn(
            self.camera.clone(),
            self.decoder.clone(),
            self.options.clone(),
            move |code| {
                let _ = decoded_tx.send(ScannerEvent::Decoded(code));
            },
        );

        let failed_tx = self.events_tx.clone();
        let mut status_rx = handle.subscribe();
        tokio::spawn(async move {
            while status_rx.changed().await.is_ok() {
                let status = status_rx.borrow_and_update().clone();
                if let ScannerStatus::Error(message) = &status {
                    let _ = failed_tx.send(ScannerEvent::Failed(message.clone()));
                }
                if status.is_terminal() {
                    break;
                }
            }
        });

        handle
    }

    async fn render<W>(&self, output: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let vm = view(&self.state);
        let text = match self.format {
            OutputFormat::Text => format!("\n{}", vm.render()),
            OutputFormat::Json => match serde_json::to_string(&vm) {
                Ok(json) => format!("{}\n", json),
                Err(e) => {
                    warn!(error = %e, "Could not serialize view");
                    return Ok(());
                }
            },
        };
        output.write_all(text.as_bytes()).await?;
        output.flush().await
    }
}

/// Logs a failed command. The banner already shows it to the operator.
fn log_failure<T>(command: &str, result: Result<T, ApiError>) -> Option<ApiError> {
    let err = result.err()?;
    debug!(command, code = ?err.code, error = %err, "Command failed");
    Some(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::FakeBackend;
    use crate::error::ErrorCode;
    use crate::state::TerminalConfig;
    use scanpos_scanner::{FrameStyle, ScriptedCamera, TextFrameDecoder, ZxingDecoder};
    use std::time::Duration;

    fn app_with_camera(camera: ScriptedCamera) -> App {
        let state = AppState::new(Arc::new(FakeBackend::new()), &TerminalConfig::default());
        App::new(
            state,
            Arc::new(camera),
            Arc::new(TextFrameDecoder),
            ScannerOptions::default(),
        )
    }

    fn no_camera() -> ScriptedCamera {
        ScriptedCamera::new(Vec::new(), Duration::from_millis(10)).with_devices(Vec::new())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  "), None);
        assert_eq!(Command::parse("SCAN"), Some(Command::Scan));
        assert_eq!(Command::parse("buy"), Some(Command::Purchase));
        assert_eq!(Command::parse("purchase"), Some(Command::Purchase));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
        assert_eq!(
            Command::parse(" 4901-2345 "),
            Some(Command::Entry("4901-2345".into()))
        );
    }

    #[tokio::test]
    async fn test_manual_checkout_session() {
        let mut app = app_with_camera(no_camera());
        let input: &[u8] = b"buy\n4901234567054\nadd\n4902102072618\nadd\nbuy\nok\nquit\nadd\n";
        let mut output = Vec::new();

        app.run(input, &mut output).await.unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.contains("Purchase is disabled: the cart is empty"));
        assert!(text.contains("Green Tea x1 150円 150円"));
        assert!(text.contains("Total: 1,485円"));
        // Input after "quit" is not processed.
        assert!(!text.contains("Add is disabled"));

        let checkout = app.state().checkout.snapshot();
        assert!(checkout.cart.is_empty());
        assert!(checkout.popup.is_none());
    }

    #[test]
    fn test_log_failure_passes_error_through() {
        assert_eq!(log_failure("entry", Ok::<_, ApiError>(())), None);

        let err = log_failure::<()>("purchase", Err(ApiError::unexpected("boom"))).unwrap();
        assert_eq!(err.code, ErrorCode::Unexpected);
    }

    #[tokio::test]
    async fn test_failed_entry_keeps_session_running() {
        let mut app = app_with_camera(no_camera());
        let input: &[u8] = b"12ab\n999\n4901234567054\n";
        let mut output = Vec::new();

        app.run(input, &mut output).await.unwrap();
        let checkout = app.state().checkout.snapshot();
        assert_eq!(checkout.product.unwrap().name, "Green Tea");
        assert!(checkout.error.is_none());
    }

    #[tokio::test]
    async fn test_json_output() {
        let mut app = app_with_camera(no_camera()).with_format(OutputFormat::Json);
        let input: &[u8] = b"4901234567054\n";
        let mut output = Vec::new();

        app.run(input, &mut output).await.unwrap();
        let text = String::from_utf8(output).unwrap();
        let last: serde_json::Value =
            serde_json::from_str(text.lines().last().unwrap()).unwrap();
        assert_eq!(last["name"], "Green Tea");
        assert_eq!(last["price"], "150円");
        assert_eq!(last["can_add"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scanned_code_loads_product() {
        let camera = ScriptedCamera::new(
            vec![String::new(), "4901234567054".into()],
            Duration::from_millis(10),
        );
        let mut app = app_with_camera(camera);
        let (mut input_tx, input_rx) = tokio::io::duplex(256);

        let session = tokio::spawn(async move {
            let mut output = Vec::new();
            app.run(tokio::io::BufReader::new(input_rx), &mut output)
                .await
                .unwrap();
            (app, output)
        });

        input_tx.write_all(b"scan\n").await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        input_tx.write_all(b"quit\n").await.unwrap();

        let (app, output) = session.await.unwrap();
        let checkout = app.state().checkout.snapshot();
        assert_eq!(checkout.product.unwrap().name, "Green Tea");
        assert!(!app.state().scanner.is_open());
        assert!(String::from_utf8(output).unwrap().contains("[ Scanner open ]"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rendered_barcode_loads_product() {
        let camera = ScriptedCamera::new(
            vec![String::new(), "4901234567054".into()],
            Duration::from_millis(10),
        )
        .with_style(FrameStyle::Rendered);
        let state = AppState::new(Arc::new(FakeBackend::new()), &TerminalConfig::default());
        let mut app = App::new(
            state,
            Arc::new(camera),
            Arc::new(ZxingDecoder::new()),
            ScannerOptions::default(),
        );
        let (mut input_tx, input_rx) = tokio::io::duplex(256);

        let session = tokio::spawn(async move {
            let mut output = Vec::new();
            app.run(tokio::io::BufReader::new(input_rx), &mut output)
                .await
                .unwrap();
            app
        });

        input_tx.write_all(b"scan\n").await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        input_tx.write_all(b"quit\n").await.unwrap();

        let app = session.await.unwrap();
        let checkout = app.state().checkout.snapshot();
        assert_eq!(checkout.product.unwrap().name, "Green Tea");
        assert!(!app.state().scanner.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_camera_is_reported() {
        let mut app = app_with_camera(no_camera());
        let (mut input_tx, input_rx) = tokio::io::duplex(256);

        let session = tokio::spawn(async move {
            let mut output = Vec::new();
            app.run(tokio::io::BufReader::new(input_rx), &mut output)
                .await
                .unwrap();
            (app, output)
        });

        input_tx.write_all(b"scan\n").await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        input_tx.write_all(b"quit\n").await.unwrap();

        let (app, output) = session.await.unwrap();
        assert_eq!(
            app.state().checkout.snapshot().scanner_error.as_deref(),
            Some("No camera found")
        );
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("! Scanner: No camera found"));
    }
}
