//! # Scanner Adapter
//!
//! Spawns the decode loop and exposes a handle to observe and stop it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Uninitialized ──spawn──► Starting ──camera open──► Streaming           │
//! │                              │                         │    │           │
//! │                              │ no camera /             │    │ stop()    │
//! │                              │ open failed             │    ▼           │
//! │                              ▼                         │  Stopped       │
//! │                            Error ◄──stream failure─────┘                │
//! │                                                                         │
//! │  After stop() the callback is never invoked again, even if a frame     │
//! │  was already being decoded.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::backend::{CameraBackend, DecodeError, FrameDecoder, VideoStream};
use crate::device::{select_camera, DEFAULT_BACK_CAMERA_KEYWORDS};
use crate::error::{ScannerError, ScannerResult};

// =============================================================================
// Status
// =============================================================================

/// Scanner lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScannerStatus {
    #[default]
    Uninitialized,
    /// Enumerating and opening the camera.
    Starting,
    /// Decoding frames.
    Streaming,
    /// Start-up or stream failure; the message is shown to the operator.
    Error(String),
    /// Stopped by the owner or the stream ended.
    Stopped,
}

impl ScannerStatus {
    /// True once the scanner will not deliver any more codes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScannerStatus::Error(_) | ScannerStatus::Stopped)
    }
}

impl std::fmt::Display for ScannerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScannerStatus::Uninitialized => write!(f, "uninitialized"),
            ScannerStatus::Starting => write!(f, "starting"),
            ScannerStatus::Streaming => write!(f, "streaming"),
            ScannerStatus::Error(msg) => write!(f, "error: {}", msg),
            ScannerStatus::Stopped => write!(f, "stopped"),
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Scanner start-up options.
#[derive(Debug, Clone)]
pub struct ScannerOptions {
    /// Label substrings marking a rear camera.
    pub back_camera_keywords: Vec<String>,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        ScannerOptions {
            back_camera_keywords: DEFAULT_BACK_CAMERA_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Handle to a running scanner.
///
/// Dropping the handle stops the scanner without waiting for cleanup.
pub struct ScannerHandle {
    status_rx: watch::Receiver<ScannerStatus>,
    shutdown_tx: mpsc::Sender<()>,
    active: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl ScannerHandle {
    /// Returns the current status.
    pub fn status(&self) -> ScannerStatus {
        self.status_rx.borrow().clone()
    }

    /// Returns a receiver that observes status changes.
    pub fn subscribe(&self) -> watch::Receiver<ScannerStatus> {
        self.status_rx.clone()
    }

    /// Stops decoding and releases the camera.
    ///
    /// Callbacks stop immediately. Cleanup errors are logged, never returned.
    pub async fn stop(mut self) {
        self.active.store(false, Ordering::SeqCst);
        let _ = self.shutdown_tx.try_send(());

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(?e, "Scanner task did not finish cleanly");
            }
        }
    }
}

impl Drop for ScannerHandle {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        let _ = self.shutdown_tx.try_send(());
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// Camera scanner: one decode loop per spawn.
///
/// ## Usage
/// ```rust,ignore
/// let handle = Scanner::spawn(camera, decoder, ScannerOptions::default(), move |code| {
///     let _ = tx.send(code);
/// });
/// // ...
/// handle.stop().await;
/// ```
pub struct Scanner<F> {
    camera: Arc<dyn CameraBackend>,
    decoder: Arc<dyn FrameDecoder>,
    options: ScannerOptions,
    on_decode: F,
    active: Arc<AtomicBool>,
    status_tx: watch::Sender<ScannerStatus>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<F> Scanner<F>
where
    F: Fn(String) + Send + Sync + 'static,
{
    /// Starts the scanner on a background task.
    ///
    /// `on_decode` is invoked exactly once for every frame in which a code was
    /// decoded, until the handle is stopped or dropped.
    pub fn spawn(
        camera: Arc<dyn CameraBackend>,
        decoder: Arc<dyn FrameDecoder>,
        options: ScannerOptions,
        on_decode: F,
    ) -> ScannerHandle {
        let (status_tx, status_rx) = watch::channel(ScannerStatus::Uninitialized);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let active = Arc::new(AtomicBool::new(true));

        let scanner = Scanner {
            camera,
            decoder,
            options,
            on_decode,
            active: active.clone(),
            status_tx,
            shutdown_rx,
        };

        let task = tokio::spawn(scanner.run());

        ScannerHandle {
            status_rx,
            shutdown_tx,
            active,
            task: Some(task),
        }
    }

    fn set_status(&self, status: ScannerStatus) {
        debug!(%status, "Scanner status");
        self.status_tx.send_replace(status);
    }

    fn fail(&self, message: String) {
        error!(error = %message, "Scanner failed");
        self.set_status(ScannerStatus::Error(message));
    }

    /// Main decode loop.
    async fn run(mut self) {
        self.set_status(ScannerStatus::Starting);

        let devices = match self.camera.enumerate_devices().await {
            Ok(devices) => devices,
            Err(e) => return self.fail(e.to_string()),
        };

        let device = match select_camera(&devices, &self.options.back_camera_keywords) {
            Ok(device) => device.clone(),
            Err(e) => return self.fail(e.to_string()),
        };

        if !self.active.load(Ordering::SeqCst) {
            self.set_status(ScannerStatus::Stopped);
            return;
        }

        let mut stream = match self.camera.open(&device.device_id).await {
            Ok(stream) => stream,
            Err(e) => return self.fail(e.to_string()),
        };

        info!(device_id = %device.device_id, label = %device.label, "Scanner streaming");
        self.set_status(ScannerStatus::Streaming);

        let outcome = self.decode_loop(stream.as_mut()).await;

        if let Err(e) = stream.stop().await {
            warn!(?e, "Camera cleanup failed");
        }

        match outcome {
            Ok(()) => self.set_status(ScannerStatus::Stopped),
            Err(e) => self.fail(e.to_string()),
        }
        info!("Scanner stopped");
    }

    /// Pulls frames until shutdown, end of stream, or a stream error.
    ///
    /// A frame that is already available is taken before the shutdown
    /// message; the `active` flag decides whether its code is delivered.
    async fn decode_loop(&mut self, stream: &mut dyn VideoStream) -> ScannerResult<()> {
        loop {
            if !self.active.load(Ordering::SeqCst) {
                return Ok(());
            }

            tokio::select! {
                biased;

                frame = stream.next_frame() => match frame {
                    Ok(Some(frame)) => match self.decoder.decode(&frame) {
                        Ok(text) => {
                            if !self.active.load(Ordering::SeqCst) {
                                return Ok(());
                            }
                            info!(code = %text, "Barcode decoded");
                            (self.on_decode)(text);
                        }
                        Err(DecodeError::NotFound) => {}
                        Err(e) => warn!(error = %e, "Frame decode error"),
                    },
                    Ok(None) => {
                        debug!("Camera stream ended");
                        return Ok(());
                    }
                    Err(e) => return Err(ScannerError::Stream(e.to_string())),
                },

                _ = self.shutdown_rx.recv() => {
                    debug!("Scanner received shutdown");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Frame;
    use crate::device::CameraDevice;
    use crate::scripted::{ScriptedCamera, TextFrameDecoder};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn spawn_collecting(
        camera: Arc<dyn CameraBackend>,
        decoder: Arc<dyn FrameDecoder>,
    ) -> (ScannerHandle, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Scanner::spawn(camera, decoder, ScannerOptions::default(), move |code| {
            let _ = tx.send(code);
        });
        (handle, rx)
    }

    async fn wait_terminal(handle: &ScannerHandle) -> ScannerStatus {
        let mut rx = handle.subscribe();
        let status = timeout(WAIT, rx.wait_for(|s| s.is_terminal()))
            .await
            .expect("scanner did not settle")
            .expect("status channel closed")
            .clone();
        status
    }

    /// Camera whose stream counts `stop` calls and can fail them.
    struct CountingCamera {
        stops: Arc<AtomicUsize>,
        fail_stop: bool,
    }

    struct CountingStream {
        stops: Arc<AtomicUsize>,
        fail_stop: bool,
    }

    #[async_trait]
    impl CameraBackend for CountingCamera {
        async fn enumerate_devices(&self) -> ScannerResult<Vec<CameraDevice>> {
            Ok(vec![CameraDevice::video("cam0", "Back Camera")])
        }

        async fn open(&self, _device_id: &str) -> ScannerResult<Box<dyn VideoStream>> {
            Ok(Box::new(CountingStream {
                stops: self.stops.clone(),
                fail_stop: self.fail_stop,
            }))
        }
    }

    #[async_trait]
    impl VideoStream for CountingStream {
        async fn next_frame(&mut self) -> ScannerResult<Option<Frame>> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(Some(Frame::from_text("")))
        }

        async fn stop(&mut self) -> ScannerResult<()> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            if self.fail_stop {
                Err(ScannerError::Cleanup("device busy".to_string()))
            } else {
                Ok(())
            }
        }
    }

    /// Decoder that fails loudly on "bad" frames.
    struct PickyDecoder;

    impl FrameDecoder for PickyDecoder {
        fn decode(&self, frame: &Frame) -> Result<String, DecodeError> {
            match std::str::from_utf8(&frame.data).unwrap_or("") {
                "" => Err(DecodeError::NotFound),
                "bad" => Err(DecodeError::Checksum),
                text => Ok(text.to_string()),
            }
        }
    }

    #[tokio::test]
    async fn test_forwards_each_decoded_code_once() {
        let camera = ScriptedCamera::new(
            vec!["".into(), "4901234567054".into(), "".into(), "".into(), "12345678".into()],
            Duration::from_millis(1),
        );
        let (handle, mut rx) = spawn_collecting(Arc::new(camera), Arc::new(TextFrameDecoder));

        let first = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
        let second = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(first, "4901234567054");
        assert_eq!(second, "12345678");

        // The scripted camera keeps producing empty frames; nothing else arrives.
        assert!(timeout(Duration::from_millis(50), rx.recv()).await.is_err());

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_decode_errors_are_not_forwarded() {
        let camera = ScriptedCamera::new(
            vec!["bad".into(), "".into(), "777".into()],
            Duration::from_millis(1),
        );
        let (handle, mut rx) = spawn_collecting(Arc::new(camera), Arc::new(PickyDecoder));

        let code = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(code, "777");
        assert_eq!(handle.status(), ScannerStatus::Streaming);

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_no_camera_reports_error() {
        let camera = ScriptedCamera::new(vec!["123".into()], Duration::from_millis(1))
            .with_devices(Vec::new());
        let (handle, mut rx) = spawn_collecting(Arc::new(camera), Arc::new(TextFrameDecoder));

        let status = wait_terminal(&handle).await;
        assert_eq!(status, ScannerStatus::Error("No camera found".to_string()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_enumeration_failure_carries_reason() {
        let camera = ScriptedCamera::new(vec![], Duration::from_millis(1))
            .with_enumeration_error("permission denied");
        let (handle, _rx) = spawn_collecting(Arc::new(camera), Arc::new(TextFrameDecoder));

        match wait_terminal(&handle).await {
            ScannerStatus::Error(msg) => assert!(msg.contains("permission denied"), "{msg}"),
            other => panic!("unexpected status: {other}"),
        }
    }

    #[tokio::test]
    async fn test_stop_releases_camera() {
        let stops = Arc::new(AtomicUsize::new(0));
        let camera = CountingCamera {
            stops: stops.clone(),
            fail_stop: false,
        };
        let (handle, _rx) = spawn_collecting(Arc::new(camera), Arc::new(TextFrameDecoder));

        let mut status_rx = handle.subscribe();
        timeout(WAIT, status_rx.wait_for(|s| *s == ScannerStatus::Streaming))
            .await
            .unwrap()
            .unwrap();

        handle.stop().await;
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(*status_rx.borrow(), ScannerStatus::Stopped);
    }

    #[tokio::test]
    async fn test_cleanup_errors_are_swallowed() {
        let stops = Arc::new(AtomicUsize::new(0));
        let camera = CountingCamera {
            stops: stops.clone(),
            fail_stop: true,
        };
        let (handle, _rx) = spawn_collecting(Arc::new(camera), Arc::new(TextFrameDecoder));

        let mut status_rx = handle.subscribe();
        timeout(WAIT, status_rx.wait_for(|s| *s == ScannerStatus::Streaming))
            .await
            .unwrap()
            .unwrap();

        handle.stop().await;
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(*status_rx.borrow(), ScannerStatus::Stopped);
    }

    /// Camera whose stream hands out one coded frame per `release`.
    struct GatedCamera {
        parked: Arc<Notify>,
        release: Arc<Notify>,
    }

    struct GatedStream {
        parked: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl CameraBackend for GatedCamera {
        async fn enumerate_devices(&self) -> ScannerResult<Vec<CameraDevice>> {
            Ok(vec![CameraDevice::video("cam0", "Back Camera")])
        }

        async fn open(&self, _device_id: &str) -> ScannerResult<Box<dyn VideoStream>> {
            Ok(Box::new(GatedStream {
                parked: self.parked.clone(),
                release: self.release.clone(),
            }))
        }
    }

    #[async_trait]
    impl VideoStream for GatedStream {
        async fn next_frame(&mut self) -> ScannerResult<Option<Frame>> {
            self.parked.notify_one();
            self.release.notified().await;
            Ok(Some(Frame::from_text("4901234567054")))
        }

        async fn stop(&mut self) -> ScannerResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_frame_ready_during_stop_is_not_delivered() {
        let parked = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let camera = GatedCamera {
            parked: parked.clone(),
            release: release.clone(),
        };

        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = delivered.clone();
        let handle = Scanner::spawn(
            Arc::new(camera),
            Arc::new(TextFrameDecoder),
            ScannerOptions::default(),
            move |code| sink.lock().unwrap().push(code),
        );

        // First frame goes through.
        timeout(WAIT, parked.notified()).await.unwrap();
        release.notify_one();
        timeout(WAIT, parked.notified()).await.unwrap();
        assert_eq!(delivered.lock().unwrap().len(), 1);

        // Second frame becomes ready, then stop begins before the loop runs.
        release.notify_one();
        let stop = handle.stop();
        tokio::pin!(stop);
        assert!(timeout(Duration::ZERO, &mut stop).await.is_err());
        timeout(WAIT, stop).await.unwrap();

        assert_eq!(*delivered.lock().unwrap(), vec!["4901234567054".to_string()]);
    }

    /// Camera whose stream fails on the first frame.
    struct BrokenCamera;

    struct BrokenStream;

    #[async_trait]
    impl CameraBackend for BrokenCamera {
        async fn enumerate_devices(&self) -> ScannerResult<Vec<CameraDevice>> {
            Ok(vec![CameraDevice::video("cam0", "Back Camera")])
        }

        async fn open(&self, _device_id: &str) -> ScannerResult<Box<dyn VideoStream>> {
            Ok(Box::new(BrokenStream))
        }
    }

    #[async_trait]
    impl VideoStream for BrokenStream {
        async fn next_frame(&mut self) -> ScannerResult<Option<Frame>> {
            Err(ScannerError::Io(std::io::Error::other("device unplugged")))
        }

        async fn stop(&mut self) -> ScannerResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stream_failure_is_reported() {
        let (handle, _rx) = spawn_collecting(Arc::new(BrokenCamera), Arc::new(TextFrameDecoder));

        match wait_terminal(&handle).await {
            ScannerStatus::Error(msg) => {
                assert!(msg.starts_with("Camera stream failed"), "{msg}");
                assert!(msg.contains("device unplugged"), "{msg}");
            }
            other => panic!("unexpected status: {other}"),
        }
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ScannerStatus::Streaming.to_string(), "streaming");
        assert_eq!(
            ScannerStatus::Error("No camera found".into()).to_string(),
            "error: No camera found"
        );
        assert!(ScannerStatus::Stopped.is_terminal());
        assert!(!ScannerStatus::Starting.is_terminal());
    }
}
