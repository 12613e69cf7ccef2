//! # Scan POS Terminal Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scan POS Terminal                                │
//! │                                                                         │
//! │   stdin ──► commands ──► AppState ──► view ──► stdout                  │
//! │                 │                                                       │
//! │                 ├──► HttpBackend ──► GET /item/{code}, POST /purchase  │
//! │                 └──► Scanner ──────► CameraBackend + FrameDecoder      │
//! │                                                                         │
//! │   logs ──► stderr                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scanpos_terminal::run().await
}
