//! # pwget
//!
//! `pwget` downloads several files concurrently over HTTP(S) and keeps a
//! single progress line up to date while it does.
//!
//! - One worker task per accepted URL
//! - Per-file progress shared between workers and the reporter without locks
//!   on the hot path
//! - A reporter that always draws the final state before the batch returns
//!
//! ## Example Usage
//!
//! ```no_run
//! # async fn demo() -> reqwest::Result<()> {
//! use pwget::{Coordinator, Settings};
//!
//! let coordinator = Coordinator::new(Settings::default())?;
//! let links = vec!["https://example.com/archive.zip".to_string()];
//! let (outcome, _stdout) = coordinator.run(&links, std::io::stdout()).await;
//! println!("{} failed", outcome.failed().await);
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod reporter;
pub mod tracker;
pub mod transfer;
pub mod utils;
pub mod validate;
pub mod worker;

pub use args::Args;
pub use config::Settings;
pub use coordinator::{Coordinator, Outcome};
pub use error::FetchError;
pub use reporter::ProgressReporter;
pub use tracker::ProgressTracker;
pub use transfer::{FileTransfer, Registry, TransferStatus};
