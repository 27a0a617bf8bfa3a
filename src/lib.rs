//! # clean-audio
//!
//! Command-line client for the Auphonic audio processing API. Uploads one
//! local audio file, waits for the remote production to finish and downloads
//! the resulting output files.
//!
//! The crate is a thin library under a CLI binary so the pipeline stages can
//! be tested against a mock server. Control flow is strictly linear: preset
//! resolution, upload, start, status polling, then result download. Network
//! calls are asynchronous but never concurrent; each stage suspends the
//! whole run until its single outstanding request resolves.
//!
//! ```no_run
//! use clean_audio::{Config, pipeline};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let written = pipeline::run(
//!         &config,
//!         Path::new("episode.wav"),
//!         "Usual-2",
//!         Path::new("./results"),
//!     )
//!     .await?;
//!     for path in written {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Authenticated API client
pub mod client;
/// Runtime configuration
pub mod config;
/// Error types
pub mod error;
/// Result download stage
pub mod fetcher;
/// Pipeline orchestration
pub mod pipeline;
/// Status polling state machine
pub mod poller;
/// Core API types
pub mod types;
/// Path and validation helpers
pub mod utils;

// Re-export commonly used types
pub use client::ApiClient;
pub use config::Config;
pub use error::{Error, Result};
pub use poller::{PollOutcome, PollState, PollTiming, StatusSource};
pub use types::{OutputFile, Preset, Production, ProductionDetails, ProductionStatus, StatusCode};
