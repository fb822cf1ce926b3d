//! Rinkside Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, error handling and logging for the rinkside workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the pipeline-wide [`IngestError`] taxonomy
//! - **Logging**: tracing subscriber setup shared by all binaries
//! - **Types**: the canonical [`GameRecord`] output unit
//!
//! # Example
//!
//! ```no_run
//! use rinkside_common::{GameRecord, Result};
//!
//! fn keep(record: &GameRecord) -> bool {
//!     record.id.is_some()
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{IngestError, Result};
pub use types::{DetailFields, GameRecord};
