//! Rinkside Ingest Library
//!
//! Resilient retrieval and normalization of schedule/result records
//! from the Swiss ice hockey statistics API. The upstream response
//! shape is unstable (plain JSON, JSONP-wrapped JSON, object-keyed
//! rows or positional array rows), so the pipeline detects and
//! normalizes whatever arrives.
//!
//! # Pipeline
//!
//! Data flows strictly downward:
//!
//! - [`transport`]: GET with a DNS-over-HTTPS rediscovery fallback
//! - [`decode`]: bare JSON or callback-wrapped JSON
//! - [`normalize`]: heterogeneous rows into [`rinkside_common::GameRecord`]
//! - [`enrich`]: bounded, throttled per-game detail lookups
//! - [`aggregate`]: relevance filter and keep-first dedupe
//! - [`pipeline`]: orchestration; artifacts are written on every exit path
//!
//! # Example
//!
//! ```no_run
//! use rinkside_ingest::{config::Config, pipeline, sink::DirSink};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let sink = DirSink::new(&config.output_dir);
//!     pipeline::run(&config, &sink).await;
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod decode;
pub mod enrich;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod sink;
pub mod transport;
