//! Standings Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the standings workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Fingerprints**: Content hashing used to key memoized loads
//! - **Logging**: `tracing` subscriber setup shared by both binaries
//! - **Types**: Season links and standings records at each pipeline stage
//!
//! # Example
//!
//! ```no_run
//! use standings_common::{Result, YearRange};
//!
//! fn seasons() -> Result<YearRange> {
//!     let range: YearRange = "2000-2025".parse()?;
//!     Ok(range)
//! }
//! ```

pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, StandingsError};
pub use fingerprint::Fingerprint;
pub use types::{NormalizedStandingsRecord, RawStandingsRecord, SeasonLink, YearRange};
