//! Scan-and-classify engine for manufacturing test logs.
//!
//! The engine enumerates a directory of plain-text log files, classifies
//! each one against a keyword [`rule::ScanRule`], extracts the unit serial
//! number from qualifying files and reports progress over a channel while
//! the scan runs on a worker thread. The CLI in `main.rs` is a thin
//! front end over this crate.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod rule;
pub mod source;
pub mod store;
