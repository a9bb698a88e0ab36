//! Common utilities for the Canopy tree builder.
//!
//! This crate provides shared infrastructure used by the other Canopy crates:
//! - **Diagnostics** - parse issues and the sink trait that observes them
//! - **Warning System** - colored, deduplicated terminal output
//! - **Document Source** - reading markup from disk

pub mod diagnostics;
pub mod source;
pub mod warning;
