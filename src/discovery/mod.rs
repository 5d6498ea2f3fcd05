//! Git-aware file discovery.
//!
//! Uses the `ignore` crate to respect .gitignore and walk directories
//! efficiently, then reads and classifies each file in parallel with rayon.

mod files;

pub use files::{SNIFF_BYTES, classify, list_units};
