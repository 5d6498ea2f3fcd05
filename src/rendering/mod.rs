//! Rendering - from scored files to condensed text.
//!
//! - Swift sources go through policy-driven body elision
//! - JSON is compacted, other text is whitespace-normalized
//! - Binaries become a size placeholder
//! - The framer joins everything into one artifact

mod elision;
mod frame;
mod json;
mod passthrough;
mod policy;
mod sentinel;
mod whitespace;

pub use elision::{RenderOutcome, render_source};
pub use frame::{Framer, RULE_WIDTH};
pub use json::{JsonLimits, compact_json};
pub use passthrough::{binary_placeholder, render_passthrough};
pub use policy::{KEEP_ALL_MIN, KEEP_ONE_MIN, KEEP_PUBLIC_MIN, RenderPolicy};
pub use sentinel::{EMPTY_BODY, HASH_WIDTH, Sentinel, fnv1a64, line_count};
pub use whitespace::normalize_whitespace;
