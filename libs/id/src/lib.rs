//! # wsm-id
//!
//! Creation-time-ordered identifiers for window/session entities, built on
//! a fixed-alphabet base36 codec.
//!
//! ## Design Principles
//!
//! - Identifiers are system-generated, immutable, and never reused
//! - Identifiers sort lexicographically in creation order; same-second
//!   ties are broken by a volatile counter
//! - The string layout is stable on disk and parsed only by this crate
//! - Strict parsing: roundtrip (generate → format → parse) always holds
//!
//! ## Identifier Format
//!
//! All identifiers use the layout `{prefix}{high}{low}-{tie}`:
//!
//! - `high`, `low`: the 16-bit halves of the Unix timestamp in seconds,
//!   each encoded as exactly four base36 digits
//! - `tie`: a process-wide counter encoded in base36 with no fixed width
//! - `prefix`: an optional caller-supplied label, not parsed by this crate
//!
//! Example: `0L101A9Z-2F` (no prefix), `win-0L101A9Z-2F` (prefix `win-`).

pub mod base36;
mod error;
mod uid;

pub use error::IdError;
pub use uid::{TimeComponents, Uid};
