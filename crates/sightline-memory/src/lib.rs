//! `sightline-memory` – short-term perception memory.
//!
//! # Modules
//!
//! - [`short_term`] – [`MemoryStore`][short_term::MemoryStore]: tracks, per
//!   object label, how many observation frames it has survived and when it
//!   was last seen, forgetting labels that fall out of a sliding time window.

pub mod short_term;

pub use short_term::{MemoryEntry, MemoryStore};
