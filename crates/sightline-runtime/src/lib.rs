//! `sightline-runtime` – the narration engine.
//!
//! Ingests one frame of recognized object labels at a time, remembers what
//! has been seen and how often, and answers with a sentence that tells new
//! objects from familiar ones.
//!
//! # Modules
//!
//! - [`classifier`] – maps memory state and in-frame counts onto a
//!   [`PhraseCategory`][sightline_types::PhraseCategory].
//! - [`narrator`] – [`Narrator`][narrator::Narrator]: owns the
//!   [`MemoryStore`][sightline_memory::MemoryStore], the
//!   [`PhraseBank`][sightline_language::PhraseBank] and the
//!   [`NumberWordResolver`][sightline_language::NumberWordResolver], and
//!   composes one sentence per frame.
//! - [`shared`] – [`SharedNarrator`][shared::SharedNarrator]: a lock-guarded
//!   handle for sessions driven from several threads.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: installs the
//!   global `tracing` subscriber with optional OTLP export.

pub mod classifier;
pub mod narrator;
pub mod shared;
pub mod telemetry;

pub use classifier::{MultiClass, classify_multi, classify_single};
pub use narrator::{Narrator, NarratorConfig, join_labels};
pub use shared::SharedNarrator;
pub use telemetry::{LogFormat, TracerProviderGuard, init_tracing};
