//! # DMS Core Library
//!
//! In-memory record manager for game-character data.
//!
//! A [`CharacterStore`] owns the authoritative set of [`CharacterRecord`]s and
//! enforces their invariants on every mutation:
//!
//! - **Identity**: `id > 0`, unique across the store
//! - **Handle**: non-blank, unique case-insensitively
//! - **Ranges**: `wantedLevel` 0..=6, `bountyCents` >= 0, `reputation` -100..=100
//!
//! The [`RankingEngine`] turns any slice of records into a "most wanted" list
//! ordered by threat score, and the [`import`] / [`export`] adapters translate
//! between records and the comma-separated line format.
//!
//! ## Threat Score
//!
//! ```text
//! score = wantedLevel * 100 + bountyCents / 100 + max(0, -reputation)
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod ranking;
pub mod record;
pub mod store;
pub mod types;

pub use config::DmsConfig;
pub use error::{DmsError, ParseError, Violation};
pub use ranking::{RankingEngine, ThreatEntry, threat_score};
pub use record::CharacterRecord;
pub use store::CharacterStore;
pub use types::*;
