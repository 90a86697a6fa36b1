//! Threat ranking — "most wanted" reports over a set of records.
//!
//! ```text
//! score = wantedLevel * 100 + bountyCents / 100 + max(0, -reputation)
//! ```
//!
//! Ranking is a pure function of its input: the engine never filters by
//! activity, never touches the store, and builds fresh [`ThreatEntry`] values
//! on every call. Ties keep the order of the input sequence (stable sort), so
//! ranking `CharacterStore::list_active()` breaks ties by ascending id.

use serde::Serialize;
use std::fmt;

use crate::config::RankingConfig;
use crate::export;
use crate::record::CharacterRecord;

/// Points per wanted level.
const WANTED_LEVEL_WEIGHT: i64 = 100;

/// Bounty cents per point.
const CENTS_PER_POINT: i64 = 100;

/// Compute a record's threat score.
#[must_use]
pub fn threat_score(record: &CharacterRecord) -> i64 {
    let wanted = i64::from(record.wanted_level) * WANTED_LEVEL_WEIGHT;
    let bounty = record.bounty_cents / CENTS_PER_POINT;
    let bad_rep = (-i64::from(record.reputation)).max(0);
    wanted + bounty + bad_rep
}

/// A record paired with its computed threat score.
///
/// Borrows the record; entries live only as long as the report that
/// produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThreatEntry<'a> {
    /// The ranked record.
    #[serde(flatten)]
    pub record: &'a CharacterRecord,
    /// Its threat score.
    pub score: i64,
}

impl<'a> ThreatEntry<'a> {
    /// Score a single record.
    #[must_use]
    pub fn new(record: &'a CharacterRecord) -> Self {
        Self {
            record,
            score: threat_score(record),
        }
    }
}

impl fmt::Display for ThreatEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} WL={} Bounty={} Rep={} Score={}",
            self.record.id,
            self.record.handle,
            self.record.wanted_level,
            self.record.bounty_cents,
            self.record.reputation,
            self.score
        )
    }
}

/// Rank `records` by descending threat score and keep the first `n`.
///
/// A negative `n` yields an empty list; an `n` larger than the input yields
/// every record. Equal scores keep their input order.
pub fn top_n<'a, I>(n: i64, records: I) -> Vec<ThreatEntry<'a>>
where
    I: IntoIterator<Item = &'a CharacterRecord>,
{
    let limit = usize::try_from(n.max(0)).unwrap_or(usize::MAX);
    let mut entries: Vec<ThreatEntry<'a>> = records.into_iter().map(ThreatEntry::new).collect();

    // `sort_by` is stable.
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(limit);
    entries
}

/// Report generator that carries the ranking configuration.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    config: RankingConfig,
}

impl RankingEngine {
    /// Create a ranking engine with the given configuration.
    #[must_use]
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// See [`top_n`].
    pub fn top_n<'a, I>(&self, n: i64, records: I) -> Vec<ThreatEntry<'a>>
    where
        I: IntoIterator<Item = &'a CharacterRecord>,
    {
        top_n(n, records)
    }

    /// Top entries using the configured `default_top_n`.
    pub fn top_default<'a, I>(&self, records: I) -> Vec<ThreatEntry<'a>>
    where
        I: IntoIterator<Item = &'a CharacterRecord>,
    {
        let n = i64::try_from(self.config.default_top_n).unwrap_or(i64::MAX);
        top_n(n, records)
    }

    /// Serialize entries as export text in the configured layout.
    #[must_use]
    pub fn to_export_text(&self, entries: &[ThreatEntry<'_>]) -> String {
        export::to_export_text(entries, self.config.layout)
    }
}
