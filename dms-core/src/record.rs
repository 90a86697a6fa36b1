//! The character record — the single data entity managed by the store.
//!
//! A record is a plain value: parsing ([`CharacterRecord::from_line`]) only
//! converts types, and semantic checks live in [`CharacterRecord::validate`],
//! which the store runs before accepting any mutation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ParseError, Violation};
use crate::types::{RecordId, Server};

/// Number of comma-separated fields in an import line.
pub const FIELD_COUNT: usize = 8;

/// Column names of the import line, in order.
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "id",
    "handle",
    "server",
    "occupation",
    "wantedLevel",
    "bountyCents",
    "reputation",
    "active",
];

/// Inclusive bounds for `wantedLevel`.
pub const WANTED_LEVEL_RANGE: std::ops::RangeInclusive<i32> = 0..=6;

/// Inclusive bounds for `reputation`.
pub const REPUTATION_RANGE: std::ops::RangeInclusive<i32> = -100..=100;

/// A game character's field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    /// Primary key, unique within a store.
    pub id: RecordId,
    /// Display name, unique within a store (case-insensitive).
    pub handle: String,
    /// Server region.
    pub server: Server,
    /// Free-text occupation.
    pub occupation: String,
    /// Wanted level, 0..=6.
    pub wanted_level: i32,
    /// Bounty in cents, never negative.
    pub bounty_cents: i64,
    /// Reputation, -100..=100.
    pub reputation: i32,
    /// `false` once archived.
    pub active: bool,
}

impl CharacterRecord {
    /// Create a record from its field values. No validation is performed.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        handle: impl Into<String>,
        server: Server,
        occupation: impl Into<String>,
        wanted_level: i32,
        bounty_cents: i64,
        reputation: i32,
        active: bool,
    ) -> Self {
        Self {
            id: RecordId(id),
            handle: handle.into(),
            server,
            occupation: occupation.into(),
            wanted_level,
            bounty_cents,
            reputation,
            active,
        }
    }

    /// Check every field constraint.
    ///
    /// Returns all violations found; an empty list means the record is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.id.0 <= 0 {
            violations.push(Violation::NonPositiveId(self.id.0));
        }
        if self.handle.trim().is_empty() {
            violations.push(Violation::BlankHandle);
        }
        if !WANTED_LEVEL_RANGE.contains(&self.wanted_level) {
            violations.push(Violation::WantedLevelOutOfRange(self.wanted_level));
        }
        if self.bounty_cents < 0 {
            violations.push(Violation::NegativeBounty(self.bounty_cents));
        }
        if !REPUTATION_RANGE.contains(&self.reputation) {
            violations.push(Violation::ReputationOutOfRange(self.reputation));
        }
        violations
    }

    /// Whether [`validate`](Self::validate) reports no violations.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Parse one `id,handle,server,occupation,wantedLevel,bountyCents,reputation,active`
    /// line.
    ///
    /// Every field is trimmed. Fields past the eighth are ignored, so a
    /// full-layout export line (which appends `score`) parses back.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when fewer than eight fields are present, a
    /// numeric field is not an integer, the server token is unknown, or the
    /// active flag is not a boolean literal.
    pub fn from_line(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < FIELD_COUNT {
            return Err(ParseError::FieldCount {
                found: fields.len(),
            });
        }

        Ok(Self {
            id: RecordId(parse_int(fields[0], "id")?),
            handle: fields[1].to_string(),
            server: fields[2].parse()?,
            occupation: fields[3].to_string(),
            wanted_level: parse_int(fields[4], "wantedLevel")?,
            bounty_cents: parse_int(fields[5], "bountyCents")?,
            reputation: parse_int(fields[6], "reputation")?,
            active: parse_bool(fields[7])?,
        })
    }

    /// Render the record in the eight-field import line format.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.fields().join(",")
    }

    /// The eight field values as strings, in import-line order.
    #[must_use]
    pub fn fields(&self) -> [String; FIELD_COUNT] {
        [
            self.id.to_string(),
            self.handle.clone(),
            self.server.as_str().to_string(),
            self.occupation.clone(),
            self.wanted_level.to_string(),
            self.bounty_cents.to_string(),
            self.reputation.to_string(),
            self.active.to_string(),
        ]
    }

    /// Handle normalised for case-insensitive comparison.
    #[must_use]
    pub fn handle_key(&self) -> String {
        normalize_handle(&self.handle)
    }
}

impl fmt::Display for CharacterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} {:<12} {} {:<8} WL={} bounty={} rep={} {}",
            self.id,
            self.handle,
            self.server,
            self.occupation,
            self.wanted_level,
            self.bounty_cents,
            self.reputation,
            if self.active { "active" } else { "inactive" }
        )
    }
}

/// Trim and lowercase a handle for equality checks.
#[must_use]
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().to_lowercase()
}

fn parse_int<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseError::InvalidBool(value.to_string()))
    }
}
