//! Core type definitions for the DMS record model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Primary key of a character record.
///
/// Signed so that out-of-range ids read from an import line can still be
/// represented and then rejected by validation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Game server region a character plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Server {
    /// North America.
    #[serde(rename = "NA")]
    NorthAmerica,
    /// Europe.
    #[serde(rename = "EU")]
    Europe,
    /// Asia.
    #[serde(rename = "AS")]
    Asia,
}

impl Server {
    /// Every server, in declaration order.
    pub const ALL: [Self; 3] = [Self::NorthAmerica, Self::Europe, Self::Asia];

    /// Canonical two-letter token used in import and export lines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NorthAmerica => "NA",
            Self::Europe => "EU",
            Self::Asia => "AS",
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Server {
    type Err = ParseError;

    /// Parses `NA`, `EU` or `AS`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|server| server.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ParseError::UnknownServer(token.to_string()))
    }
}
