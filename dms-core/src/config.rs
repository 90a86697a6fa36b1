//! Configuration for the DMS record manager.
//!
//! Maps directly to `dms.toml`. Every section and field is optional; missing
//! values fall back to the defaults below.
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [import]
//! header = "auto"          # auto | skip | none
//! skip_blank_lines = true
//!
//! [ranking]
//! default_top_n = 10
//! layout = "report"        # report | full
//! ```

use serde::{Deserialize, Serialize};

/// Top-level DMS configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DmsConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Batch import behaviour.
    #[serde(default)]
    pub import: ImportConfig,
    /// Threat ranking and export.
    #[serde(default)]
    pub ranking: RankingConfig,
}

impl DmsConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `DmsError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::DmsError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// How the import adapter treats a leading header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Drop the first non-blank line only if it starts with `id,`.
    #[default]
    Auto,
    /// Always drop the first non-blank line.
    Skip,
    /// Treat every line as data.
    None,
}

/// Batch import settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Header handling.
    #[serde(default)]
    pub header: HeaderPolicy,
    /// Ignore whitespace-only lines instead of counting them as skipped.
    #[serde(default = "default_true")]
    pub skip_blank_lines: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            header: HeaderPolicy::Auto,
            skip_blank_lines: true,
        }
    }
}

/// Column layout of the exported ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportLayout {
    /// `id,handle,server,occupation,wantedLevel,bountyCents,reputation,score`.
    #[default]
    Report,
    /// All eight record fields followed by `score`; re-importable.
    Full,
}

/// Threat ranking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Number of entries reported when the caller does not ask for a count.
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    /// Export column layout.
    #[serde(default)]
    pub layout: ExportLayout,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            layout: ExportLayout::Report,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_top_n() -> usize {
    10
}
