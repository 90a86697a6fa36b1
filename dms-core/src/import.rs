//! Import adapter — best-effort batch loading of records from text lines.
//!
//! Each data line is parsed with [`CharacterRecord::from_line`] and handed to
//! [`CharacterStore::add`]. A failing line is tallied and recorded in the
//! [`ImportReport`]; it never stops the batch. Only a broken stream (an
//! I/O error while reading) aborts, and records added before it stay.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use crate::config::{HeaderPolicy, ImportConfig};
use crate::error::{DmsError, ParseError, Result};
use crate::record::CharacterRecord;
use crate::store::CharacterStore;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A line that could not be imported.
#[derive(Debug)]
pub struct LineFailure {
    /// 1-based line number within the input.
    pub line: usize,
    /// Why the line was skipped.
    pub error: DmsError,
}

/// Outcome of a batch import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Records accepted by the store.
    pub added: usize,
    /// Lines rejected (parse, validation, or duplicate failures).
    pub skipped: usize,
    /// One entry per skipped line, in input order.
    pub failures: Vec<LineFailure>,
}

impl ImportReport {
    /// Console summary, e.g. `Loaded: 3 added, 1 skipped.`
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Loaded: {} added, {} skipped.", self.added, self.skipped)
    }
}

/// Tracks header and blank-line handling across a stream of lines.
struct LineImporter<'a> {
    store: &'a mut CharacterStore,
    config: &'a ImportConfig,
    seen_first: bool,
    report: ImportReport,
}

impl<'a> LineImporter<'a> {
    fn new(store: &'a mut CharacterStore, config: &'a ImportConfig) -> Self {
        Self {
            store,
            config,
            seen_first: false,
            report: ImportReport::default(),
        }
    }

    fn feed(&mut self, number: usize, line: &str) {
        if line.trim().is_empty() && self.config.skip_blank_lines {
            return;
        }

        let is_first = !self.seen_first;
        self.seen_first = true;
        let line = if is_first {
            line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line)
        } else {
            line
        };
        if is_first && is_header(line, self.config.header) {
            return;
        }

        let outcome = CharacterRecord::from_line(line)
            .map_err(DmsError::from)
            .and_then(|record| self.store.add(record));

        match outcome {
            Ok(()) => self.report.added += 1,
            Err(error) => self.reject(number, error),
        }
    }

    /// Count a line that could not even be decoded.
    fn feed_undecodable(&mut self, number: usize, error: ParseError) {
        self.seen_first = true;
        self.reject(number, error.into());
    }

    fn reject(&mut self, number: usize, error: DmsError) {
        warn!(line = number, %error, "import line skipped");
        self.report.skipped += 1;
        self.report.failures.push(LineFailure {
            line: number,
            error,
        });
    }

    fn finish(self) -> ImportReport {
        info!(
            added = self.report.added,
            skipped = self.report.skipped,
            "import finished"
        );
        self.report
    }
}

fn is_header(line: &str, policy: HeaderPolicy) -> bool {
    match policy {
        HeaderPolicy::Skip => true,
        HeaderPolicy::None => false,
        HeaderPolicy::Auto => line
            .trim_start_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("id,")),
    }
}

/// Import every line of an in-memory sequence.
pub fn import_lines<I, S>(store: &mut CharacterStore, lines: I, config: &ImportConfig) -> ImportReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut importer = LineImporter::new(store, config);
    for (idx, line) in lines.into_iter().enumerate() {
        importer.feed(idx + 1, line.as_ref());
    }
    importer.finish()
}

/// Import every line read from `reader`.
///
/// Lines are split on `\n` and decoded one at a time, so a line that is not
/// valid UTF-8 is skipped as [`ParseError::InvalidUtf8`] like any other bad
/// line.
///
/// # Errors
/// Returns [`DmsError::Io`] if reading fails; lines consumed before the
/// failure have already been applied to the store.
pub fn import_reader<R: BufRead>(
    store: &mut CharacterStore,
    mut reader: R,
    config: &ImportConfig,
) -> Result<ImportReport> {
    let mut importer = LineImporter::new(store, config);
    let mut buf = Vec::new();
    let mut number = 0;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .inspect_err(|e| warn!(line = number + 1, error = %e, "import aborted"))?;
        if read == 0 {
            break;
        }
        number += 1;

        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        match std::str::from_utf8(raw) {
            Ok(line) => importer.feed(number, line),
            Err(e) => importer.feed_undecodable(
                number,
                ParseError::InvalidUtf8 {
                    valid_up_to: e.valid_up_to(),
                },
            ),
        }
    }
    Ok(importer.finish())
}

/// Open `path` and import its lines.
///
/// # Errors
/// Returns [`DmsError::Io`] if the file cannot be opened or read.
pub fn import_path(
    store: &mut CharacterStore,
    path: &Path,
    config: &ImportConfig,
) -> Result<ImportReport> {
    let file = File::open(path)?;
    info!(path = %path.display(), "importing records");
    import_reader(store, BufReader::new(file), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordId;

    const VALID: [&str; 3] = [
        "1,Doofnita,NA,Troll,3,500,80,true",
        "2,AnitaBath,NA,Catfish,5,1000,95,true",
        "3,LouLou,EU,Gangster,2,200,-40,false",
    ];

    #[test]
    fn malformed_line_is_skipped_not_fatal() {
        let mut store = CharacterStore::new();
        let lines = [VALID[0], "4,Broken,NA,Troll,lots,0,0,true", VALID[1], VALID[2]];
        let report = import_lines(&mut store, lines, &ImportConfig::default());

        assert_eq!(report.added, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].line, 2);
        assert!(matches!(
            report.failures[0].error,
            DmsError::Parse(ParseError::InvalidNumber { field: "wantedLevel", .. })
        ));
        for id in 1..=3 {
            assert!(store.find_by_id(RecordId(id)).is_some());
        }
    }

    #[test]
    fn duplicates_and_invalid_records_are_skipped() {
        let mut store = CharacterStore::new();
        let lines = [
            VALID[0],
            "1,Other,NA,Troll,1,1,1,true",
            "9,DOOFNITA,NA,Troll,1,1,1,true",
            "10,Bad,NA,Troll,7,1,1,true",
        ];
        let report = import_lines(&mut store, lines, &ImportConfig::default());
        assert_eq!((report.added, report.skipped), (1, 3));
        assert!(matches!(report.failures[0].error, DmsError::DuplicateId(_)));
        assert!(matches!(report.failures[1].error, DmsError::DuplicateHandle { .. }));
        assert!(matches!(report.failures[2].error, DmsError::Invalid(_)));
    }

    #[test]
    fn auto_header_is_dropped() {
        let mut store = CharacterStore::new();
        let lines = [
            "",
            "ID,handle,server,occupation,wantedLevel,bountyCents,reputation,active",
            VALID[0],
        ];
        let report = import_lines(&mut store, lines, &ImportConfig::default());
        assert_eq!((report.added, report.skipped), (1, 0));
    }

    #[test]
    fn auto_without_header_keeps_first_line() {
        let mut store = CharacterStore::new();
        let report = import_lines(&mut store, VALID, &ImportConfig::default());
        assert_eq!(report.added, 3);
    }

    #[test]
    fn skip_policy_drops_first_line_unconditionally() {
        let mut store = CharacterStore::new();
        let config = ImportConfig {
            header: HeaderPolicy::Skip,
            ..ImportConfig::default()
        };
        let report = import_lines(&mut store, VALID, &config);
        assert_eq!(report.added, 2);
        assert!(store.find_by_id(RecordId(1)).is_none());
    }

    #[test]
    fn none_policy_counts_header_as_skipped() {
        let mut store = CharacterStore::new();
        let config = ImportConfig {
            header: HeaderPolicy::None,
            ..ImportConfig::default()
        };
        let lines = ["id,handle,server,occupation,wantedLevel,bountyCents,reputation,active", VALID[0]];
        let report = import_lines(&mut store, lines, &config);
        assert_eq!((report.added, report.skipped), (1, 1));
    }

    #[test]
    fn blank_lines_counted_when_not_skipped() {
        let mut store = CharacterStore::new();
        let config = ImportConfig {
            header: HeaderPolicy::None,
            skip_blank_lines: false,
        };
        let report = import_lines(&mut store, [VALID[0], "   "], &config);
        assert_eq!((report.added, report.skipped), (1, 1));
        assert!(matches!(
            report.failures[0].error,
            DmsError::Parse(ParseError::FieldCount { found: 1 })
        ));
    }

    #[test]
    fn reader_import_matches_line_import() {
        let mut store = CharacterStore::new();
        let text = VALID.join("\n");
        let report = import_reader(&mut store, text.as_bytes(), &ImportConfig::default())
            .expect("in-memory reader");
        assert_eq!(report.added, 3);
        assert_eq!(report.summary(), "Loaded: 3 added, 0 skipped.");
    }

    #[test]
    fn undecodable_line_is_skipped_not_fatal() {
        let mut store = CharacterStore::new();
        let mut bytes = format!("{}\r\n", VALID[0]).into_bytes();
        bytes.extend_from_slice(b"2,Caf\xe9,NA,Cook,1,0,0,true\n");
        bytes.extend_from_slice(VALID[2].as_bytes());

        let report = import_reader(&mut store, bytes.as_slice(), &ImportConfig::default())
            .expect("bad encoding is a line failure");
        assert_eq!((report.added, report.skipped), (2, 1));
        assert_eq!(report.failures[0].line, 2);
        assert!(matches!(
            report.failures[0].error,
            DmsError::Parse(ParseError::InvalidUtf8 { valid_up_to: 5 })
        ));
        assert!(store.find_by_id(RecordId(1)).is_some());
        assert!(store.find_by_id(RecordId(3)).is_some());
    }

    #[test]
    fn header_behind_byte_order_mark_is_dropped() {
        let mut store = CharacterStore::new();
        let text = format!(
            "\u{feff}id,handle,server,occupation,wantedLevel,bountyCents,reputation,active\n{}",
            VALID[0]
        );
        let report = import_reader(&mut store, text.as_bytes(), &ImportConfig::default())
            .expect("in-memory reader");
        assert_eq!((report.added, report.skipped), (1, 0));
    }

    #[test]
    fn byte_order_mark_before_first_record_is_ignored() {
        let mut store = CharacterStore::new();
        let first = format!("\u{feff}{}", VALID[0]);
        let report = import_lines(&mut store, [first.as_str(), VALID[1]], &ImportConfig::default());
        assert_eq!((report.added, report.skipped), (2, 0));
    }

    #[test]
    fn reader_failure_aborts_with_io_error() {
        struct FailAfterFirst {
            served: bool,
        }
        impl std::io::Read for FailAfterFirst {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.served {
                    return Err(std::io::Error::other("device unplugged"));
                }
                self.served = true;
                let line = format!("{}\n", VALID[0]);
                buf[..line.len()].copy_from_slice(line.as_bytes());
                Ok(line.len())
            }
        }

        let mut store = CharacterStore::new();
        let reader = BufReader::new(FailAfterFirst { served: false });
        let err = import_reader(&mut store, reader, &ImportConfig::default())
            .expect_err("stream breaks");
        assert!(matches!(err, DmsError::Io(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut store = CharacterStore::new();
        let err = import_path(
            &mut store,
            Path::new("/no/such/characters.csv"),
            &ImportConfig::default(),
        )
        .expect_err("missing file");
        assert!(matches!(err, DmsError::Io(_)));
    }
}
