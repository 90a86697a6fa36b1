//! Export adapter — ranked entries to comma-separated text.
//!
//! Two layouts are supported (see [`ExportLayout`]):
//!
//! ```text
//! report: id,handle,server,occupation,wantedLevel,bountyCents,reputation,score
//! full:   id,handle,server,occupation,wantedLevel,bountyCents,reputation,active,score
//! ```
//!
//! Lines are joined with `\n` and no trailing newline. Fields are not quoted.

use std::io::Write;

use tracing::info;

use crate::config::ExportLayout;
use crate::error::Result;
use crate::ranking::ThreatEntry;
use crate::record::FIELD_NAMES;

/// Header line for a layout.
#[must_use]
pub fn header(layout: ExportLayout) -> String {
    let record_columns = match layout {
        ExportLayout::Report => &FIELD_NAMES[..FIELD_NAMES.len() - 1],
        ExportLayout::Full => &FIELD_NAMES[..],
    };
    let mut columns = record_columns.to_vec();
    columns.push("score");
    columns.join(",")
}

/// One data line for an entry.
#[must_use]
pub fn entry_line(entry: &ThreatEntry<'_>, layout: ExportLayout) -> String {
    let fields = entry.record.fields();
    let record_columns = match layout {
        ExportLayout::Report => &fields[..fields.len() - 1],
        ExportLayout::Full => &fields[..],
    };
    let mut columns = record_columns.to_vec();
    columns.push(entry.score.to_string());
    columns.join(",")
}

/// Header followed by one line per entry, in the given order.
#[must_use]
pub fn to_export_text(entries: &[ThreatEntry<'_>], layout: ExportLayout) -> String {
    std::iter::once(header(layout))
        .chain(entries.iter().map(|entry| entry_line(entry, layout)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the export text to `writer`.
///
/// # Errors
/// Returns [`DmsError::Io`](crate::DmsError::Io) if the writer fails.
pub fn write_export<W: Write>(
    mut writer: W,
    entries: &[ThreatEntry<'_>],
    layout: ExportLayout,
) -> Result<()> {
    writer.write_all(to_export_text(entries, layout).as_bytes())?;
    writer.flush()?;
    info!(entries = entries.len(), ?layout, "ranking exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::top_n;
    use crate::record::CharacterRecord;
    use crate::types::Server;

    fn records() -> Vec<CharacterRecord> {
        vec![
            CharacterRecord::new(1, "Doofnita", Server::NorthAmerica, "Troll", 3, 500, 80, true),
            CharacterRecord::new(2, "AnitaBath", Server::Europe, "Catfish", 5, 1000, -95, true),
        ]
    }

    #[test]
    fn report_layout_matches_expected_text() {
        let records = records();
        let top = top_n(2, &records);
        assert_eq!(
            to_export_text(&top, ExportLayout::Report),
            "id,handle,server,occupation,wantedLevel,bountyCents,reputation,score\n\
             2,AnitaBath,EU,Catfish,5,1000,-95,605\n\
             1,Doofnita,NA,Troll,3,500,80,305"
        );
    }

    #[test]
    fn full_layout_keeps_active_column() {
        let records = records();
        let top = top_n(1, &records);
        assert_eq!(
            to_export_text(&top, ExportLayout::Full),
            "id,handle,server,occupation,wantedLevel,bountyCents,reputation,active,score\n\
             2,AnitaBath,EU,Catfish,5,1000,-95,true,605"
        );
    }

    #[test]
    fn empty_ranking_is_header_only() {
        assert_eq!(to_export_text(&[], ExportLayout::Report), header(ExportLayout::Report));
    }

    #[test]
    fn write_export_streams_text() {
        let records = records();
        let top = top_n(2, &records);
        let mut buf = Vec::new();
        write_export(&mut buf, &top, ExportLayout::Report).expect("write to vec");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            to_export_text(&top, ExportLayout::Report)
        );
    }

    #[test]
    fn write_export_surfaces_io_failure() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("pipe closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let records = records();
        let top = top_n(1, &records);
        assert!(matches!(
            write_export(Broken, &top, ExportLayout::Full),
            Err(crate::DmsError::Io(_))
        ));
    }
}
