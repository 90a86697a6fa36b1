//! Fixtures shared by the DMS benchmarks.

use dms_core::{CharacterRecord, CharacterStore, Server};

/// Deterministic record number `i`, valid and unique per `i`.
#[must_use]
pub fn make_record(i: u32) -> CharacterRecord {
    let server = Server::ALL[(i % 3) as usize];
    CharacterRecord::new(
        i64::from(i) + 1,
        format!("Outlaw{i}"),
        server,
        if i % 2 == 0 { "Smuggler" } else { "Bounty Hunter" },
        (i % 7) as i32,
        i64::from(i) * 137 % 250_000,
        (i % 201) as i32 - 100,
        i % 5 != 0,
    )
}

/// A store holding `count` records.
///
/// # Panics
/// If a fixture record is rejected by the store.
#[must_use]
pub fn populated_store(count: u32) -> CharacterStore {
    let mut store = CharacterStore::new();
    for i in 0..count {
        store
            .add(make_record(i))
            .expect("fixture records are unique");
    }
    store
}

/// `count` records rendered as import lines.
#[must_use]
pub fn import_lines(count: u32) -> Vec<String> {
    (0..count).map(|i| make_record(i).to_line()).collect()
}
