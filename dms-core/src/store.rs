//! The character store — authoritative in-memory collection of records.
//!
//! Records are keyed by id in a [`BTreeMap`], so every listing comes out in
//! ascending id order without an extra sort. Handle uniqueness is checked
//! with a linear scan; collections are small.
//!
//! Every mutation is atomic: all checks run before the map is touched, so a
//! failed call leaves the store exactly as it was.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{DmsError, Result};
use crate::record::{CharacterRecord, normalize_handle};
use crate::types::RecordId;

/// Owns every [`CharacterRecord`] and enforces id/handle uniqueness and field
/// validity on each mutation.
#[derive(Debug, Clone, Default)]
pub struct CharacterStore {
    records: BTreeMap<RecordId, CharacterRecord>,
}

impl CharacterStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records, active or archived.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, active or archived, ascending by id.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterRecord> {
        self.records.values()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Insert a new record.
    ///
    /// # Errors
    /// - [`DmsError::Invalid`] if the record fails validation.
    /// - [`DmsError::DuplicateId`] if the id is taken.
    /// - [`DmsError::DuplicateHandle`] if another record holds the handle.
    pub fn add(&mut self, record: CharacterRecord) -> Result<()> {
        ensure_valid(&record)?;
        if self.records.contains_key(&record.id) {
            return Err(DmsError::DuplicateId(record.id));
        }
        if let Some(holder) = self.find_by_handle(&record.handle) {
            return Err(DmsError::DuplicateHandle {
                handle: record.handle.clone(),
                holder: holder.id,
            });
        }

        debug!(id = %record.id, handle = %record.handle, "record added");
        self.records.insert(record.id, record);
        Ok(())
    }

    /// Overwrite every field of the record sharing `record.id`.
    ///
    /// # Errors
    /// - [`DmsError::Invalid`] if the incoming record fails validation.
    /// - [`DmsError::NotFound`] if no record has this id.
    /// - [`DmsError::DuplicateHandle`] if a record with a different id holds
    ///   the handle.
    pub fn update(&mut self, record: CharacterRecord) -> Result<()> {
        ensure_valid(&record)?;
        if !self.records.contains_key(&record.id) {
            return Err(DmsError::NotFound(record.id));
        }
        if let Some(holder) = self
            .find_by_handle(&record.handle)
            .filter(|holder| holder.id != record.id)
        {
            return Err(DmsError::DuplicateHandle {
                handle: record.handle.clone(),
                holder: holder.id,
            });
        }

        debug!(id = %record.id, handle = %record.handle, "record updated");
        self.records.insert(record.id, record);
        Ok(())
    }

    /// Physically delete a record, returning it.
    ///
    /// # Errors
    /// Returns [`DmsError::NotFound`] if no record has this id.
    pub fn remove(&mut self, id: RecordId) -> Result<CharacterRecord> {
        let removed = self.records.remove(&id).ok_or(DmsError::NotFound(id))?;
        debug!(%id, handle = %removed.handle, "record removed");
        Ok(removed)
    }

    /// Mark a record inactive. The record stays in the store and keeps its
    /// id and handle reserved.
    ///
    /// # Errors
    /// Returns [`DmsError::NotFound`] if no record has this id.
    pub fn archive(&mut self, id: RecordId) -> Result<()> {
        let record = self.records.get_mut(&id).ok_or(DmsError::NotFound(id))?;
        record.active = false;
        debug!(%id, "record archived");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Look up a record by id.
    #[must_use]
    pub fn find_by_id(&self, id: RecordId) -> Option<&CharacterRecord> {
        self.records.get(&id)
    }

    /// Look up a record by handle, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find_by_handle(&self, handle: &str) -> Option<&CharacterRecord> {
        let key = normalize_handle(handle);
        self.records.values().find(|r| r.handle_key() == key)
    }

    /// Active records, ascending by id.
    #[must_use]
    pub fn list_active(&self) -> Vec<&CharacterRecord> {
        self.records.values().filter(|r| r.active).collect()
    }

    /// Active records whose handle, server token or occupation contains
    /// `query` (case-insensitive), ascending by id. A blank query matches
    /// every active record.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&CharacterRecord> {
        let needle = query.trim().to_lowercase();
        self.records
            .values()
            .filter(|r| r.active)
            .filter(|r| {
                r.handle.to_lowercase().contains(&needle)
                    || r.server.as_str().to_lowercase().contains(&needle)
                    || r.occupation.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

fn ensure_valid(record: &CharacterRecord) -> Result<()> {
    let violations = record.validate();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(DmsError::Invalid(violations))
    }
}
