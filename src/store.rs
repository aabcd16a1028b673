//! In-memory record store keyed by space.
//!
//! Stands in for the persistence layer: it hands out an immutable, sorted
//! snapshot of each space's records and never mutates a snapshot once built.

use std::collections::BTreeMap;

use crate::analytics::records::{OccupancyRecord, RecordSet};
use crate::error::{AnalyticsError, Result};
use crate::space::SpaceInfo;

/// Spaces and their occupancy history.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    spaces: BTreeMap<u32, SpaceInfo>,
    records: BTreeMap<u32, RecordSet>,
}

impl RecordStore {
    /// Builds a store from space metadata and `(space_id, record)` pairs.
    ///
    /// Records naming a space that is not in `spaces` are kept under that
    /// id but only reachable once the space is registered.
    pub fn new(
        spaces: impl IntoIterator<Item = SpaceInfo>,
        records: impl IntoIterator<Item = (u32, OccupancyRecord)>,
    ) -> Self {
        let spaces = spaces.into_iter().map(|s| (s.id, s)).collect();
        let mut grouped: BTreeMap<u32, Vec<OccupancyRecord>> = BTreeMap::new();
        for (space_id, rec) in records {
            grouped.entry(space_id).or_default().push(rec);
        }
        let records = grouped
            .into_iter()
            .map(|(id, recs)| (id, RecordSet::from_unordered(recs)))
            .collect();
        Self { spaces, records }
    }

    /// Registered spaces in id order.
    pub fn spaces(&self) -> impl Iterator<Item = &SpaceInfo> {
        self.spaces.values()
    }

    /// # Errors
    ///
    /// Returns [`AnalyticsError::UnknownSpace`] if `space_id` is not registered.
    pub fn space(&self, space_id: u32) -> Result<&SpaceInfo> {
        self.spaces
            .get(&space_id)
            .ok_or(AnalyticsError::UnknownSpace(space_id))
    }

    /// The sorted history of a registered space; empty if it has none.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::UnknownSpace`] if `space_id` is not registered.
    pub fn records(&self, space_id: u32) -> Result<RecordSet> {
        self.space(space_id)?;
        Ok(self.records.get(&space_id).cloned().unwrap_or_default())
    }

    /// Total records across all spaces.
    pub fn total_records(&self) -> usize {
        self.records.values().map(RecordSet::len).sum()
    }
}
