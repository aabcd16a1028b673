//! Space metadata and the live occupancy indicator shown next to each space.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analytics::records::{OccupancyRecord, RecordSet};

/// Number of records returned by [`recent_records`].
pub const RECENT_RECORDS: usize = 5;

/// A bookable space whose occupancy is being tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpaceInfo {
    pub id: u32,
    pub name: String,
    /// Seats or desks available; zero disables the percentage indicator.
    pub capacity: u32,
}

/// Traffic-light band for a space's current load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyBand {
    Green,
    Yellow,
    Red,
}

impl OccupancyBand {
    /// Red above 80 %, yellow above 50 %, green otherwise.
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage > 80 {
            OccupancyBand::Red
        } else if percentage > 50 {
            OccupancyBand::Yellow
        } else {
            OccupancyBand::Green
        }
    }
}

impl fmt::Display for OccupancyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OccupancyBand::Green => "green",
            OccupancyBand::Yellow => "yellow",
            OccupancyBand::Red => "red",
        })
    }
}

/// Current load of a space derived from its latest record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceStatus {
    pub space_id: u32,
    pub name: String,
    pub capacity: u32,
    /// Count from the newest record, zero without history.
    pub current_occupancy: u32,
    /// `current_occupancy / capacity` as a truncated percentage.
    pub occupancy_percentage: u32,
    pub band: OccupancyBand,
}

impl SpaceStatus {
    pub fn from_records(space: &SpaceInfo, set: &RecordSet) -> Self {
        let current = set.latest().map_or(0, |r| r.occupied_count);
        let percentage = if space.capacity > 0 {
            let pct = u64::from(current) * 100 / u64::from(space.capacity);
            u32::try_from(pct).unwrap_or(u32::MAX)
        } else {
            0
        };
        Self {
            space_id: space.id,
            name: space.name.clone(),
            capacity: space.capacity,
            current_occupancy: current,
            occupancy_percentage: percentage,
            band: OccupancyBand::from_percentage(percentage),
        }
    }
}

impl fmt::Display for SpaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (#{}): {}/{} occupied, {}% [{}]",
            self.name,
            self.space_id,
            self.current_occupancy,
            self.capacity,
            self.occupancy_percentage,
            self.band
        )
    }
}

/// The newest [`RECENT_RECORDS`] observations, newest first.
pub fn recent_records(set: &RecordSet) -> Vec<OccupancyRecord> {
    set.recent(RECENT_RECORDS).into_iter().cloned().collect()
}
