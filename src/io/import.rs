//! CSV import of occupancy records.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::analytics::records::{MAX_TRAFFIC_INDEX, OccupancyRecord};
use crate::error::{AnalyticsError, Result};

/// Column header expected by [`read_records`].
pub const RECORDS_HEADER: &str = "space_id,timestamp,occupied_count,temperature,pressure,\
                                  precipitation,traffic_index,is_holiday";

/// One CSV row; optional columns may be left empty.
#[derive(Debug, Deserialize)]
struct RecordRow {
    space_id: u32,
    timestamp: DateTime<Utc>,
    occupied_count: u32,
    temperature: Option<f64>,
    pressure: Option<f64>,
    precipitation: Option<f64>,
    traffic_index: Option<u8>,
    is_holiday: Option<bool>,
}

impl RecordRow {
    fn into_record(self, line: u64) -> Result<(u32, OccupancyRecord)> {
        let traffic_index = self.traffic_index.unwrap_or(0);
        if traffic_index > MAX_TRAFFIC_INDEX {
            return Err(AnalyticsError::Import {
                line,
                message: format!(
                    "traffic_index {traffic_index} is outside 0..={MAX_TRAFFIC_INDEX}"
                ),
            });
        }
        let precipitation = self.precipitation.unwrap_or(0.0);
        if precipitation < 0.0 {
            return Err(AnalyticsError::Import {
                line,
                message: format!("precipitation {precipitation} is negative"),
            });
        }
        Ok((
            self.space_id,
            OccupancyRecord {
                timestamp: self.timestamp,
                occupied_count: self.occupied_count,
                temperature: self.temperature,
                pressure: self.pressure,
                precipitation,
                traffic_index,
                is_holiday: self.is_holiday.unwrap_or(false),
            },
        ))
    }
}

/// Reads `(space_id, record)` pairs from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row is malformed.
pub fn read_records_file(path: &Path) -> Result<Vec<(u32, OccupancyRecord)>> {
    let file = File::open(path)?;
    let records = read_records(file)?;
    info!(path = %path.display(), records = records.len(), "records imported");
    Ok(records)
}

/// Reads `(space_id, record)` pairs from CSV with a [`RECORDS_HEADER`] header.
///
/// Rows are returned in file order; sorting is the record set's job.
///
/// # Errors
///
/// Returns [`AnalyticsError::Csv`] for unparseable rows and
/// [`AnalyticsError::Import`] for rows with out-of-range values.
pub fn read_records(reader: impl Read) -> Result<Vec<(u32, OccupancyRecord)>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut raw = csv::StringRecord::new();
    let mut out = Vec::new();
    while rdr.read_record(&mut raw)? {
        let line = raw.position().map_or(0, csv::Position::line);
        let row: RecordRow = raw.deserialize(Some(&headers))?;
        out.push(row.into_record(line)?);
    }
    Ok(out)
}
