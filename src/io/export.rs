//! CSV export for history series and forecasts.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::analytics::forecast::ForecastPoint;
use crate::analytics::smoother::SeriesPoint;

/// Column header for history-series export.
pub const SERIES_HEADER: &str = "timestamp,occupied_count";

/// Column header for forecast export.
pub const FORECAST_HEADER: &str = "timestamp,day_of_week,hour,predicted_count,basis";

/// Exports a history series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series_csv(points: &[SeriesPoint], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_series_csv(points, io::BufWriter::new(file))
}

/// Writes a history series as CSV to any writer.
///
/// Timestamps are RFC 3339; counts carry four decimals so output is
/// deterministic for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series_csv(points: &[SeriesPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SERIES_HEADER.split(','))?;
    for p in points {
        wtr.write_record(&[p.timestamp.to_rfc3339(), format!("{:.4}", p.occupied_count)])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports forecast points to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_forecast_csv(points: &[ForecastPoint], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_forecast_csv(points, io::BufWriter::new(file))
}

/// Writes forecast points as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_forecast_csv(points: &[ForecastPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(FORECAST_HEADER.split(','))?;
    for p in points {
        wtr.write_record(&[
            p.timestamp.to_rfc3339(),
            p.day_of_week.to_string(),
            p.hour.to_string(),
            format!("{:.4}", p.predicted_count),
            p.basis.as_str().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::forecast::ForecastModel;
    use crate::analytics::records::RecordSet;
    use chrono::{Duration, TimeZone, Utc};

    fn series(n: usize) -> Vec<SeriesPoint> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| SeriesPoint {
                timestamp: t0 + Duration::hours(i as i64),
                occupied_count: i as f64 / 3.0,
            })
            .collect()
    }

    #[test]
    fn series_header_and_row_count() {
        let mut buf = Vec::new();
        write_series_csv(&series(24), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        assert_eq!(lines.first().copied(), Some(SERIES_HEADER));
        // 1 header + 24 data rows
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[2], "2024-01-01T01:00:00+00:00,0.3333");
    }

    #[test]
    fn deterministic_output() {
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_series_csv(&series(5), &mut buf1).ok();
        write_series_csv(&series(5), &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn forecast_rows_are_parseable() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 14, 23, 0).unwrap();
        let points = ForecastModel::fit(&RecordSet::default()).forecast(now);
        let mut buf = Vec::new();
        write_forecast_csv(&points, &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(5));

        let mut rows = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            let rec = rec.unwrap_or_default();
            let day: Result<u8, _> = rec[1].parse();
            assert!(day.is_ok_and(|d| d < 7));
            let value: Result<f64, _> = rec[3].parse();
            assert_eq!(value.ok(), Some(0.0));
            assert_eq!(&rec[4], "default");
            rows += 1;
        }
        assert_eq!(rows, 168);
    }
}
