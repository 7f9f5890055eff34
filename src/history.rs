//! Loader for semicolon-delimited GPS exports.
//!
//! Exports start with some preamble lines, followed by a header whose first cell contains
//! `UTC-Time`. Every row after the header is a fix of the form `time;lat;lon;...` using
//! decimal commas. Rows that don't parse are dropped: exports regularly contain partial
//! lines and summary rows, and they carry no position we could serve anyway.

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::{error::ParseError, model::PositionRecord};

const HEADER_MARKER: &str = "UTC-Time";
const LOCATION_LABEL: &str = "GPS-Testdaten";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    File,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No export path was configured
    NotConfigured,
    NotFound,
    /// The export was read but contained no usable row
    NoValidRows,
}

/// Positions loaded at startup. Never empty.
#[derive(Debug, Clone)]
pub struct History {
    records: Vec<PositionRecord>,
    source: HistorySource,
}

impl History {
    fn fallback(reason: FallbackReason) -> Self {
        History {
            records: vec![PositionRecord::fallback()],
            source: HistorySource::Fallback(reason),
        }
    }

    pub fn records(&self) -> &[PositionRecord] {
        &self.records
    }

    pub fn source(&self) -> HistorySource {
        self.source
    }

    pub fn first(&self) -> PositionRecord {
        match self.records.first() {
            Some(record) => record.clone(),
            None => PositionRecord::fallback(),
        }
    }
}

/// Load an export, falling back to the hardcoded position if the file doesn't exist or
/// yields no rows. Any other read error is returned.
pub fn load(path: Option<&Path>) -> Result<History> {
    let Some(path) = path else {
        info!("no csv export configured, using fallback position");
        return Ok(History::fallback(FallbackReason::NotConfigured));
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "csv export not found, using fallback position");
            return Ok(History::fallback(FallbackReason::NotFound));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open {}", path.display()));
        }
    };

    let records =
        parse(file).with_context(|| format!("Failed to read {}", path.display()))?;
    if records.is_empty() {
        warn!(path = %path.display(), "csv export has no valid rows, using fallback position");
        return Ok(History::fallback(FallbackReason::NoValidRows));
    }

    info!(path = %path.display(), count = records.len(), "loaded position history");
    Ok(History {
        records,
        source: HistorySource::File,
    })
}

/// Parse all data rows of an export. Rows before the header are ignored and rows that
/// fail [`parse_row`] are skipped.
pub fn parse<R: Read>(reader: R) -> Result<Vec<PositionRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut output = Vec::new();
    let mut header_found = false;
    for result in reader.records() {
        let row = result?;
        let first = row.get(0).unwrap_or_default();
        if first.trim().is_empty() {
            continue;
        }
        if first.contains(HEADER_MARKER) {
            header_found = true;
            continue;
        }
        if !header_found {
            continue;
        }

        match parse_row(&row) {
            Ok(record) => output.push(record),
            Err(e) => {
                let line = row.position().map(|p| p.line()).unwrap_or_default();
                debug!(line, "skipping row: {e}");
            }
        }
    }

    Ok(output)
}

/// Convert a single data row into a position.
pub fn parse_row(row: &StringRecord) -> Result<PositionRecord, ParseError> {
    if row.len() < 3 {
        return Err(ParseError::TooFewCells { found: row.len() });
    }

    let time = normalize(&row[0]);
    let lat = decimal(&row[1]);
    let lon = decimal(&row[2]);

    let lat: f64 = lat
        .parse()
        .map_err(|source| ParseError::InvalidLatitude { value: lat.clone(), source })?;
    let lon: f64 = lon
        .parse()
        .map_err(|source| ParseError::InvalidLongitude { value: lon.clone(), source })?;
    // coordinates must be finite, "nan" and "inf" parse as f64
    for value in [lat, lon] {
        if !value.is_finite() {
            return Err(ParseError::NonFinite {
                value: value.to_string(),
            });
        }
    }

    Ok(PositionRecord {
        lat,
        lon,
        location: LOCATION_LABEL.to_string(),
        speed: 0.0,
        altitude: 0.0,
        timestamp: time,
    })
}

fn normalize(cell: &str) -> String {
    cell.replace('|', ";").trim().trim_matches('"').to_string()
}

fn decimal(cell: &str) -> String {
    normalize(cell).replace(',', ".").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> StringRecord {
        StringRecord::from(cells.to_vec())
    }

    #[test]
    fn single_row_export() {
        let data = "UTC-Time;Lat;Lon\n\"12:00:00\";\"51,123\";\"12,456\"";
        let records = parse(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.lat, 51.123);
        assert_eq!(record.lon, 12.456);
        assert_eq!(record.speed, 0.0);
        assert_eq!(record.altitude, 0.0);
        assert_eq!(record.timestamp, "12:00:00");
        assert_eq!(record.location, "GPS-Testdaten");
    }

    #[test]
    fn rows_before_header_ignored() {
        let data = "\
10:00:00;1,0;2,0
Device;Tracker 7
UTC-Time;Latitude;Longitude;Height
10:00:01;51,5;12,5;100
";
        let records = parse(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, "10:00:01");
    }

    #[test]
    fn no_header_means_no_rows() {
        let data = "10:00:00;51,0;12,0\n10:00:01;51,1;12,1\n";
        assert!(parse(data.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn bad_rows_skipped() {
        let data = "\
UTC-Time;Lat;Lon
10:00:00;51,0
10:00:01;north;12,0
10:00:02;51,0;east
10:00:04;nan;12,0
10:00:05;51,0;inf
10:00:06;1e400;-infinity
;51,0;12,0

10:00:03;51,25;12,75
";
        let records = parse(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lat, 51.25);
        assert_eq!(records[0].lon, 12.75);
    }

    #[test]
    fn negative_and_whitespace() {
        let record = parse_row(&row(&[" \"08:15:00\" ", " \"-33,8688\" ", "151,2093 "])).unwrap();
        assert_eq!(record.timestamp, "08:15:00");
        assert_eq!(record.lat, -33.8688);
        assert_eq!(record.lon, 151.2093);
    }

    #[test]
    fn pipe_in_time_cell() {
        let record = parse_row(&row(&["2024-01-01|12:00", "1,5", "2,5"])).unwrap();
        assert_eq!(record.timestamp, "2024-01-01;12:00");
    }

    #[test]
    fn row_errors() {
        assert!(matches!(
            parse_row(&row(&["12:00:00", "51,0"])),
            Err(ParseError::TooFewCells { found: 2 })
        ));
        assert!(matches!(
            parse_row(&row(&["12:00:00", "", "12,0"])),
            Err(ParseError::InvalidLatitude { .. })
        ));
        assert!(matches!(
            parse_row(&row(&["12:00:00", "51,0", "1,2,3"])),
            Err(ParseError::InvalidLongitude { .. })
        ));
        assert!(matches!(
            parse_row(&row(&["12:00:00", "NaN", "12,0"])),
            Err(ParseError::NonFinite { .. })
        ));
    }

    #[test]
    fn non_finite_rows_never_serialize_null() {
        let data = "UTC-Time;Lat;Lon\n10:00:00;nan;inf\n";
        assert!(parse(data.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let data: &[u8] = b"UTC-Time;a;b\n\xff;1,0;2,0\n";
        assert!(parse(data).is_err());
    }

    #[test]
    fn unreadable_export_is_an_error() {
        // opening a directory succeeds on unix but reading it fails
        let dir = std::env::temp_dir();
        assert!(load(Some(&dir)).is_err());
    }

    #[test]
    fn missing_file_falls_back() {
        let path = std::env::temp_dir().join("gps-dashboard-does-not-exist.csv");
        let history = load(Some(&path)).unwrap();
        assert_eq!(
            history.source(),
            HistorySource::Fallback(FallbackReason::NotFound)
        );
        assert_eq!(history.records().len(), 1);

        let record = history.first();
        assert_eq!(record.lat, 51.33176012978327);
        assert_eq!(record.lon, 12.610844615278952);
        assert_eq!(record.altitude, 34.0);
        assert_eq!(record.location, "Brandis, Deutschland");
    }

    #[test]
    fn unconfigured_falls_back() {
        let history = load(None).unwrap();
        assert_eq!(
            history.source(),
            HistorySource::Fallback(FallbackReason::NotConfigured)
        );
        assert_eq!(history.records().len(), 1);
    }

    #[test]
    fn empty_export_falls_back() {
        let path = std::env::temp_dir().join(format!(
            "gps-dashboard-empty-{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, "UTC-Time;Lat;Lon\n;;\n").unwrap();
        let history = load(Some(&path));
        std::fs::remove_file(&path).unwrap();

        let history = history.unwrap();
        assert_eq!(
            history.source(),
            HistorySource::Fallback(FallbackReason::NoValidRows)
        );
        assert_eq!(history.first().location, "Brandis, Deutschland");
    }
}
