//! JPI Parser
//!
//! Decodes J.P. Instruments EDM engine data monitor flight logs (`.JPI`,
//! EDM900/930 single-engine) into tabular per-sample records ready for CSV
//! export.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jpi_parser::JpiDecoder;
//!
//! let bytes = std::fs::read("flight.JPI").unwrap();
//! let decoder = JpiDecoder::parse(bytes).unwrap();
//! for flight in decoder.list_flights() {
//!     println!("flight {} recorded {}", flight.id, flight.date);
//! }
//! ```

pub mod cursor;
pub mod error;
pub mod export;
pub mod types;

mod compose;
mod decoder;
mod header;
mod metadata;
mod sensors;
mod shaper;
mod summary;
mod timeutil;

use error::{JpiError, Result};
use types::{
    DecodedFlight, DeviceProfile, FlightDirectoryEntry, FlightListing, FlightSummary, RecordRow,
};

pub use decoder::{DecodedRecord, RawSample, RecordDecoder};
pub use sensors::SENSOR_TABLE;

/// Parses a `.JPI` file's metadata once, then serves its flight directory
/// for as many `open_flight`/`decode_flight` calls as needed. Holds the
/// whole file in memory, since JPI files are small.
pub struct JpiDecoder {
    data: Vec<u8>,
    device: DeviceProfile,
    directory: Vec<FlightDirectoryEntry>,
}

impl JpiDecoder {
    /// Scans `data`'s metadata block and resolves the flight directory.
    ///
    /// A model outside the declared EDM900/930 single-engine mapping table
    /// (component D) is a decode error rather than a guess at an unfamiliar
    /// sensor layout.
    pub fn parse(data: Vec<u8>) -> Result<Self> {
        let scan = metadata::scan(&data)?;
        if !matches!(scan.device.model, 900 | 930) || scan.device.twin {
            return Err(JpiError::UnknownModel(scan.device.model));
        }
        Ok(Self {
            data,
            device: scan.device,
            directory: scan.directory,
        })
    }

    /// Convenience wrapper reading the whole file into memory before parsing.
    pub fn parse_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(JpiError::Io)?;
        Self::parse(data)
    }

    pub fn device_profile(&self) -> &DeviceProfile {
        &self.device
    }

    /// The flights found in the directory, each with its prelude parsed
    /// just far enough to report date/time/interval. Flights the recovery
    /// probe could not locate are omitted.
    pub fn list_flights(&self) -> Vec<FlightListing> {
        self.directory
            .iter()
            .filter(|entry| entry.found)
            .filter_map(|entry| {
                let prelude = header::parse_flight_prelude(&self.data, &self.device, entry).ok()?;
                Some(FlightListing {
                    id: entry.id,
                    size_bytes: entry.size_bytes,
                    start: entry.start,
                    date: prelude.start_date,
                    time: prelude.start_time,
                    interval: prelude.record_interval,
                })
            })
            .collect()
    }

    fn find_entry(&self, id: u16) -> Result<&FlightDirectoryEntry> {
        self.directory
            .iter()
            .find(|entry| entry.id == id && entry.found)
            .ok_or(JpiError::FlightNotFound(id))
    }

    /// Opens one flight for streaming record-by-record decode.
    pub fn open_flight(&self, id: u16) -> Result<FlightSession<'_>> {
        let entry = self.find_entry(id)?;
        let prelude = header::parse_flight_prelude(&self.data, &self.device, entry)?;
        let sensors = sensors::active_sensors(&prelude.cfg_word);

        let shaper = shaper::ValueShaper::new(
            sensors.clone(),
            types::FuelUnit::from_byte(prelude.fuel_unit_byte),
            prelude.start_lat,
            prelude.start_lng,
            prelude.record_interval,
        );
        let decoder = decoder::RecordDecoder::new(
            &self.data,
            prelude.rec_start,
            entry.start + entry.size_bytes,
            self.device.edm_type,
        );

        let mut headers = vec!["DATE".to_string(), "TIME".to_string()];
        let sensor_headers: Vec<&'static str> = sensors.iter().map(|s| s.header).collect();
        headers.extend(sensor_headers.iter().map(|h| h.to_string()));

        Ok(FlightSession {
            headers,
            sensor_headers,
            decoder,
            shaper,
            date: prelude.start_date,
            time: prelude.start_time,
            done: false,
        })
    }

    /// Decodes a flight fully, applying the row composer's post-passes, and
    /// returns the header row plus every data row as plain strings.
    pub fn decode_flight(&self, id: u16) -> Result<DecodedFlight> {
        let mut session = self.open_flight(id)?;
        let sensor_headers = session.sensor_headers.clone();

        let mut rows = Vec::new();
        while let Some(row) = session.read_record() {
            rows.push(row);
        }
        compose::compose(&sensor_headers, &mut rows);

        let string_rows = rows
            .into_iter()
            .map(|row| {
                let mut values = Vec::with_capacity(row.columns.len() + 2);
                values.push(row.date);
                values.push(row.time);
                values.extend(row.columns);
                values
            })
            .collect();

        Ok(DecodedFlight {
            headers: session.headers,
            rows: string_rows,
        })
    }

    /// Per-flight tach/hobbs/position summaries for every flight the
    /// directory resolved and decoded successfully.
    pub fn summarize_flights(&self) -> Vec<FlightSummary> {
        self.directory
            .iter()
            .filter(|entry| entry.found)
            .filter_map(|entry| {
                let decoded = self.decode_flight(entry.id).ok()?;
                summary::summarize(entry.id, &decoded)
            })
            .collect()
    }

    /// Tach/hobbs/position summary for one flight, used by the CLI's
    /// tach-line composition when writing a single flight's CSV.
    pub fn summarize_flight(&self, id: u16) -> Result<FlightSummary> {
        let decoded = self.decode_flight(id)?;
        summary::summarize(id, &decoded)
            .ok_or_else(|| JpiError::Export(format!("flight {id} has no data rows to summarize")))
    }
}

/// An open flight mid-decode: owns the record decoder and value shaper and
/// advances the DATE/TIME prefix by the (possibly MARK-mutated) record
/// interval after every row. Not thread-safe; one instance per flight.
pub struct FlightSession<'a> {
    headers: Vec<String>,
    sensor_headers: Vec<&'static str>,
    decoder: decoder::RecordDecoder<'a>,
    shaper: shaper::ValueShaper,
    date: String,
    time: String,
    done: bool,
}

impl<'a> FlightSession<'a> {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Decodes and shapes the next record, advancing the DATE/TIME prefix
    /// for the record after that. Returns `None` once the stream ends.
    pub fn read_record(&mut self) -> Option<RecordRow> {
        if self.done {
            return None;
        }
        let Some(decoded) = self.decoder.next_record() else {
            self.done = true;
            return None;
        };

        let (columns, mark) = self.shaper.shape(&decoded);
        let row = RecordRow {
            date: self.date.clone(),
            time: self.time.clone(),
            columns,
            is_repeat: decoded.is_repeat,
            mark,
        };

        timeutil::advance(&mut self.date, &mut self.time, self.shaper.interval());
        Some(row)
    }
}
