//! Output-shape types: the row composer's intermediate representation and
//! the two library-level aggregate results (`decodeFlight`, `summarizeFlights`).

/// One decoded record, still structured (not yet stringified to CSV) so the
/// row composer's post-passes (component G) can inspect and mutate columns
/// — MARK edge suppression, repeat carry, generic carry-forward, GPS
/// smoothing — before final formatting.
#[derive(Debug, Clone)]
pub struct RecordRow {
    pub date: String,
    pub time: String,
    /// One formatted string per configured sensor, in table order.
    pub columns: Vec<String>,
    /// Set when this row came from a `mult` repeat rather than fresh data
    /// bytes; the composer uses it to decide which columns to carry
    /// forward from the previous row.
    pub is_repeat: bool,
    /// The raw MARK glyph emitted this record (empty string if none), kept
    /// alongside the formatted column so edge-suppression (rule 1) can
    /// compare against the previous row without re-parsing `columns`.
    pub mark: String,
}

/// Result of `decode_flight`: header row plus every post-processed data row.
#[derive(Debug, Clone)]
pub struct DecodedFlight {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One entry of `summarize_flights()`'s per-flight summary.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightSummary {
    pub id: u16,
    pub date: String,
    pub time_off: String,
    pub time_in: String,
    pub samples: usize,
    pub tach_start: f64,
    pub tach_end: f64,
    pub tach_duration: f64,
    pub hobb_duration: f64,
    pub start_lat: Option<String>,
    pub start_lng: Option<String>,
    pub end_lat: Option<String>,
    pub end_lng: Option<String>,
}
