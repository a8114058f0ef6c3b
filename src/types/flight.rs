//! Per-flight directory and header types.

/// One entry in the flight directory assembled from `$D` metadata records.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightDirectoryEntry {
    pub id: u16,
    pub size_bytes: usize,
    pub start: usize,
    pub found: bool,
}

/// The fixed prelude at the start of a flight's binary block, parsed by
/// `crate::header::parse_flight_prelude`. Exists only while a flight is
/// open; reconstructed on every `open_flight` call.
#[derive(Debug, Clone)]
pub struct FlightPrelude {
    /// Slots 0/1 always present; 2-4 only for EDM-type devices.
    pub cfg_word: [u16; 5],
    pub start_lat: Option<i32>,
    pub start_lng: Option<i32>,
    /// Per-flight fuel-unit byte (0 = gallons, 1 = pounds): the authoritative
    /// source for fuel-channel scaling, read fresh from this flight's own
    /// prelude rather than the device-level `$F` metadata record.
    pub fuel_unit_byte: u8,
    /// Seconds between samples; MARK glyphs may mutate this mid-flight.
    pub record_interval: u16,
    /// The interval to restore to when a MARK glyph ends a 1-second window.
    pub original_interval: u16,
    pub start_date: String,
    pub start_time: String,
    /// Absolute byte offset of the first record, i.e. `recStart`.
    pub rec_start: usize,
}

impl FlightPrelude {
    pub fn cfg_bit_set(&self, byte_idx: usize, bit: u32) -> bool {
        self.cfg_word
            .get(byte_idx)
            .map(|w| (w & (1 << bit)) != 0)
            .unwrap_or(false)
    }
}

/// One row of `decodejpi <file>`'s flight listing: directory entry plus the
/// cheap-to-parse prelude fields a listing wants without decoding records.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightListing {
    pub id: u16,
    pub size_bytes: usize,
    pub start: usize,
    pub date: String,
    pub time: String,
    pub interval: u16,
}
