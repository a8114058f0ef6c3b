//! Sensor mapping table types (component D) and per-channel decode state.
//!
//! A tagged-variant `ChannelKind` replaces the scattered `if name == "LAT"`
//! style a hand-rolled decoder would otherwise need, so the value shaper
//! (`crate::shaper`) dispatches on type instead of string comparison.

/// How a channel's running total becomes its formatted output value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Plain integer running total, scale 1.
    Integer,
    /// One-decimal fixed point running total, scale 10.
    Fixed1,
    /// Latitude: `N`/`S` + `DD.MM.SS`-style formatting.
    Latitude,
    /// Longitude: `E`/`W` + `DDD.MM.SS`-style formatting.
    Longitude,
    /// The synthetic MARK control channel.
    Mark,
    /// Computed from other channels in the same record (DIF/LDIF); carries
    /// no source data bytes of its own.
    Computed,
    /// Fuel-bearing channel: scale is 10 when the device's fuel unit is
    /// gallons, 1 otherwise.
    Fuel,
}

/// A byte-group/bit address into a record's per-group data bytes, or the
/// `(-1, -1)` sentinel meaning "no source byte" (computed channels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteAddr {
    pub group: i8,
    pub bit: i8,
}

impl ByteAddr {
    pub const NONE: ByteAddr = ByteAddr { group: -1, bit: -1 };

    pub const fn new(group: i8, bit: i8) -> Self {
        Self { group, bit }
    }

    pub fn is_present(self) -> bool {
        self.group >= 0 && self.bit >= 0
    }
}

/// One row of the static sensor mapping table (component D). Invariant:
/// `lo.group`/`hi.group` ∈ `0..15`, `lo.bit`/`hi.bit` ∈ `0..7` when present.
#[derive(Debug, Clone, Copy)]
pub struct SensorDescriptor {
    pub header: &'static str,
    pub kind: ChannelKind,
    pub cfg_byte: usize,
    pub cfg_bit: u32,
    pub lo: ByteAddr,
    pub hi: ByteAddr,
}

impl SensorDescriptor {
    pub const fn new(
        header: &'static str,
        kind: ChannelKind,
        cfg_byte: usize,
        cfg_bit: u32,
        lo: ByteAddr,
        hi: ByteAddr,
    ) -> Self {
        Self {
            header,
            kind,
            cfg_byte,
            cfg_bit,
            lo,
            hi,
        }
    }

    pub fn has_hi(&self) -> bool {
        self.hi.is_present()
    }
}

/// Per-active-sensor, per-flight decode state. Reset on every `open_flight`;
/// persists across records within a flight.
#[derive(Debug, Clone, Copy)]
pub struct ChannelState {
    pub running_total: i64,
    pub valid: bool,
    pub sign: bool,
    pub raw: i32,
}

impl ChannelState {
    /// Default accumulator seed is 240, except HP which starts at 0 for
    /// single-engine profiles.
    pub fn default_for(header: &str) -> Self {
        let seed = if header == "HP" { 0 } else { 240 };
        Self {
            running_total: seed,
            valid: false,
            sign: false,
            raw: 0,
        }
    }

    /// LAT/LNG seed from the flight prelude's starting coordinate when
    /// finite; `seed` is `None` on coordinate underflow, leaving the
    /// channel unseeded rather than poisoned with a bogus numeric value.
    pub fn seeded(seed: Option<i32>) -> Self {
        match seed {
            Some(v) => Self {
                running_total: v as i64,
                valid: true,
                sign: false,
                raw: v,
            },
            None => Self {
                running_total: 0,
                valid: false,
                sign: false,
                raw: 0,
            },
        }
    }
}
