//! Device-profile types populated once per file by the metadata scanner
//! (`crate::metadata`) and frozen thereafter.

/// Fuel unit reported by a `$F` metadata record.
///
/// The scanner keeps the raw byte for any value outside the known pair
/// rather than erroring — fuel unit only selects a display scale factor for
/// fuel channels, never record framing, so an unrecognized byte should not
/// abort a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FuelUnit {
    Gallon,
    Pound,
    Other(u8),
}

impl FuelUnit {
    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => FuelUnit::Gallon,
            1 => FuelUnit::Pound,
            other => FuelUnit::Other(other),
        }
    }

    /// The scale applied to fuel-bearing channels: 10 for gallons, 1
    /// otherwise.
    pub fn fuel_scale(self) -> u16 {
        match self {
            FuelUnit::Gallon => 10,
            _ => 1,
        }
    }
}

/// Checksum protocol declared by a `$C`/`$P` record. Never actually
/// verified — kept only so a future strict mode has somewhere to read it
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChecksumProtocol {
    Xor,
    SumMod256,
}

/// Temperature unit used for engine and OAT channels, set per `$C` bit
/// flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TempUnit {
    Celsius,
    Fahrenheit,
}

/// Immutable per-file device description, populated once by the metadata
/// scanner and never mutated afterward.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceProfile {
    pub model: u32,
    pub firmware_version: u32,
    pub build_number: u32,
    pub beta: bool,
    pub twin: bool,
    pub edm_type: bool,
    pub engine_temp_unit: TempUnit,
    pub oat_unit: TempUnit,
    pub fuel_unit: FuelUnit,
    pub checksum_protocol: ChecksumProtocol,
    pub user_name: String,
    /// First config value from the `$C` record, split into hex nibbles.
    /// Not consumed by the record decoder; kept for diagnostics.
    pub cfg_high: u8,
    pub cfg_low: u8,
}

impl DeviceProfile {
    /// Twin-engine models report as `760`, `790`, or `960`.
    pub fn is_twin_model(model: u32) -> bool {
        matches!(model, 760 | 790 | 960)
    }
}
