//! Component D: static sensor mapping table for the EDM900/930
//! single-engine profile at firmware ≥ 107.
//!
//! A table of `(cfgByte, cfgBit) -> (byteGroup, bitInGroup)` entries in
//! place of the scattered conditional arithmetic a hand-written decoder
//! would otherwise need, following the same constant-table idiom used
//! elsewhere in this crate. Other firmware/model variants get their own
//! table rather than branches added to this one.

use crate::types::{ByteAddr, ChannelKind, SensorDescriptor};

const NONE: ByteAddr = ByteAddr::NONE;

pub static SENSOR_TABLE: &[SensorDescriptor] = &[
    SensorDescriptor::new("E1", ChannelKind::Integer, 0, 0, ByteAddr::new(0, 0), NONE),
    SensorDescriptor::new("E2", ChannelKind::Integer, 0, 1, ByteAddr::new(0, 1), NONE),
    SensorDescriptor::new("E3", ChannelKind::Integer, 0, 2, ByteAddr::new(0, 2), NONE),
    SensorDescriptor::new("E4", ChannelKind::Integer, 0, 3, ByteAddr::new(0, 3), NONE),
    SensorDescriptor::new("C1", ChannelKind::Integer, 0, 4, ByteAddr::new(0, 4), NONE),
    SensorDescriptor::new("C2", ChannelKind::Integer, 0, 5, ByteAddr::new(0, 5), NONE),
    SensorDescriptor::new("C3", ChannelKind::Integer, 0, 6, ByteAddr::new(0, 6), NONE),
    SensorDescriptor::new("C4", ChannelKind::Integer, 0, 7, ByteAddr::new(0, 7), NONE),
    SensorDescriptor::new("OAT", ChannelKind::Integer, 0, 8, ByteAddr::new(1, 0), NONE),
    SensorDescriptor::new("DIF", ChannelKind::Computed, 0, 9, NONE, NONE),
    SensorDescriptor::new("CLD", ChannelKind::Integer, 0, 10, ByteAddr::new(1, 1), NONE),
    SensorDescriptor::new("MAP", ChannelKind::Fixed1, 0, 11, ByteAddr::new(1, 2), NONE),
    SensorDescriptor::new(
        "RPM",
        ChannelKind::Integer,
        0,
        12,
        ByteAddr::new(1, 3),
        ByteAddr::new(1, 4),
    ),
    SensorDescriptor::new("HP", ChannelKind::Integer, 0, 13, ByteAddr::new(1, 5), NONE),
    SensorDescriptor::new("FF", ChannelKind::Fuel, 0, 14, ByteAddr::new(1, 6), NONE),
    SensorDescriptor::new("FF2", ChannelKind::Fuel, 0, 15, ByteAddr::new(1, 7), NONE),
    SensorDescriptor::new("FP", ChannelKind::Fixed1, 1, 0, ByteAddr::new(2, 0), NONE),
    SensorDescriptor::new("OILP", ChannelKind::Integer, 1, 1, ByteAddr::new(2, 1), NONE),
    SensorDescriptor::new("BAT", ChannelKind::Fixed1, 1, 2, ByteAddr::new(2, 2), NONE),
    SensorDescriptor::new("AMP", ChannelKind::Integer, 1, 3, ByteAddr::new(2, 3), NONE),
    SensorDescriptor::new("OILT", ChannelKind::Integer, 1, 4, ByteAddr::new(2, 4), NONE),
    SensorDescriptor::new("USD", ChannelKind::Fuel, 1, 5, ByteAddr::new(2, 5), NONE),
    SensorDescriptor::new("USD2", ChannelKind::Fuel, 1, 6, ByteAddr::new(2, 6), NONE),
    SensorDescriptor::new("RFL", ChannelKind::Fuel, 1, 7, ByteAddr::new(2, 7), NONE),
    SensorDescriptor::new("LFL", ChannelKind::Fuel, 1, 8, ByteAddr::new(3, 0), NONE),
    SensorDescriptor::new(
        "HRS",
        ChannelKind::Fixed1,
        1,
        9,
        ByteAddr::new(3, 1),
        ByteAddr::new(3, 2),
    ),
    SensorDescriptor::new("SPD", ChannelKind::Integer, 1, 10, ByteAddr::new(3, 3), NONE),
    SensorDescriptor::new("ALT", ChannelKind::Integer, 1, 11, ByteAddr::new(3, 4), NONE),
    SensorDescriptor::new(
        "LAT",
        ChannelKind::Latitude,
        1,
        12,
        ByteAddr::new(3, 5),
        ByteAddr::new(3, 6),
    ),
    SensorDescriptor::new(
        "LNG",
        ChannelKind::Longitude,
        1,
        13,
        ByteAddr::new(3, 7),
        ByteAddr::new(4, 0),
    ),
    SensorDescriptor::new("MARK", ChannelKind::Mark, 1, 14, ByteAddr::new(4, 1), NONE),
];

/// The sensors active for this flight, in table order: a channel appears
/// iff `cfgWord[cfgByte] & (1 << cfgBit) != 0`.
pub fn active_sensors(cfg_word: &[u16; 5]) -> Vec<&'static SensorDescriptor> {
    SENSOR_TABLE
        .iter()
        .filter(|s| {
            cfg_word
                .get(s.cfg_byte)
                .map(|w| w & (1 << s.cfg_bit) != 0)
                .unwrap_or(false)
        })
        .collect()
}
