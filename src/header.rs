//! Component C: parses a flight's fixed prelude starting at its directory
//! offset, seeding the per-flight state the record decoder consumes.

use crate::cursor::{ByteCursor, LONG_UNDERFLOW};
use crate::error::{JpiError, Result};
use crate::types::{DeviceProfile, FlightDirectoryEntry, FlightPrelude};

pub fn parse_flight_prelude(
    data: &[u8],
    device: &DeviceProfile,
    entry: &FlightDirectoryEntry,
) -> Result<FlightPrelude> {
    let mut cursor = ByteCursor::new(data);
    cursor.set_position(entry.start);

    let id = cursor.word();
    if id != entry.id as i32 {
        return Err(JpiError::MalformedMetadata(format!(
            "flight header id {id} does not match directory id {}",
            entry.id
        )));
    }

    let mut cfg_word = [0u16; 5];
    cfg_word[0] = cursor.word() as u16;
    cfg_word[1] = cursor.word() as u16;

    let mut start_lat = None;
    let mut start_lng = None;

    if device.edm_type {
        cfg_word[2] = cursor.word() as u16;
        cfg_word[3] = cursor.word() as u16;
        cfg_word[4] = cursor.word() as u16;

        if device.model == 900 && device.build_number >= 1000 && cfg_word[4] & 0x78 != 0 {
            let lat = cursor.long();
            let lng = cursor.long();
            if lat != LONG_UNDERFLOW {
                start_lat = Some(lat);
            }
            if lng != LONG_UNDERFLOW {
                start_lng = Some(lng);
            }
        }
    }

    let fuel_unit_byte = cursor.byte() as u8;
    // Horsepower has no downstream consumer in this profile (the HP column
    // comes from its own record data bytes, component D) — read and discard
    // only to advance the cursor past it to `record_interval`.
    let _horsepower = cursor.byte();

    let record_interval = cursor.word() as u16;

    let packed_date = cursor.word() as u16;
    let day = packed_date & 0x1f;
    let month = (packed_date >> 5) & 0x0f;
    let year_offset = (packed_date >> 9) & 0x7f;
    let year = if year_offset >= 75 {
        1900 + year_offset as u32
    } else {
        2000 + year_offset as u32
    };
    let start_date = format!("{month:02}/{day:02}/{year:04}");

    let packed_time = cursor.word() as u16;
    let seconds = (packed_time & 0x1f) as u32 * 2;
    let minutes = (packed_time >> 5) & 0x3f;
    let hours = (packed_time >> 11) & 0x1f;
    let start_time = format!("{hours:02}:{minutes:02}:{seconds:02}");

    let _checksum = cursor.byte();

    let rec_start = cursor.position();

    Ok(FlightPrelude {
        cfg_word,
        start_lat,
        start_lng,
        fuel_unit_byte,
        record_interval,
        original_interval: record_interval,
        start_date,
        start_time,
        rec_start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChecksumProtocol, FuelUnit, TempUnit};

    fn device(edm_type: bool) -> DeviceProfile {
        DeviceProfile {
            model: 930,
            firmware_version: 107,
            build_number: 1005,
            beta: false,
            twin: false,
            edm_type,
            engine_temp_unit: TempUnit::Fahrenheit,
            oat_unit: TempUnit::Fahrenheit,
            fuel_unit: FuelUnit::Gallon,
            checksum_protocol: ChecksumProtocol::Xor,
            user_name: String::new(),
            cfg_high: 0,
            cfg_low: 0,
        }
    }

    #[test]
    fn non_edm_type_skips_cfg_word_2_through_4_and_coordinates() {
        let mut data = Vec::new();
        data.extend_from_slice(&559u16.to_be_bytes()); // id
        data.extend_from_slice(&0x1234u16.to_be_bytes()); // cfgWord[0]
        data.extend_from_slice(&0x5678u16.to_be_bytes()); // cfgWord[1]
        data.push(0); // fuel unit
        data.push(180); // horsepower
        data.extend_from_slice(&2u16.to_be_bytes()); // interval
        data.extend_from_slice(&0u16.to_be_bytes()); // date
        data.extend_from_slice(&0u16.to_be_bytes()); // time
        data.push(0); // checksum

        let entry = FlightDirectoryEntry {
            id: 559,
            size_bytes: data.len(),
            start: 0,
            found: true,
        };
        let prelude = parse_flight_prelude(&data, &device(false), &entry).unwrap();
        assert_eq!(prelude.cfg_word[0], 0x1234);
        assert_eq!(prelude.cfg_word[1], 0x5678);
        assert_eq!(prelude.cfg_word[2], 0);
        assert_eq!(prelude.record_interval, 2);
        assert_eq!(prelude.record_interval, prelude.original_interval);
        assert!(prelude.start_lat.is_none());
        assert_eq!(prelude.rec_start, data.len());
    }

    #[test]
    fn mismatched_id_is_an_error() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u16.to_be_bytes());
        let entry = FlightDirectoryEntry {
            id: 559,
            size_bytes: data.len(),
            start: 0,
            found: true,
        };
        let err = parse_flight_prelude(&data, &device(false), &entry).unwrap_err();
        assert!(matches!(err, JpiError::MalformedMetadata(_)));
    }

    #[test]
    fn packed_date_and_time_format() {
        let mut data = Vec::new();
        data.extend_from_slice(&559u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.push(0);
        data.push(0);
        data.extend_from_slice(&1u16.to_be_bytes());
        // day=15, month=3, year_offset=26 (2026) -> packed = 26<<9 | 3<<5 | 15
        let packed_date: u16 = (26u16 << 9) | (3u16 << 5) | 15u16;
        data.extend_from_slice(&packed_date.to_be_bytes());
        // hours=13, minutes=45, seconds ticks=5 (10s) -> packed = 13<<11 | 45<<5 | 5
        let packed_time: u16 = (13u16 << 11) | (45u16 << 5) | 5u16;
        data.extend_from_slice(&packed_time.to_be_bytes());
        data.push(0);

        let entry = FlightDirectoryEntry {
            id: 559,
            size_bytes: data.len(),
            start: 0,
            found: true,
        };
        let prelude = parse_flight_prelude(&data, &device(false), &entry).unwrap();
        assert_eq!(prelude.start_date, "03/15/2026");
        assert_eq!(prelude.start_time, "13:45:10");
    }
}
