//! Component B: scans the leading ASCII `$`-prefixed metadata block and
//! produces the device profile plus flight directory.
//!
//! Uses a tag-dispatch idiom (prefix match, strip, parse into a struct
//! field) adapted to JPI's comma-separated, `*`-terminated records instead
//! of a newline-delimited `H `-prefixed header block.
//!
//! The exact column layout of the `$C` record (which comma field carries
//! the engine/OAT unit flag bits vs. the hex config value) is recorded in
//! DESIGN.md.

use crate::cursor::ByteCursor;
use crate::error::{JpiError, Result};
use crate::types::{ChecksumProtocol, DeviceProfile, FlightDirectoryEntry, FuelUnit, TempUnit};

/// Number of trailing bytes (checksum digits + delimiter) skipped after the
/// `*` terminator of every metadata record except `$L`, which instead marks
/// the binary data-block anchor at that exact position.
const CHECKSUM_TAIL_LEN: usize = 5;

pub struct MetadataScan {
    pub device: DeviceProfile,
    pub directory: Vec<FlightDirectoryEntry>,
}

/// Scan the metadata block and resolve the flight directory's byte offsets.
pub fn scan(data: &[u8]) -> Result<MetadataScan> {
    let anchor_idx = find_anchor(data)
        .ok_or_else(|| JpiError::MalformedMetadata("missing $U anchor".to_string()))?;

    let mut device = DeviceProfile {
        model: 0,
        firmware_version: 0,
        build_number: 0,
        beta: false,
        twin: false,
        edm_type: false,
        engine_temp_unit: TempUnit::Celsius,
        oat_unit: TempUnit::Celsius,
        fuel_unit: FuelUnit::Gallon,
        checksum_protocol: ChecksumProtocol::Xor,
        user_name: String::new(),
        cfg_high: 0,
        cfg_low: 0,
    };
    let mut directory: Vec<FlightDirectoryEntry> = Vec::new();

    let mut cursor = ByteCursor::new(data);
    cursor.set_position(anchor_idx);

    loop {
        let record = match read_record_text(&mut cursor) {
            Some(text) => text,
            None => {
                return Err(JpiError::MalformedMetadata(
                    "truncated metadata record before '*'".to_string(),
                ));
            }
        };

        let fields: Vec<&str> = record.split(',').collect();
        let tag = fields.first().copied().unwrap_or("");

        match tag {
            "$A" => {
                cursor.skip(CHECKSUM_TAIL_LEN);
            }
            "$C" => {
                apply_c_record(&fields, &mut device);
                cursor.skip(CHECKSUM_TAIL_LEN);
            }
            "$D" => {
                if let Some(entry) = parse_d_record(&fields) {
                    directory.push(entry);
                }
                cursor.skip(CHECKSUM_TAIL_LEN);
            }
            "$F" => {
                if let Some(byte) = fields.get(1).and_then(|s| s.trim().parse::<u8>().ok()) {
                    device.fuel_unit = FuelUnit::from_byte(byte);
                }
                cursor.skip(CHECKSUM_TAIL_LEN);
            }
            "$H" | "$I" | "$T" | "$W" => {
                cursor.skip(CHECKSUM_TAIL_LEN);
            }
            "$P" => {
                let protocol_id = fields.get(1).and_then(|s| s.trim().parse::<u32>().ok());
                device.checksum_protocol = match protocol_id {
                    Some(2) => ChecksumProtocol::SumMod256,
                    _ => ChecksumProtocol::Xor,
                };
                device.edm_type = true;
                cursor.skip(CHECKSUM_TAIL_LEN);
            }
            "$U" => {
                if let Some(name) = fields.get(1) {
                    device.user_name = name.trim().to_string();
                }
                cursor.skip(CHECKSUM_TAIL_LEN);
            }
            "$L" => {
                let anchor = cursor.position();
                assign_directory_offsets(&mut directory, anchor);
                break;
            }
            "$E" => break,
            _ => break,
        }
    }

    recover_flight_offsets(data, &mut directory);

    Ok(MetadataScan { device, directory })
}

fn find_anchor(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|w| w == b"$U")
}

/// Reads ASCII bytes up to and including the terminating `*`, returning the
/// text *excluding* the `*`. `None` on EOF before a `*` is found.
fn read_record_text(cursor: &mut ByteCursor) -> Option<String> {
    let mut text = String::new();
    loop {
        let b = cursor.byte();
        if b < 0 {
            return None;
        }
        if b == b'*' as i32 {
            return Some(text);
        }
        text.push(b as u8 as char);
    }
}

/// Assumed `$C` column layout (documented in DESIGN.md): tag, model,
/// firmware version (optionally `B`-suffixed for beta), build number, a
/// 16-bit flag field whose `0x1000` bit selects Fahrenheit for engine
/// temperatures, the first config value as a hex string, and a second
/// 16-bit flag field whose `0x2000` bit selects Fahrenheit for OAT.
fn apply_c_record(fields: &[&str], device: &mut DeviceProfile) {
    let model = fields
        .get(1)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(0);
    device.model = model;
    device.twin = DeviceProfile::is_twin_model(model);
    device.edm_type = device.edm_type || model >= 900;

    if let Some(raw) = fields.get(2) {
        let raw = raw.trim();
        let (numeric, beta) = match raw.strip_suffix(['B', 'b']) {
            Some(stripped) => (stripped, true),
            None => (raw, false),
        };
        device.firmware_version = numeric.parse::<u32>().unwrap_or(0);
        device.beta = beta;
    }

    device.build_number = fields
        .get(3)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(0);

    let engine_flags = fields
        .get(4)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(0);
    device.engine_temp_unit = if engine_flags & 0x1000 != 0 {
        TempUnit::Fahrenheit
    } else {
        TempUnit::Celsius
    };

    if let Some(hex) = fields.get(5) {
        if let Ok(value) = u32::from_str_radix(hex.trim(), 16) {
            device.cfg_high = ((value >> 8) & 0xff) as u8;
            device.cfg_low = (value & 0xff) as u8;
        }
    }

    let oat_flags = fields
        .get(6)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(0);
    device.oat_unit = if oat_flags & 0x2000 != 0 {
        TempUnit::Fahrenheit
    } else {
        TempUnit::Celsius
    };
}

fn parse_d_record(fields: &[&str]) -> Option<FlightDirectoryEntry> {
    let id = fields.get(1)?.trim().parse::<u16>().ok()?;
    let size_words = fields.get(2)?.trim().parse::<usize>().ok()?;
    Some(FlightDirectoryEntry {
        id,
        size_bytes: size_words * 2,
        start: 0,
        found: false,
    })
}

fn assign_directory_offsets(directory: &mut [FlightDirectoryEntry], anchor: usize) {
    let mut offset = anchor;
    for entry in directory.iter_mut() {
        entry.start = offset;
        offset += entry.size_bytes;
    }
}

/// Tolerates a single-byte drift observed in captured files: if the word at
/// an entry's assigned start doesn't match its id, try one byte earlier and
/// propagate that shift to every later entry.
fn recover_flight_offsets(data: &[u8], directory: &mut [FlightDirectoryEntry]) {
    let mut shift: i64 = 0;
    for entry in directory.iter_mut() {
        let start = (entry.start as i64 + shift) as usize;
        entry.start = start;

        let word = ByteCursor::new(data).peek_word_at(start);
        if word == entry.id as i32 {
            entry.found = true;
            continue;
        }

        if start >= 1 {
            let prev_word = ByteCursor::new(data).peek_word_at(start - 1);
            if prev_word == entry.id as i32 {
                entry.start = start - 1;
                entry.found = true;
                shift -= 1;
                continue;
            }
        }

        entry.found = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_sample(flight_bytes: &[u8]) -> Vec<u8> {
        let size_words = flight_bytes.len() / 2;
        let mut buf = Vec::new();
        buf.extend_from_slice(b"garbage");
        buf.extend_from_slice(b"$U,N12345*00000");
        buf.extend_from_slice(b"$C,930,107,1005,0,06A7,0*00000");
        buf.extend_from_slice(format!("$D,559,{size_words}*00000").as_bytes());
        // No checksum tail after "$L*" — the data-block anchor sits right
        // after this terminator, unlike every other tag.
        buf.extend_from_slice(b"$L*");
        buf.extend_from_slice(flight_bytes);
        buf
    }

    #[test]
    fn finds_anchor_and_parses_device_fields() {
        let data = build_sample(&[0x02, 0x2f, 0, 0, 0, 0]);
        let scan = scan(&data).expect("scan succeeds");
        assert_eq!(scan.device.model, 930);
        assert_eq!(scan.device.firmware_version, 107);
        assert!(!scan.device.twin, "930 is not in the twin model set {{760,790,960}}");
        assert!(scan.device.edm_type);
    }

    #[test]
    fn directory_entry_offset_resolves_to_flight_id() {
        // flight id 559 = 0x022F big-endian
        let data = build_sample(&[0x02, 0x2f, 0, 0, 0, 0]);
        let scan = scan(&data).expect("scan succeeds");
        assert_eq!(scan.directory.len(), 1);
        assert!(scan.directory[0].found);
        assert_eq!(scan.directory[0].id, 559);
    }

    #[test]
    fn missing_anchor_is_malformed_metadata() {
        let data = b"no anchor here".to_vec();
        let err = scan(&data).unwrap_err();
        assert!(matches!(err, JpiError::MalformedMetadata(_)));
    }

    fn entry(id: u16, start: usize, size_bytes: usize) -> FlightDirectoryEntry {
        FlightDirectoryEntry {
            id,
            size_bytes,
            start,
            found: false,
        }
    }

    #[test]
    fn recover_flight_offsets_shifts_one_byte_and_propagates_to_later_entries() {
        // A stray leading filler byte shifts every true flight-id location
        // one byte earlier than where prefix-summed sizes would place it.
        let data = vec![
            0xAA, 0x00, 0x64, 0x00, 0x00, // filler, id 100 (offset 1), 2 filler
            0x00, 0xC8, 0x00, 0x00, // id 200 (offset 5), 2 filler
        ];
        // Assigned (pre-recovery) starts are one byte too high, as
        // prefix-summing sizes from a 1-byte-late anchor would produce.
        let mut directory = vec![entry(100, 2, 4), entry(200, 6, 4)];

        recover_flight_offsets(&data, &mut directory);

        assert!(directory[0].found);
        assert_eq!(directory[0].start, 1);
        assert!(
            directory[1].found,
            "the -1 shift from entry 0 must propagate to entry 1's assigned start"
        );
        assert_eq!(directory[1].start, 5);
    }

    #[test]
    fn recover_flight_offsets_marks_unresolvable_entry_not_found() {
        // Neither the assigned start nor start-1 holds the directory id.
        let data = vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut directory = vec![entry(559, 2, 4)];

        recover_flight_offsets(&data, &mut directory);

        assert!(!directory[0].found);
    }
}
