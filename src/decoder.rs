//! Component E: the record decoder inner loop.
//!
//! Uses a per-group bit-dispatch loop structure (flag bits select which
//! groups carry bytes this record): flag words select 16 byte-groups, each
//! contributing an optional control byte (which bits in the group carry
//! data), an optional sign byte, and one data byte per set control bit.

use crate::cursor::ByteCursor;
use std::collections::HashMap;

pub const GROUP_COUNT: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct RawSample {
    pub value: i32,
    pub sign: bool,
    pub valid: bool,
}

/// One decoded record: either fresh data bytes, or a `mult`-triggered
/// repeat of the previous record's samples.
#[derive(Debug, Clone)]
pub struct DecodedRecord {
    pub is_repeat: bool,
    pub samples: HashMap<(i8, i8), RawSample>,
}

impl DecodedRecord {
    pub fn sample(&self, addr: crate::types::ByteAddr) -> Option<RawSample> {
        if !addr.is_present() {
            return None;
        }
        self.samples.get(&(addr.group, addr.bit)).copied()
    }
}

/// Stateful per-flight record decoder. Not thread-safe (owns a cursor and
/// repeat-run state); construct one per flight.
pub struct RecordDecoder<'a> {
    cursor: ByteCursor<'a>,
    edm_type: bool,
    /// Remaining repeat emissions owed from a `mult` byte read earlier.
    /// Tracked as an explicit count rather than by rewinding the cursor and
    /// re-reading `mult` on each emission, since the underlying bytes are
    /// already consumed by the time a repeat is emitted.
    repeat_remaining: u32,
    previous: Option<DecodedRecord>,
    finished: bool,
}

impl<'a> RecordDecoder<'a> {
    pub fn new(data: &'a [u8], rec_start: usize, flight_end: usize, edm_type: bool) -> Self {
        Self {
            cursor: ByteCursor::bounded(data, rec_start, flight_end),
            edm_type,
            repeat_remaining: 0,
            previous: None,
            finished: false,
        }
    }

    /// Decodes the next record, or `None` at end of stream (truncation and
    /// flag mismatch are not errors — they end the stream cleanly).
    pub fn next_record(&mut self) -> Option<DecodedRecord> {
        if self.finished {
            return None;
        }

        if self.repeat_remaining > 0 {
            self.repeat_remaining -= 1;
            let repeat = self.previous.clone()?;
            return Some(DecodedRecord {
                is_repeat: true,
                samples: repeat.samples,
            });
        }

        let (flg0, flg1) = if self.edm_type {
            (self.cursor.word(), self.cursor.word())
        } else {
            (self.cursor.byte(), self.cursor.byte())
        };

        if flg0 != flg1 || flg0 < 0 || flg1 < 0 {
            self.finished = true;
            return None;
        }
        let flg0 = flg0 as u32;

        let mult = self.cursor.byte();
        if mult < 0 {
            self.finished = true;
            return None;
        }
        if mult != 0 {
            self.repeat_remaining = (mult as u32).saturating_sub(1);
            let repeat = self.previous.clone()?;
            return Some(DecodedRecord {
                is_repeat: true,
                samples: repeat.samples,
            });
        }

        let mut control = [None; GROUP_COUNT];
        for (g, slot) in control.iter_mut().enumerate() {
            if flg0 & (1 << g) != 0 {
                let b = self.cursor.byte();
                if b < 0 {
                    self.finished = true;
                    return None;
                }
                *slot = Some(b as u8);
            }
        }

        let mut sign = [None; GROUP_COUNT];
        for (g, slot) in sign.iter_mut().enumerate() {
            if g == 6 || g == 7 {
                continue;
            }
            if flg0 & (1 << g) != 0 {
                let b = self.cursor.byte();
                if b < 0 {
                    self.finished = true;
                    return None;
                }
                *slot = Some(b as u8);
            }
        }

        let mut samples = HashMap::new();
        for g in 0..GROUP_COUNT {
            let Some(control_byte) = control[g] else {
                continue;
            };
            for b in 0..8u8 {
                if control_byte & (1 << b) == 0 {
                    continue;
                }
                let v = self.cursor.byte();
                if v < 0 {
                    self.finished = true;
                    return None;
                }
                let v = v as u8;

                let scale = scale_for(g, b);
                let mask = adjusted_mask(g, b);
                let sign_group = sign_source_group(g);
                let sign_byte = sign[sign_group].unwrap_or(0);
                let sample = RawSample {
                    value: v as i32 * scale,
                    sign: (sign_byte & mask) != 0,
                    valid: v != 0,
                };
                samples.insert((g as i8, b as i8), sample);
            }
        }

        let _checksum = self.cursor.byte();

        let record = DecodedRecord {
            is_repeat: false,
            samples,
        };
        self.previous = Some(record.clone());
        Some(record)
    }
}

/// `(group, bit)` → scale, per the device's compact per-channel scale table.
fn scale_for(g: usize, b: u8) -> i32 {
    match (g, b) {
        (5, 2) | (5, 4) => 256,
        (6, _) | (7, _) => 256,
        (10, 1) | (10, 2) => 256,
        (9, 4) | (9, 5) | (12, 4) | (12, 5) => 256,
        (9, 7) | (12, 7) => 256,
        (13, 4) | (13, 5) | (13, 6) | (14, 4) | (14, 5) | (14, 6) => 256,
        _ => 1,
    }
}

/// The sign-byte bit mask tested for this `(group, bit)`, after the
/// per-channel sign-bit adjust shift (÷2, ×32, ÷16, or unadjusted).
fn adjusted_mask(g: usize, b: u8) -> u8 {
    let base = 1u32 << b;
    let adjusted = match (g, b) {
        (5, 2) | (5, 4) => base / 2,
        (10, 1) | (10, 2) => base * 32,
        (9, 4) | (9, 5) | (12, 4) | (12, 5) => base / 16,
        (13, 4) | (13, 5) | (13, 6) | (14, 4) | (14, 5) | (14, 6) => base / 16,
        _ => base,
    };
    adjusted as u8
}

/// Group 6 borrows group 0's sign byte; group 7 borrows group 3's; all
/// other groups use their own.
fn sign_source_group(g: usize) -> usize {
    match g {
        6 => 0,
        7 => 3,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_bytes(flg0: u8, mult: u8, group0_control: u8, group0_sign: u8, data: &[u8]) -> Vec<u8> {
        let mut buf = vec![flg0, flg0, mult];
        buf.push(group0_control);
        buf.push(group0_sign);
        buf.extend_from_slice(data);
        buf.push(0); // checksum
        buf
    }

    #[test]
    fn decodes_single_group_single_bit_record() {
        // flag bit 0 set -> group 0 has a control byte and a sign byte.
        let data = record_bytes(0b0000_0001, 0, 0b0000_0001, 0, &[42]);
        let mut decoder = RecordDecoder::new(&data, 0, data.len(), false);
        let record = decoder.next_record().expect("record");
        assert!(!record.is_repeat);
        let sample = record.sample(crate::types::ByteAddr::new(0, 0)).unwrap();
        assert_eq!(sample.value, 42);
        assert!(sample.valid);
    }

    #[test]
    fn mult_emits_repeat_rows_without_consuming_new_data() {
        let first = record_bytes(0b0000_0001, 0, 0b0000_0001, 0, &[10]);
        let mut buf = first.clone();
        // second record: flags match, mult = 2 (repeat twice)
        buf.push(0);
        buf.push(0);
        buf.push(2);
        let mut decoder = RecordDecoder::new(&buf, 0, buf.len(), false);
        let first_record = decoder.next_record().unwrap();
        assert!(!first_record.is_repeat);

        let repeat1 = decoder.next_record().unwrap();
        assert!(repeat1.is_repeat);
        assert_eq!(
            repeat1.sample(crate::types::ByteAddr::new(0, 0)).unwrap().value,
            10
        );

        let repeat2 = decoder.next_record().unwrap();
        assert!(repeat2.is_repeat);
    }

    #[test]
    fn flag_mismatch_ends_stream() {
        let data = vec![0x01, 0x02, 0x00];
        let mut decoder = RecordDecoder::new(&data, 0, data.len(), false);
        assert!(decoder.next_record().is_none());
    }

    #[test]
    fn truncated_stream_ends_cleanly_without_error() {
        let data = vec![0x01, 0x01];
        let mut decoder = RecordDecoder::new(&data, 0, data.len(), false);
        assert!(decoder.next_record().is_none());
    }

    #[test]
    fn group_6_borrows_group_0_sign_byte() {
        // flags set bits for group 0 and group 6.
        let flg0 = 0b0100_0001u8;
        let mut buf = vec![flg0, flg0, 0];
        buf.push(0b0000_0001); // group 0 control: bit0 set
        buf.push(0b0000_0001); // group 6 control: bit0 set
        buf.push(0xffu8); // group 0 sign byte (group 6 has none of its own)
        buf.push(5); // group0 data byte
        buf.push(7); // group6 data byte
        buf.push(0); // checksum
        let mut decoder = RecordDecoder::new(&buf, 0, buf.len(), false);
        let record = decoder.next_record().unwrap();
        let g6 = record.sample(crate::types::ByteAddr::new(6, 0)).unwrap();
        assert!(g6.sign);
    }
}
