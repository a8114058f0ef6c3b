//! Component F: value shaper — integer assembly, running totals, DIF,
//! coordinate/MARK formatting, and NA handling.
//!
//! Each sensor owns an accumulator plus a validity bit instead of scattered
//! `if header == "LAT"` conditionals; the dispatch happens on `ChannelKind`
//! (`crate::types::sensor`).

use crate::decoder::{DecodedRecord, RawSample};
use crate::types::{ChannelKind, ChannelState, FuelUnit, SensorDescriptor};
use std::collections::HashMap;

const EMPTY_SAMPLE: RawSample = RawSample {
    value: 0,
    sign: false,
    valid: false,
};

pub struct ValueShaper {
    sensors: Vec<&'static SensorDescriptor>,
    channels: HashMap<&'static str, ChannelState>,
    formatted: HashMap<&'static str, String>,
    fuel_unit: FuelUnit,
    interval: u16,
    original_interval: u16,
    first_record: bool,
    last_output: Option<(Vec<String>, String)>,
}

impl ValueShaper {
    pub fn new(
        sensors: Vec<&'static SensorDescriptor>,
        fuel_unit: FuelUnit,
        start_lat: Option<i32>,
        start_lng: Option<i32>,
        record_interval: u16,
    ) -> Self {
        let mut channels = HashMap::new();
        for sensor in &sensors {
            let state = match sensor.header {
                "LAT" => ChannelState::seeded(start_lat),
                "LNG" => ChannelState::seeded(start_lng),
                header => ChannelState::default_for(header),
            };
            channels.insert(sensor.header, state);
        }
        Self {
            sensors,
            channels,
            formatted: HashMap::new(),
            fuel_unit,
            interval: record_interval,
            original_interval: record_interval,
            first_record: true,
            last_output: None,
        }
    }

    pub fn interval(&self) -> u16 {
        self.interval
    }

    /// Shapes one decoded record into formatted column strings, in sensor
    /// table order, and returns the MARK glyph emitted this record (empty
    /// string if none).
    pub fn shape(&mut self, record: &DecodedRecord) -> (Vec<String>, String) {
        // A mult-repeat record carries the previous record's raw deltas
        // verbatim (component E clones `previous.samples`) so that running
        // a repeat through the normal accumulation path would add those
        // deltas a second time. Repeats echo the prior row's formatted
        // output unchanged instead.
        if record.is_repeat {
            if let Some((columns, mark)) = &self.last_output {
                return (columns.clone(), mark.clone());
            }
        }

        self.formatted.clear();
        let mut egt_values: Vec<(i64, bool)> = Vec::new();
        let mut mark_glyph = String::new();

        let sensors = self.sensors.clone();
        for sensor in &sensors {
            if sensor.kind == ChannelKind::Computed {
                continue;
            }

            let lo = record.sample(sensor.lo).unwrap_or(EMPTY_SAMPLE);
            let hi = sensor
                .hi
                .is_present()
                .then(|| record.sample(sensor.hi).unwrap_or(EMPTY_SAMPLE));

            let mut int = if lo.sign { -lo.value } else { lo.value };
            if let Some(hi) = hi {
                if sensor.header == "HRS" && self.first_record && lo.sign {
                    int = -(lo.value + hi.value);
                } else if hi.sign {
                    int -= hi.value;
                } else {
                    int += hi.value;
                }
            }

            let valid_this_record = lo.valid || hi.map(|h| h.valid).unwrap_or(false);

            let state = self.channels.get_mut(sensor.header).expect("seeded above");
            state.running_total += int as i64;
            state.valid = valid_this_record;
            let total = state.running_total;

            if sensor.header.starts_with('E') && sensor.header.len() == 2 {
                egt_values.push((total, valid_this_record));
            }

            let formatted = match sensor.kind {
                ChannelKind::Integer => {
                    if valid_this_record {
                        format_integer(total)
                    } else {
                        "NA".to_string()
                    }
                }
                ChannelKind::Fixed1 => {
                    if valid_this_record {
                        format_fixed1(total)
                    } else {
                        "NA".to_string()
                    }
                }
                ChannelKind::Fuel => {
                    if !valid_this_record {
                        "NA".to_string()
                    } else if self.fuel_unit.fuel_scale() == 10 {
                        format_fixed1(total)
                    } else {
                        format_integer(total)
                    }
                }
                ChannelKind::Latitude => {
                    if valid_this_record {
                        format_latitude(total)
                    } else {
                        "NA".to_string()
                    }
                }
                ChannelKind::Longitude => {
                    if valid_this_record {
                        format_longitude(total)
                    } else {
                        "NA".to_string()
                    }
                }
                ChannelKind::Mark => {
                    // MARK's glyph is keyed off this record's fresh delta,
                    // not the accumulated running total — accumulating a
                    // handful of small control codes across a flight would
                    // make the glyph lookup drift meaninglessly.
                    let (glyph, new_interval) =
                        format_mark(int as i64, self.interval, self.original_interval);
                    if let Some(next) = new_interval {
                        self.interval = next;
                    }
                    mark_glyph = glyph.clone();
                    glyph
                }
                ChannelKind::Computed => unreachable!(),
            };

            self.formatted.insert(sensor.header, formatted);
        }

        let dif = if egt_values.iter().any(|(_, valid)| *valid) {
            let valid_values: Vec<i64> = egt_values
                .iter()
                .filter(|(_, valid)| *valid)
                .map(|(v, _)| *v)
                .collect();
            let max = *valid_values.iter().max().unwrap();
            let min = *valid_values.iter().min().unwrap();
            format_integer(max - min)
        } else {
            "NA".to_string()
        };
        self.formatted.insert("DIF", dif);

        let columns = self
            .sensors
            .iter()
            .map(|s| {
                self.formatted
                    .get(s.header)
                    .cloned()
                    .unwrap_or_else(|| "NA".to_string())
            })
            .collect();

        self.first_record = false;
        self.last_output = Some((columns.clone(), mark_glyph.clone()));
        (columns, mark_glyph)
    }
}

fn format_integer(total: i64) -> String {
    if total >= 0 {
        format!(" {total}")
    } else {
        format!("{total}")
    }
}

fn format_fixed1(total: i64) -> String {
    format!("{:.1}", total as f64 / 10.0)
}

fn format_latitude(total: i64) -> String {
    let ns = if total < 0 { "S" } else { "N" };
    let t = total.unsigned_abs();
    let deg = t / 6000;
    let r = t % 6000;
    format!("{ns}{:02}.{:02}.{:02}", deg, r / 100, r % 100)
}

fn format_longitude(total: i64) -> String {
    let ew = if total < 0 { "W" } else { "E" };
    let t = total.unsigned_abs();
    let deg = t / 6000;
    let r = t % 6000;
    format!("{ew}{:03}.{:02}.{:02}", deg, r / 100, r % 100)
}

/// `int & 7` selects the glyph and, for `[`/`<`, temporarily switches the
/// sample interval to 1 second until the matching `]`/`>` restores it.
fn format_mark(total: i64, current: u16, original: u16) -> (String, Option<u16>) {
    let _ = current;
    match total & 7 {
        0 => (String::new(), None),
        1 => ("X".to_string(), None),
        2 => ("[".to_string(), Some(1)),
        3 => ("]".to_string(), Some(original)),
        4 => ("<".to_string(), Some(1)),
        5 => (">".to_string(), Some(original)),
        _ => (String::new(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ByteAddr;
    use std::collections::HashMap as Map;

    fn sensor(
        header: &'static str,
        kind: ChannelKind,
        lo: ByteAddr,
        hi: ByteAddr,
    ) -> SensorDescriptor {
        SensorDescriptor::new(header, kind, 0, 0, lo, hi)
    }

    fn record(samples: &[((i8, i8), RawSample)]) -> DecodedRecord {
        let mut map = Map::new();
        for (addr, sample) in samples {
            map.insert(*addr, *sample);
        }
        DecodedRecord {
            is_repeat: false,
            samples: map,
        }
    }

    #[test]
    fn integer_channel_accumulates_and_formats_with_leading_space() {
        let e1 = sensor("E1", ChannelKind::Integer, ByteAddr::new(0, 0), ByteAddr::NONE);
        let leaked: &'static SensorDescriptor = Box::leak(Box::new(e1));
        let mut shaper = ValueShaper::new(vec![leaked], FuelUnit::Gallon, None, None, 6);
        let rec = record(&[(
            (0, 0),
            RawSample {
                value: 5,
                sign: false,
                valid: true,
            },
        )]);
        let (cols, _) = shaper.shape(&rec);
        assert_eq!(cols[0], " 245");
    }

    #[test]
    fn mark_channel_switches_interval_on_bracket_glyph() {
        let mark = sensor("MARK", ChannelKind::Mark, ByteAddr::new(0, 0), ByteAddr::NONE);
        let leaked: &'static SensorDescriptor = Box::leak(Box::new(mark));
        let mut shaper = ValueShaper::new(vec![leaked], FuelUnit::Gallon, None, None, 6);
        // int & 7 == 2 -> glyph '[' and interval switches to 1
        let rec = record(&[(
            (0, 0),
            RawSample {
                value: 2,
                sign: false,
                valid: true,
            },
        )]);
        let (_, glyph) = shaper.shape(&rec);
        assert_eq!(glyph, "[");
        assert_eq!(shaper.interval(), 1);
    }

    #[test]
    fn latitude_formats_as_ns_degrees() {
        let lat = sensor(
            "LAT",
            ChannelKind::Latitude,
            ByteAddr::new(0, 0),
            ByteAddr::NONE,
        );
        let leaked: &'static SensorDescriptor = Box::leak(Box::new(lat));
        let mut shaper = ValueShaper::new(vec![leaked], FuelUnit::Gallon, Some(0), None, 6);
        let rec = record(&[(
            (0, 0),
            RawSample {
                value: 300,
                sign: false,
                valid: true,
            },
        )]);
        let (cols, _) = shaper.shape(&rec);
        let lat_re = regex::Regex::new(r"^[NS]\d{2}\.\d{2}\.\d{2}$").unwrap();
        assert!(lat_re.is_match(&cols[0]), "{} does not match LAT shape", cols[0]);
    }

    #[test]
    fn longitude_formats_as_ew_degrees() {
        let lng = sensor(
            "LNG",
            ChannelKind::Longitude,
            ByteAddr::new(0, 0),
            ByteAddr::NONE,
        );
        let leaked: &'static SensorDescriptor = Box::leak(Box::new(lng));
        let mut shaper = ValueShaper::new(vec![leaked], FuelUnit::Gallon, None, Some(0), 6);
        let rec = record(&[(
            (0, 0),
            RawSample {
                value: 300,
                sign: true,
                valid: true,
            },
        )]);
        let (cols, _) = shaper.shape(&rec);
        let lng_re = regex::Regex::new(r"^[EW]\d{3}\.\d{2}\.\d{2}$").unwrap();
        assert!(lng_re.is_match(&cols[0]), "{} does not match LNG shape", cols[0]);
    }
}
