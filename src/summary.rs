//! Component I: per-flight tach/hobbs/position summary, built from an
//! already-decoded flight's header row plus its data rows.

use crate::timeutil;
use crate::types::{DecodedFlight, FlightSummary};

fn parse_value(s: &str) -> Option<f64> {
    let t = s.trim();
    if t == "NA" || t.is_empty() {
        None
    } else {
        t.parse().ok()
    }
}

fn parse_coordinate(s: &str) -> Option<String> {
    let t = s.trim();
    if t == "NA" || t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Summarizes one already-decoded flight. `decoded.headers`/`decoded.rows`
/// both carry the `DATE`,`TIME` prefix ahead of the sensor columns, so row
/// indices line up directly with header indices. Returns `None` for a
/// flight with no data rows.
pub fn summarize(id: u16, decoded: &DecodedFlight) -> Option<FlightSummary> {
    let first = decoded.rows.first()?;
    let last = decoded.rows.last()?;

    let hrs_idx = decoded
        .headers
        .iter()
        .position(|h| h == "HRS" || h == "LHRS");
    let lat_idx = decoded.headers.iter().position(|h| h == "LAT");
    let lng_idx = decoded.headers.iter().position(|h| h == "LNG");

    let date = first[0].clone();
    let time_off = first[1].clone();
    let time_in = last[1].clone();

    let (tach_start, tach_end) = match hrs_idx {
        Some(idx) => {
            let mut start = None;
            let mut end = None;
            for row in &decoded.rows {
                if let Some(v) = parse_value(&row[idx]) {
                    if start.is_none() {
                        start = Some(v);
                    }
                    end = Some(v);
                }
            }
            (start.unwrap_or(0.0), end.unwrap_or(0.0))
        }
        None => (0.0, 0.0),
    };
    let tach_duration = (tach_end - tach_start).max(0.0);

    let first_epoch = timeutil::to_epoch_seconds(&date, &time_off);
    let last_epoch = timeutil::to_epoch_seconds(&last[0], &time_in);
    let hobb_duration = (((last_epoch - first_epoch) as f64 / 3600.0) * 10.0).round() / 10.0;

    let start_lat = lat_idx.and_then(|i| parse_coordinate(&first[i]));
    let start_lng = lng_idx.and_then(|i| parse_coordinate(&first[i]));
    let end_lat = lat_idx.and_then(|i| parse_coordinate(&last[i]));
    let end_lng = lng_idx.and_then(|i| parse_coordinate(&last[i]));

    Some(FlightSummary {
        id,
        date,
        time_off,
        time_in,
        samples: decoded.rows.len(),
        tach_start,
        tach_end,
        tach_duration,
        hobb_duration,
        start_lat,
        start_lng,
        end_lat,
        end_lng,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, time: &str, hrs: &str, lat: &str) -> Vec<String> {
        vec![
            date.to_string(),
            time.to_string(),
            hrs.to_string(),
            lat.to_string(),
        ]
    }

    #[test]
    fn tach_duration_is_last_minus_first_valid_hrs() {
        let decoded = DecodedFlight {
            headers: vec![
                "DATE".to_string(),
                "TIME".to_string(),
                "HRS".to_string(),
                "LAT".to_string(),
            ],
            rows: vec![
                row("03/15/2026", "12:00:00", "100.2", "N12.00.00"),
                row("03/15/2026", "12:00:06", "NA", "N12.00.01"),
                row("03/15/2026", "12:00:12", "100.5", "N12.00.02"),
            ],
        };
        let summary = summarize(1, &decoded).unwrap();
        assert_eq!(summary.tach_start, 100.2);
        assert_eq!(summary.tach_end, 100.5);
        assert!((summary.tach_duration - 0.3).abs() < 1e-9);
    }

    #[test]
    fn hobb_duration_rounds_to_one_decimal_hour() {
        let decoded = DecodedFlight {
            headers: vec!["DATE".to_string(), "TIME".to_string(), "HRS".to_string()],
            rows: vec![
                vec![
                    "03/15/2026".to_string(),
                    "12:00:00".to_string(),
                    "100.0".to_string(),
                ],
                vec![
                    "03/15/2026".to_string(),
                    "13:30:00".to_string(),
                    "101.5".to_string(),
                ],
            ],
        };
        let summary = summarize(7, &decoded).unwrap();
        assert_eq!(summary.hobb_duration, 1.5);
    }

    #[test]
    fn empty_flight_has_no_summary() {
        let decoded = DecodedFlight {
            headers: vec!["DATE".to_string(), "TIME".to_string()],
            rows: vec![],
        };
        assert!(summarize(1, &decoded).is_none());
    }

    #[test]
    fn start_and_end_coordinates_fall_back_to_none_when_na() {
        let decoded = DecodedFlight {
            headers: vec!["DATE".to_string(), "TIME".to_string(), "LAT".to_string()],
            rows: vec![
                vec!["03/15/2026".to_string(), "12:00:00".to_string(), "NA".to_string()],
                vec![
                    "03/15/2026".to_string(),
                    "12:00:06".to_string(),
                    "N12.00.00".to_string(),
                ],
            ],
        };
        let summary = summarize(1, &decoded).unwrap();
        assert!(summary.start_lat.is_none());
        assert_eq!(summary.end_lat.unwrap(), "N12.00.00");
    }
}
