//! Date/time advancement for the row composer's `DATE,TIME` prefix and the
//! wall-clock delta used by `summarize_flights()`.
//!
//! No calendar crate is pulled in for this — the arithmetic is a handful of
//! lines using Howard Hinnant's days-from-civil algorithm, not worth a new
//! dependency on top of the rest of the crate's stack.

/// Advances `date` (`MM/DD/YYYY`) and `time` (`HH:MM:SS`) in place by
/// `interval_seconds`, rolling over midnight into the next calendar day.
pub fn advance(date: &mut String, time: &mut String, interval_seconds: u16) {
    let (month, day, year) = parse_date(date);
    let (hours, minutes, seconds) = parse_time(time);

    let mut total_seconds = hours as i64 * 3600 + minutes as i64 * 60 + seconds as i64;
    total_seconds += interval_seconds as i64;

    let mut day_offset = total_seconds.div_euclid(86_400);
    total_seconds = total_seconds.rem_euclid(86_400);

    let new_hours = total_seconds / 3600;
    let new_minutes = (total_seconds % 3600) / 60;
    let new_seconds = total_seconds % 60;

    let mut days = days_from_civil(year, month, day);
    days += day_offset;
    day_offset = 0;
    let _ = day_offset;
    let (ny, nm, nd) = civil_from_days(days);

    *date = format!("{nm:02}/{nd:02}/{ny:04}");
    *time = format!("{new_hours:02}:{new_minutes:02}:{new_seconds:02}");
}

/// Seconds since an arbitrary fixed epoch; only deltas between two calls are
/// meaningful.
pub fn to_epoch_seconds(date: &str, time: &str) -> i64 {
    let (month, day, year) = parse_date(date);
    let (hours, minutes, seconds) = parse_time(time);
    let days = days_from_civil(year, month, day);
    days * 86_400 + hours as i64 * 3600 + minutes as i64 * 60 + seconds as i64
}

fn parse_date(date: &str) -> (i64, i64, i64) {
    let parts: Vec<&str> = date.split('/').collect();
    let month = parts.first().and_then(|s| s.parse().ok()).unwrap_or(1);
    let day = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
    let year = parts.get(2).and_then(|s| s.parse().ok()).unwrap_or(1970);
    (month, day, year)
}

fn parse_time(time: &str) -> (i64, i64, i64) {
    let parts: Vec<&str> = time.split(':').collect();
    let hours = parts.first().and_then(|s| s.parse().ok()).unwrap_or(0);
    let minutes = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
    let seconds = parts.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);
    (hours, minutes, seconds)
}

/// Howard Hinnant's `days_from_civil`: days since 1970-01-01 for a given
/// proleptic Gregorian calendar date.
fn days_from_civil(y: i64, m: i64, d: i64) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(z: i64) -> (i64, i64, i64) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    (if m <= 2 { y + 1 } else { y }, m, d)
}
