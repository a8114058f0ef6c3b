//! Component G: row composer post-passes over an already-decoded row
//! sequence — MARK edge suppression, repeat carry-forward, generic
//! carry-forward, and single-gap GPS smoothing.

use crate::types::RecordRow;

fn is_na_or_empty(s: &str) -> bool {
    s == "NA" || s.is_empty()
}

/// Applies all four post-passes, in order, in place. `sensor_headers` is the
/// column order (excluding the DATE/TIME prefix) used to look up special
/// columns by name.
pub fn compose(sensor_headers: &[&'static str], rows: &mut [RecordRow]) {
    let mark_idx = sensor_headers.iter().position(|h| *h == "MARK");
    let lat_idx = sensor_headers.iter().position(|h| *h == "LAT");
    let lng_idx = sensor_headers.iter().position(|h| *h == "LNG");
    let spd_idx = sensor_headers.iter().position(|h| *h == "SPD");
    let alt_idx = sensor_headers.iter().position(|h| *h == "ALT");

    suppress_repeated_mark(mark_idx, rows);
    carry_repeat_columns(&[lat_idx, lng_idx, spd_idx, alt_idx], rows);
    carry_forward_generic(&[mark_idx, lat_idx, lng_idx, spd_idx, alt_idx], rows);
    smooth_single_gap(lat_idx, rows);
    smooth_single_gap(lng_idx, rows);
}

/// Rule 1: suppress any MARK value equal to the previous row's; the first
/// row always keeps its MARK.
fn suppress_repeated_mark(mark_idx: Option<usize>, rows: &mut [RecordRow]) {
    let Some(idx) = mark_idx else { return };
    for i in 1..rows.len() {
        if rows[i].mark == rows[i - 1].mark {
            rows[i].mark.clear();
            rows[i].columns[idx] = String::new();
        }
    }
}

/// Rule 2: for rows flagged as `mult` repeats, fill NA/empty LAT/LNG/SPD/ALT
/// from the immediately previous row.
fn carry_repeat_columns(indices: &[Option<usize>], rows: &mut [RecordRow]) {
    for idx in indices.iter().flatten() {
        for i in 1..rows.len() {
            if rows[i].is_repeat && is_na_or_empty(&rows[i].columns[*idx]) {
                rows[i].columns[*idx] = rows[i - 1].columns[*idx].clone();
            }
        }
    }
}

/// Rule 3: every other column carries its previous value forward when NA
/// or empty.
fn carry_forward_generic(excluded: &[Option<usize>], rows: &mut [RecordRow]) {
    let excluded: Vec<usize> = excluded.iter().flatten().copied().collect();
    for i in 1..rows.len() {
        let column_count = rows[i].columns.len();
        for col in 0..column_count {
            if excluded.contains(&col) {
                continue;
            }
            if is_na_or_empty(&rows[i].columns[col]) {
                rows[i].columns[col] = rows[i - 1].columns[col].clone();
            }
        }
    }
}

/// Rule 4: a single interior NA/empty gap flanked by two valid values on
/// either side is filled from the previous row.
fn smooth_single_gap(idx: Option<usize>, rows: &mut [RecordRow]) {
    let Some(idx) = idx else { return };
    if rows.len() < 3 {
        return;
    }
    for i in 1..rows.len() - 1 {
        if is_na_or_empty(&rows[i].columns[idx])
            && !is_na_or_empty(&rows[i - 1].columns[idx])
            && !is_na_or_empty(&rows[i + 1].columns[idx])
        {
            rows[i].columns[idx] = rows[i - 1].columns[idx].clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, time: &str, columns: Vec<&str>, is_repeat: bool, mark: &str) -> RecordRow {
        RecordRow {
            date: date.to_string(),
            time: time.to_string(),
            columns: columns.into_iter().map(String::from).collect(),
            is_repeat,
            mark: mark.to_string(),
        }
    }

    #[test]
    fn mark_edge_suppression_keeps_first_row_and_drops_repeats() {
        let headers = ["MARK"];
        let mut rows = vec![
            row("1/1/26", "00:00:00", vec!["X"], false, "X"),
            row("1/1/26", "00:00:06", vec!["X"], false, "X"),
            row("1/1/26", "00:00:12", vec![""], false, ""),
        ];
        compose(&headers, &mut rows);
        assert_eq!(rows[0].columns[0], "X");
        assert_eq!(rows[1].columns[0], "");
        assert_eq!(rows[2].columns[0], "");
    }

    #[test]
    fn repeat_rows_carry_lat_lng_spd_alt_from_previous() {
        let headers = ["LAT"];
        let mut rows = vec![
            row("1/1/26", "00:00:00", vec!["N12.34.56"], false, ""),
            row("1/1/26", "00:00:06", vec!["NA"], true, ""),
        ];
        compose(&headers, &mut rows);
        assert_eq!(rows[1].columns[0], "N12.34.56");
    }

    #[test]
    fn generic_columns_carry_forward_when_na() {
        let headers = ["E1"];
        let mut rows = vec![
            row("1/1/26", "00:00:00", vec![" 250"], false, ""),
            row("1/1/26", "00:00:06", vec!["NA"], false, ""),
        ];
        compose(&headers, &mut rows);
        assert_eq!(rows[1].columns[0], " 250");
    }

    #[test]
    fn single_interior_gps_gap_is_smoothed() {
        let headers = ["LAT"];
        let mut rows = vec![
            row("1/1/26", "00:00:00", vec!["N12.34.56"], false, ""),
            row("1/1/26", "00:00:06", vec!["NA"], false, ""),
            row("1/1/26", "00:00:12", vec!["N12.35.00"], false, ""),
        ];
        compose(&headers, &mut rows);
        assert_eq!(rows[1].columns[0], "N12.34.56");
    }
}
