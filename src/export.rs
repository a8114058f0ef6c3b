//! CSV export for the CLI. Hand-formatted via `write!`/`writeln!` rather
//! than routing through the `csv` crate — byte control over formatting (the
//! leading-space convention on non-negative integers, the `NA` placeholder)
//! is part of the decoded shape itself.

use crate::error::{JpiError, Result};
use crate::types::{DecodedFlight, FlightListing, FlightSummary};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extract the base filename from an input path with a fallback, used by
/// every default-output-path computation below.
fn extract_base_name(input_path: &Path) -> &str {
    input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("flight")
}

/// Default output path beside the input file: `<stem>.flt<id>.csv`.
pub fn default_csv_path(input_path: &Path, id: u16) -> PathBuf {
    let base = extract_base_name(input_path);
    let dir = input_path.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("{base}.flt{id}.csv"))
}

/// Output path for a multi-flight decode: `<stem>.flt<id>.csv` inside
/// `out_dir` if it exists, otherwise the current directory.
pub fn csv_path_in_dir(input_path: &Path, id: u16, out_dir: &Path) -> PathBuf {
    let base = extract_base_name(input_path);
    let dir = if out_dir.is_dir() {
        out_dir
    } else {
        Path::new(".")
    };
    dir.join(format!("{base}.flt{id}.csv"))
}

/// Writes one decoded flight to CSV: header row, a tach-summary line, then
/// one `INDEX`-prefixed row per sample.
pub fn write_flight_csv(
    path: &Path,
    decoded: &DecodedFlight,
    summary: &FlightSummary,
) -> Result<()> {
    let file = File::create(path).map_err(JpiError::Io)?;
    let mut writer = BufWriter::new(file);

    write!(writer, "INDEX").map_err(JpiError::Io)?;
    for header in &decoded.headers {
        write!(writer, ",{header}").map_err(JpiError::Io)?;
    }
    writeln!(writer).map_err(JpiError::Io)?;

    writeln!(
        writer,
        "Engine - Tach Start = {:.1},Tach End = {:.1},Tach Duration = {:.1}",
        summary.tach_start, summary.tach_end, summary.tach_duration
    )
    .map_err(JpiError::Io)?;

    for (i, row) in decoded.rows.iter().enumerate() {
        write!(writer, "{}", i + 1).map_err(JpiError::Io)?;
        for value in row {
            write!(writer, ",{value}").map_err(JpiError::Io)?;
        }
        writeln!(writer).map_err(JpiError::Io)?;
    }

    writer.flush().map_err(JpiError::Io)?;
    Ok(())
}

/// Plain-text flight listing table for the CLI's default (non-`--json`)
/// output.
pub fn format_listing_table(flights: &[FlightListing]) -> String {
    let mut out = String::from("ID\tSIZE\tSTART\tDATE\t\tTIME\t\tINTERVAL\n");
    for flight in flights {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}s\n",
            flight.id, flight.size_bytes, flight.start, flight.date, flight.time, flight.interval
        ));
    }
    out
}

#[cfg(feature = "json")]
pub fn format_listing_json(flights: &[FlightListing]) -> Result<String> {
    serde_json::to_string_pretty(flights).map_err(|e| JpiError::Export(e.to_string()))
}
