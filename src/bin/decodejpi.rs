//! CLI binary for the JPI decoder.
//!
//! This provides the command-line interface over `jpi_parser`'s library
//! surface: list a file's flights, decode one flight to CSV, or decode
//! several at once.

use anyhow::{Context, Result};
use clap::{Arg, Command};
use jpi_parser::error::JpiError;
use jpi_parser::export;
use jpi_parser::JpiDecoder;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let matches = Command::new("decodejpi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode J.P. Instruments EDM flight logs (.JPI) to CSV")
        .arg(
            Arg::new("file")
                .help("The .JPI file to read")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("ids")
                .help("Flight id(s) to decode; omit to list flights instead")
                .num_args(0..)
                .index(2),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("List flights as JSON instead of a plain table")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable verbose progress output")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let debug = matches.get_flag("debug");
    let file = matches.get_one::<String>("file").expect("required");
    let path = Path::new(file);

    if debug {
        println!("Reading {path:?}");
    }

    let decoder = match JpiDecoder::parse_file(path) {
        Ok(decoder) => decoder,
        Err(err) => {
            eprintln!("Error reading {path:?}: {err}");
            std::process::exit(1);
        }
    };

    let ids: Vec<&String> = matches
        .get_many::<String>("ids")
        .map(|v| v.collect())
        .unwrap_or_default();

    if ids.is_empty() {
        list_flights(&decoder, matches.get_flag("json"))?;
        return Ok(());
    }

    let mut flight_ids = Vec::with_capacity(ids.len());
    for id in &ids {
        match id.parse::<u16>() {
            Ok(id) => flight_ids.push(id),
            Err(_) => {
                eprintln!("Error: '{id}' is not a valid flight id");
                std::process::exit(1);
            }
        }
    }

    // A trailing non-numeric argument after the ids is the output
    // directory/file; clap hands it to us as part of `ids` since both share
    // the same multi-valued slot.
    let (flight_ids, output_target) = split_trailing_output_path(&ids, flight_ids);

    if flight_ids.is_empty() {
        eprintln!("Error: no flight ids given");
        std::process::exit(1);
    }

    let mut failures = 0;
    if flight_ids.len() == 1 {
        let id = flight_ids[0];
        let out_path = output_target
            .clone()
            .unwrap_or_else(|| export::default_csv_path(path, id));
        if let Err(err) = decode_one(&decoder, path, id, &out_path, debug) {
            eprintln!("Error decoding flight {id}: {err}");
            failures += 1;
        }
    } else {
        let out_dir = output_target.unwrap_or_else(|| PathBuf::from("."));
        for id in flight_ids {
            let out_path = export::csv_path_in_dir(path, id, &out_dir);
            if let Err(err) = decode_one(&decoder, path, id, &out_path, debug) {
                eprintln!("Error decoding flight {id}: {err}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Clap gives ids and a trailing path argument the same multi-valued slot;
/// the last entry is the output path iff it doesn't parse as a flight id.
fn split_trailing_output_path(
    raw: &[&String],
    mut ids: Vec<u16>,
) -> (Vec<u16>, Option<PathBuf>) {
    if let Some(last) = raw.last() {
        if last.parse::<u16>().is_err() {
            ids.pop();
            return (ids, Some(PathBuf::from(last.as_str())));
        }
    }
    (ids, None)
}

fn list_flights(decoder: &JpiDecoder, json: bool) -> Result<()> {
    let flights = decoder.list_flights();
    if json {
        #[cfg(feature = "json")]
        {
            println!("{}", export::format_listing_json(&flights)?);
        }
        #[cfg(not(feature = "json"))]
        {
            eprintln!("--json requires the `json` feature");
            std::process::exit(1);
        }
    } else {
        print!("{}", export::format_listing_table(&flights));
    }
    Ok(())
}

fn decode_one(
    decoder: &JpiDecoder,
    input_path: &Path,
    id: u16,
    out_path: &Path,
    debug: bool,
) -> Result<(), JpiError> {
    if debug {
        println!("Decoding flight {id} -> {out_path:?}");
    }
    let decoded = decoder.decode_flight(id)?;
    let summary = decoder.summarize_flight(id)?;
    export::write_flight_csv(out_path, &decoded, &summary)
        .with_context(|| format!("writing {out_path:?}"))
        .map_err(|e| JpiError::Export(e.to_string()))?;
    println!("Wrote {} rows to {out_path:?}", decoded.rows.len());
    let _ = input_path;
    Ok(())
}
