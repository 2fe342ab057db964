//! JSON and CSV dumps of the full history.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::{
    WeatherError,
    error::Result,
    model::{ExportSummary, WeatherRecord},
    store::WeatherStore,
};

pub const DEFAULT_JSON_FILE: &str = "weather_export.json";
pub const DEFAULT_CSV_FILE: &str = "weather_export.csv";

const CSV_HEADER: [&str; 5] = ["ID", "Location", "Temperature", "Description", "Timestamp"];

/// Write every stored record to `json_path` and `csv_path`, overwriting both.
///
/// The files are written one after the other; if the CSV write fails the
/// JSON file has already been replaced.
pub fn export_all(
    store: &WeatherStore,
    json_path: impl AsRef<Path>,
    csv_path: impl AsRef<Path>,
) -> Result<ExportSummary> {
    let json_path = json_path.as_ref();
    let csv_path = csv_path.as_ref();
    let records = store.all_records()?;

    write_json(json_path, &records)?;
    write_csv(csv_path, &records)?;

    info!(
        records = records.len(),
        json = %json_path.display(),
        csv = %csv_path.display(),
        "exported weather history"
    );

    Ok(ExportSummary {
        records: records.len(),
        json_path: PathBuf::from(json_path),
        csv_path: PathBuf::from(csv_path),
    })
}

/// Pretty-printed array with four-space indentation.
pub fn write_json(path: &Path, records: &[WeatherRecord]) -> Result<()> {
    let file = create(path)?;
    let mut writer = BufWriter::new(file);

    let mut ser =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    records
        .serialize(&mut ser)
        .map_err(|e| export_error(path, e))?;

    writer.flush().map_err(|e| export_error(path, e))
}

pub fn write_csv(path: &Path, records: &[WeatherRecord]) -> Result<()> {
    let file = create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(file);

    writer.write_record(CSV_HEADER)?;
    for r in records {
        writer.serialize((r.id, &r.location, r.temperature, &r.description, &r.timestamp))?;
    }

    writer.flush().map_err(|e| export_error(path, e))
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| export_error(path, e))
}

fn export_error(path: &Path, err: impl std::fmt::Display) -> WeatherError {
    WeatherError::Export(format!("{}: {err}", path.display()))
}
