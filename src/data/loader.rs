use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::DataType;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;
use url::Url;

use super::model::{coerce_number, coerce_year, year_from_f64, Dataset, Record};
use crate::config::ColumnNames;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The dataset could not be fetched or is not a table at all.
/// Cells that fail numeric coercion are not errors; they become `None`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fetching {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("parsing delimited text")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON")]
    Json(#[from] serde_json::Error),
    #[error("reading parquet data")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("converting parquet column")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("dataset has no '{0}' column")]
    MissingColumn(String),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Where the table lives.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Remote(Url),
}

impl DataSource {
    /// `http://` and `https://` strings are remote, everything else is a path.
    pub fn parse(input: &str) -> Self {
        match Url::parse(input) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => DataSource::Remote(url),
            _ => DataSource::File(PathBuf::from(input)),
        }
    }

    fn extension(&self) -> String {
        let ext = match self {
            DataSource::File(path) => path.extension().and_then(|e| e.to_str()),
            DataSource::Remote(url) => Path::new(url.path())
                .extension()
                .and_then(|e| e.to_str()),
        };
        ext.unwrap_or("").to_ascii_lowercase()
    }

    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            DataSource::File(path) => std::fs::read(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            DataSource::Remote(url) => {
                let fetch_err = |source| LoadError::Fetch {
                    url: url.to_string(),
                    source,
                };
                let response = reqwest::blocking::get(url.clone())
                    .and_then(|resp| resp.error_for_status())
                    .map_err(fetch_err)?;
                Ok(response.bytes().map_err(fetch_err)?.to_vec())
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// On-disk layout of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Tsv,
    Json,
    Parquet,
}

impl Format {
    pub fn from_extension(ext: &str) -> Result<Self, LoadError> {
        match ext {
            "csv" => Ok(Format::Csv),
            "tsv" | "tab" => Ok(Format::Tsv),
            "json" => Ok(Format::Json),
            "parquet" | "pq" => Ok(Format::Parquet),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Fetch and parse a movie table. Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row, one movie per line
/// * `.json`         – `[{ "title": ..., "gross": ..., ... }, ...]`
/// * `.parquet`      – any column types; values are read as text first
pub fn load(source: &DataSource, columns: &ColumnNames) -> Result<Dataset, LoadError> {
    let format = Format::from_extension(&source.extension())?;
    let bytes = source.fetch()?;
    log::debug!("Fetched {} bytes from {source}", bytes.len());

    let dataset = parse(bytes, format, columns)?;
    log::info!("Loaded {} records from {source}", dataset.len());
    for (col, n) in &dataset.missing {
        log::warn!(
            "{n} of {} values in column '{col}' are missing or not numeric",
            dataset.len()
        );
    }
    Ok(dataset)
}

/// Parse an in-memory table.
pub fn parse(bytes: Vec<u8>, format: Format, columns: &ColumnNames) -> Result<Dataset, LoadError> {
    let records = match format {
        Format::Csv => parse_delimited(&bytes[..], b',', columns)?,
        Format::Tsv => parse_delimited(&bytes[..], b'\t', columns)?,
        Format::Json => parse_json(&bytes, columns)?,
        Format::Parquet => parse_parquet(Bytes::from(bytes), columns)?,
    };
    Ok(Dataset::from_records(records, columns))
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Indices of the configured columns inside a header row.
struct ColumnIndex {
    title: Option<usize>,
    gross: usize,
    score: usize,
    year: usize,
    director: usize,
}

impl ColumnIndex {
    fn locate(headers: &[&str], columns: &ColumnNames) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require =
            |name: &str| find(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()));
        Ok(ColumnIndex {
            title: find(&columns.title),
            gross: require(&columns.gross)?,
            score: require(&columns.score)?,
            year: require(&columns.year)?,
            director: require(&columns.director)?,
        })
    }

    fn record<'a>(&self, cell: impl Fn(usize) -> &'a str) -> Record {
        Record {
            title: self.title.map(&cell).unwrap_or_default().to_string(),
            gross: coerce_number(cell(self.gross)),
            score: coerce_number(cell(self.score)),
            year: coerce_year(cell(self.year)),
            director: cell(self.director).to_string(),
        }
    }
}

fn parse_delimited<R: Read>(
    reader: R,
    delimiter: u8,
    columns: &ColumnNames,
) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let header_names: Vec<&str> = headers.iter().collect();
    let index = ColumnIndex::locate(&header_names, columns)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(index.record(|i| row.get(i).unwrap_or("")));
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "title": "Arrival", "gross": 203388186, "score": 7.9,
///     "year": 2016, "director": "Denis Villeneuve" },
///   ...
/// ]
/// ```
///
/// Numbers may also be given as strings; they go through the same coercion
/// as delimited text.
fn parse_json(bytes: &[u8], columns: &ColumnNames) -> Result<Vec<Record>, LoadError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected a top-level JSON array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;

        records.push(Record {
            title: json_text(obj.get(&columns.title)),
            gross: json_number(obj.get(&columns.gross)),
            score: json_number(obj.get(&columns.score)),
            year: json_number(obj.get(&columns.year)).and_then(year_from_f64),
            director: json_text(obj.get(&columns.director)),
        });
    }

    if !rows.is_empty() {
        for required in [&columns.gross, &columns.score, &columns.year, &columns.director] {
            let present = rows
                .iter()
                .filter_map(|r| r.as_object())
                .any(|obj| obj.contains_key(required));
            if !present {
                return Err(LoadError::MissingColumn(required.clone()));
            }
        }
    }
    Ok(records)
}

fn json_number(val: Option<&JsonValue>) -> Option<f64> {
    match val? {
        JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        JsonValue::String(s) => coerce_number(s),
        _ => None,
    }
}

fn json_text(val: Option<&JsonValue>) -> String {
    match val {
        Some(JsonValue::String(s)) => s.clone(),
        None | Some(JsonValue::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Every configured column is cast to UTF-8 and then coerced exactly like a
/// CSV cell, so integer, float and string columns are all accepted.
fn parse_parquet(bytes: Bytes, columns: &ColumnNames) -> Result<Vec<Record>, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)?;
    let schema = builder.schema().clone();
    let field_names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    let index = ColumnIndex::locate(&field_names, columns)?;

    let mut records = Vec::new();
    for batch in builder.build()? {
        let batch = batch?;
        let text = |idx: Option<usize>| -> Result<Option<ArrayRef>, LoadError> {
            let cast = idx.map(|i| arrow::compute::cast(batch.column(i), &DataType::Utf8));
            Ok(cast.transpose()?)
        };
        let title = text(index.title)?;
        let gross = text(Some(index.gross))?;
        let score = text(Some(index.score))?;
        let year = text(Some(index.year))?;
        let director = text(Some(index.director))?;

        for row in 0..batch.num_rows() {
            records.push(Record {
                title: text_cell(title.as_ref(), row).to_string(),
                gross: coerce_number(text_cell(gross.as_ref(), row)),
                score: coerce_number(text_cell(score.as_ref(), row)),
                year: coerce_year(text_cell(year.as_ref(), row)),
                director: text_cell(director.as_ref(), row).to_string(),
            });
        }
    }
    Ok(records)
}

/// Null cells and absent columns read as empty text.
fn text_cell(column: Option<&ArrayRef>, row: usize) -> &str {
    let Some(column) = column else {
        return "";
    };
    let strings = column.as_string::<i32>();
    if strings.is_null(row) {
        ""
    } else {
        strings.value(row)
    }
}
