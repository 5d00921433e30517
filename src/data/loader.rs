use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::error::{DataError, Result};
use super::model::{Dataset, Field, Record, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sensor dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one observation per line (recommended)
/// * `.json`    – `[{ "year": 2013, "station": "Dongsi", "PM2.5": 9.0, ... }, ...]`
/// * `.parquet` – flat columns with the same names
///
/// The loaded rows are logged together with the months they span.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: other.to_string(),
        }),
    }?;

    let incomplete = dataset.records().iter().filter(|r| r.has_missing()).count();
    if incomplete > 0 {
        log::debug!(
            "{}: {incomplete} of {} rows have missing readings",
            path.display(),
            dataset.len()
        );
    }
    match dataset.period_span() {
        Some((first, last)) => log::info!(
            "Loaded {} rows from {} covering {first} to {last}",
            dataset.len(),
            path.display()
        ),
        None => log::info!("Loaded 0 rows from {}", path.display()),
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Normalisation shared by every format
// ---------------------------------------------------------------------------

/// One row as read from storage, before the date is validated.
#[derive(Debug, Default)]
struct RawRow {
    year: Option<f64>,
    month: Option<f64>,
    day: Option<f64>,
    station: String,
    /// In [`Field::ALL`] order.
    readings: [Option<f64>; 6],
}

/// `row` is the 1-based data row (the header is not counted).
fn normalize(path: &Path, row: usize, raw: RawRow) -> Result<Record> {
    let date = build_date(raw.year, raw.month, raw.day).map_err(|detail| DataError::Parse {
        path: path.to_path_buf(),
        row,
        detail,
    })?;
    Ok(Record::new(date, raw.station, raw.readings))
}

fn build_date(
    year: Option<f64>,
    month: Option<f64>,
    day: Option<f64>,
) -> std::result::Result<NaiveDate, String> {
    let year = whole_number(year, "year")?;
    let month = whole_number(month, "month")?;
    let day = whole_number(day, "day")?;
    let invalid = || format!("{year:04}-{month:02}-{day:02} is not a valid calendar date");

    let y = i32::try_from(year).map_err(|_| invalid())?;
    let m = u32::try_from(month).map_err(|_| invalid())?;
    let d = u32::try_from(day).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(invalid)
}

fn whole_number(value: Option<f64>, name: &str) -> std::result::Result<i64, String> {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        Some(v) => Err(format!("'{name}' is not a whole number: {v}")),
        None => Err(format!("'{name}' is missing or not a number")),
    }
}

fn parse_lenient(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn check_columns(path: &Path, mut present: impl FnMut(&str) -> bool) -> Result<()> {
    match REQUIRED_COLUMNS.iter().find(|c| !present(c)) {
        Some(column) => Err(DataError::Schema {
            path: path.to_path_buf(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Unknown columns (`No`, `hour`, `SO2`, `wd`, ...) are ignored by serde.
/// `csv::invalid_option` turns `NA`, blanks and other garbage into `None`.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(deserialize_with = "csv::invalid_option")]
    year: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    month: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    day: Option<f64>,
    station: String,
    #[serde(rename = "PM2.5", deserialize_with = "csv::invalid_option")]
    pm25: Option<f64>,
    #[serde(rename = "PM10", deserialize_with = "csv::invalid_option")]
    pm10: Option<f64>,
    #[serde(rename = "TEMP", deserialize_with = "csv::invalid_option")]
    temp: Option<f64>,
    #[serde(rename = "PRES", deserialize_with = "csv::invalid_option")]
    pres: Option<f64>,
    #[serde(rename = "DEWP", deserialize_with = "csv::invalid_option")]
    dewp: Option<f64>,
    #[serde(rename = "RAIN", deserialize_with = "csv::invalid_option")]
    rain: Option<f64>,
}

impl From<CsvRow> for RawRow {
    fn from(row: CsvRow) -> Self {
        RawRow {
            year: row.year,
            month: row.month,
            day: row.day,
            station: row.station,
            readings: [row.pm25, row.pm10, row.temp, row.pres, row.dewp, row.rain],
        }
    }
}

fn load_csv(path: &Path) -> Result<Dataset> {
    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(csv_err)?.clone();
    check_columns(path, |col| headers.iter().any(|h| h == col))?;

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.map_err(csv_err)?;
        records.push(normalize(path, i + 1, row.into())?);
    }

    Ok(Dataset::new(path, records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "year": 2013, "month": 3, "day": 1, "station": "Aotizhongxin",
///     "PM2.5": 9.0, "PM10": 9.0, "TEMP": 1.6, "PRES": 1024.5,
///     "DEWP": -21.4, "RAIN": 0.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = root.as_array().ok_or_else(|| DataError::JsonLayout {
        path: path.to_path_buf(),
        detail: "expected a top-level JSON array".to_string(),
    })?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| DataError::JsonLayout {
            path: path.to_path_buf(),
            detail: format!("row {} is not a JSON object", i + 1),
        })?;
        check_columns(path, |col| obj.contains_key(col))?;
        records.push(normalize(path, i + 1, json_row(obj))?);
    }

    Ok(Dataset::new(path, records))
}

fn json_row(obj: &Map<String, JsonValue>) -> RawRow {
    let number = |key: &str| match obj.get(key) {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => parse_lenient(s),
        _ => None,
    };
    let station = match obj.get("station") {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    RawRow {
        year: number("year"),
        month: number("month"),
        day: number("day"),
        station,
        readings: Field::ALL.map(|f| number(f.column())),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per required field.
///
/// Numeric columns may be any integer, float or decimal type, or text that
/// parses as a number; `station` may be text or an integer code. Dictionary
/// encodings of those (pandas categoricals) are accepted too. Any other
/// column type is rejected. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let parquet_err = |source| DataError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let schema = builder.schema().clone();
    check_columns(path, |col| schema.index_of(col).is_ok())?;
    for field in schema.fields() {
        let name = field.name().as_str();
        let accepted = match name {
            "station" => accepts_station(field.data_type()),
            _ if REQUIRED_COLUMNS.contains(&name) => accepts_number(field.data_type()),
            _ => true,
        };
        if !accepted {
            return Err(DataError::ColumnType {
                path: path.to_path_buf(),
                column: name.to_string(),
                data_type: field.data_type().to_string(),
            });
        }
    }
    let reader = builder.build().map_err(parquet_err)?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|source| DataError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;

        let year = float_column(path, &batch, "year")?;
        let month = float_column(path, &batch, "month")?;
        let day = float_column(path, &batch, "day")?;
        let station = text_column(path, &batch, "station")?;
        let readings = Field::ALL
            .iter()
            .map(|f| float_column(path, &batch, f.column()))
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let raw = RawRow {
                year: float_at(&year, row),
                month: float_at(&month, row),
                day: float_at(&day, row),
                station: if station.is_null(row) {
                    String::new()
                } else {
                    station.value(row).to_string()
                },
                readings: std::array::from_fn(|k| float_at(&readings[k], row)),
            };
            let row_no = records.len() + 1;
            records.push(normalize(path, row_no, raw)?);
        }
    }

    Ok(Dataset::new(path, records))
}

// -- Parquet / Arrow helpers --

fn is_text(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Null | DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    )
}

/// Types that cast to `Float64` value by value.
fn accepts_number(data_type: &DataType) -> bool {
    match data_type {
        DataType::Dictionary(_, values) => accepts_number(values),
        other => is_text(other) || other.is_numeric(),
    }
}

/// Types that cast to `Utf8` value by value.
fn accepts_station(data_type: &DataType) -> bool {
    match data_type {
        DataType::Dictionary(_, values) => accepts_station(values),
        other => is_text(other) || other.is_integer(),
    }
}

/// Presence was checked against the file schema, so a miss here means the
/// batch disagrees with it.
fn batch_column<'b>(path: &Path, batch: &'b RecordBatch, name: &str) -> Result<&'b ArrayRef> {
    batch.column_by_name(name).ok_or_else(|| DataError::Schema {
        path: path.to_path_buf(),
        column: name.to_string(),
    })
}

/// Cast a column to `target`. Unparseable text becomes null.
fn cast_column(path: &Path, batch: &RecordBatch, name: &str, target: &DataType) -> Result<ArrayRef> {
    let column = batch_column(path, batch, name)?;
    cast(column, target).map_err(|source| DataError::Arrow {
        path: path.to_path_buf(),
        source,
    })
}

fn float_column(path: &Path, batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let column = cast_column(path, batch, name, &DataType::Float64)?;
    column
        .as_primitive_opt::<Float64Type>()
        .cloned()
        .ok_or_else(|| DataError::ColumnType {
            path: path.to_path_buf(),
            column: name.to_string(),
            data_type: column.data_type().to_string(),
        })
}

fn text_column(path: &Path, batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let column = cast_column(path, batch, name, &DataType::Utf8)?;
    column
        .as_string_opt::<i32>()
        .cloned()
        .ok_or_else(|| DataError::ColumnType {
            path: path.to_path_buf(),
            column: name.to_string(),
            data_type: column.data_type().to_string(),
        })
}

/// `None` for nulls and NaN.
fn float_at(column: &Float64Array, row: usize) -> Option<f64> {
    if column.is_null(row) {
        return None;
    }
    Some(column.value(row)).filter(|v| !v.is_nan())
}
