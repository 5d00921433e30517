use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a sensor dataset.
///
/// Missing or unparseable readings are not errors: they load as `None`.
#[derive(Error, Debug)]
pub enum DataError {
    /// A required column is absent from the file header.
    #[error("{}: missing required column '{column}'", .path.display())]
    Schema { path: PathBuf, column: String },

    /// The date components of a row do not form a valid calendar date.
    #[error("{}: data row {row}: {detail}", .path.display())]
    Parse {
        path: PathBuf,
        row: usize,
        detail: String,
    },

    /// A Parquet column has a type that cannot be read as its field.
    #[error("{}: column '{column}' has unsupported type {data_type}", .path.display())]
    ColumnType {
        path: PathBuf,
        column: String,
        data_type: String,
    },

    #[error("{}: unsupported file extension '.{extension}'", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON document parsed but is not an array of row objects.
    #[error("{}: {detail}", .path.display())]
    JsonLayout { path: PathBuf, detail: String },

    #[error("{}: {source}", .path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("{}: {source}", .path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;
