use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("data format error: {0}")]
    DataFormat(String),

    #[error("CSV reader error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
