//! CSV Data Loader Module
//! Downloads the case-outcomes table and parses it with Polars.

use crate::config::ColumnNames;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} responded with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Column '{expected}' not found (available: {available})")]
    MissingColumn { expected: String, available: String },
}

/// Actual header names of the three columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub date: String,
    pub disposition: String,
    pub count: String,
}

/// Loads the source table, either over HTTP or from a local snapshot.
pub struct DataLoader {
    client: reqwest::blocking::Client,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Fetch `source` and parse it into an all-text DataFrame.
    pub fn load(&self, source: &str) -> Result<DataFrame, LoaderError> {
        let bytes = if source.starts_with("http://") || source.starts_with("https://") {
            self.download(source)?
        } else {
            Self::read_local(Path::new(source))?
        };
        let df = Self::parse_csv(bytes)?;
        log::info!("Parsed {} rows from {}", df.height(), source);
        Ok(df)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, LoaderError> {
        let http_err = |source| LoaderError::Http {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::Status {
                url: url.to_string(),
                status,
            });
        }
        let bytes = response.bytes().map_err(http_err)?;
        log::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    fn read_local(path: &Path) -> Result<Vec<u8>, LoaderError> {
        std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse CSV bytes with every column kept as text; validation happens downstream.
    pub fn parse_csv(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Ok(df)
    }

    /// Locate the configured columns, tolerating punctuation and case differences.
    pub fn resolve_columns(
        df: &DataFrame,
        names: &ColumnNames,
    ) -> Result<ResolvedColumns, LoaderError> {
        let available: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let find = |expected: &str| -> Result<String, LoaderError> {
            if available.iter().any(|c| c == expected) {
                return Ok(expected.to_string());
            }
            let key = column_key(expected);
            available
                .iter()
                .find(|c| column_key(c) == key)
                .cloned()
                .ok_or_else(|| LoaderError::MissingColumn {
                    expected: expected.to_string(),
                    available: available.join(", "),
                })
        };

        Ok(ResolvedColumns {
            date: find(&names.date)?,
            disposition: find(&names.disposition)?,
            count: find(&names.count)?,
        })
    }
}

/// Lowercased alphanumerics only: "Aggravated Assault Gun" == "Aggravated.Assault.Gun".
fn column_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
