//! Dataset Loader Module
//! Downloads the GSS extract and parses it with Polars.

use polars::prelude::*;
use std::io::Cursor;
use thiserror::Error;
use tracing::info;

/// Public location of the 2018 General Social Survey extract.
pub const GSS_2018_URL: &str =
    "https://github.com/jkropko/DS-6001/raw/master/localdata/gss2018.csv";

/// Textual codes the survey uses for missing or uncodeable answers.
/// All of them are mapped to null at parse time.
pub const MISSING_SENTINELS: [&str; 7] = [
    "IAP",
    "IAP,DK,NA,uncodeable",
    "NOT SURE",
    "DK",
    "IAP, DK, NA, uncodeable",
    ".a",
    "CAN'T CHOOSE",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to download dataset: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Dataset is empty")]
    NoData,
}

/// Fetches the survey CSV over HTTP and parses it into a DataFrame.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Download the dataset from `url` with a single GET. There is no retry;
    /// a network failure surfaces to the caller.
    pub fn fetch(url: &str) -> Result<DataFrame, LoaderError> {
        info!(url, "downloading dataset");
        let response = reqwest::blocking::get(url)?.error_for_status()?;
        let bytes = response.bytes()?.to_vec();
        info!(bytes = bytes.len(), "download complete");
        Self::parse_bytes(bytes)
    }

    /// Load the dataset from a local file (offline copy, test fixtures).
    pub fn from_path(path: &str) -> Result<DataFrame, LoaderError> {
        let bytes = std::fs::read(path)?;
        Self::parse_bytes(bytes)
    }

    /// Parse raw CSV bytes. The extract is cp1252-encoded, so non-UTF-8
    /// bytes are decoded lossily rather than rejected.
    pub fn parse_bytes(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let null_values: Vec<PlSmallStr> = MISSING_SENTINELS
            .iter()
            .map(|s| PlSmallStr::from_static(s))
            .collect();

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_encoding(CsvEncoding::LossyUtf8)
                    .with_null_values(Some(NullValues::AllColumns(null_values))),
            )
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        if df.height() == 0 {
            return Err(LoaderError::NoData);
        }

        info!(rows = df.height(), cols = df.width(), "dataset parsed");
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_and_maps_sentinels_to_null() {
        let csv = b"id,age,satjob\n1,31,very satisfied\n2,IAP,DK\n3,44,NOT SURE\n".to_vec();
        let df = DatasetLoader::parse_bytes(csv).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_eq!(df.column("satjob").unwrap().null_count(), 2);
    }

    #[test]
    fn empty_input_is_an_error() {
        let csv = b"id,age\n".to_vec();
        assert!(matches!(
            DatasetLoader::parse_bytes(csv),
            Err(LoaderError::NoData)
        ));
    }
}
