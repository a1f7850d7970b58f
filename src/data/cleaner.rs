//! Data Cleaner Module
//! Projects the raw survey table to the fixed column subset, renames columns
//! to readable labels, and normalizes the age attribute.

use polars::prelude::*;
use thiserror::Error;

/// Raw survey columns kept by the pipeline.
pub const RAW_COLUMNS: [&str; 17] = [
    "id", "wtss", "sex", "educ", "region", "age", "coninc", "prestg10", "mapres10", "papres10",
    "sei10", "satjob", "fechld", "fefam", "fepol", "fepresch", "meovrwrk",
];

/// Raw column -> readable label. Columns not listed keep their name.
pub const RENAMES: [(&str, &str); 12] = [
    ("wtss", "weight"),
    ("educ", "education"),
    ("coninc", "income"),
    ("prestg10", "job_prestige"),
    ("mapres10", "mother_job_prestige"),
    ("papres10", "father_job_prestige"),
    ("sei10", "socioeconomic_index"),
    ("fechld", "relationship"),
    ("fefam", "male_breadwinner"),
    ("fepol", "men_bettersuited"),
    ("fepresch", "child_suffer"),
    ("meovrwrk", "men_overwork"),
];

/// Top-coded age answer, replaced by its numeric equivalent before the cast.
pub const AGE_TOP_CODE: &str = "89 or older";

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Expected column '{0}' is missing from the dataset")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Readable label for a raw column name.
pub fn renamed(raw: &str) -> &str {
    RENAMES
        .iter()
        .find(|(from, _)| *from == raw)
        .map(|(_, to)| *to)
        .unwrap_or(raw)
}

/// Handles projection, renaming, and type coercion of the raw table.
pub struct DataCleaner;

impl DataCleaner {
    /// Produce the cleaned table used by every downstream aggregate.
    ///
    /// The age column is top-coded as "89 or older" in the source; that
    /// sentinel is replaced with 89 and the column cast to Float64. Values
    /// that still fail to parse become null rather than aborting the cast.
    pub fn clean(df: &DataFrame) -> Result<DataFrame, CleanError> {
        for raw in RAW_COLUMNS {
            if df.column(raw).is_err() {
                return Err(CleanError::MissingColumn(raw.to_string()));
            }
        }

        let age_is_text = matches!(df.column("age")?.dtype(), DataType::String);

        let exprs: Vec<Expr> = RAW_COLUMNS
            .iter()
            .map(|raw| {
                if *raw == "age" {
                    let age = if age_is_text {
                        when(col("age").eq(lit(AGE_TOP_CODE)))
                            .then(lit("89"))
                            .otherwise(col("age"))
                    } else {
                        col("age")
                    };
                    // Non-strict cast: malformed answers become null.
                    age.cast(DataType::Float64).alias("age")
                } else {
                    col(*raw).alias(renamed(raw))
                }
            })
            .collect();

        let clean = df.clone().lazy().select(exprs).collect()?;
        Ok(clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_fixture() -> DataFrame {
        df!(
            "id" => [1i64, 2, 3],
            "wtss" => [1.0f64, 1.0, 1.0],
            "sex" => ["male", "female", "female"],
            "educ" => [12.0f64, 16.0, 14.0],
            "region" => ["south", "pacific", "pacific"],
            "age" => [Some("31"), Some("89 or older"), None],
            "coninc" => [Some(45000.0f64), Some(60000.0), None],
            "prestg10" => [40.0f64, 55.0, 47.0],
            "mapres10" => [30.0f64, 42.0, 35.0],
            "papres10" => [38.0f64, 50.0, 41.0],
            "sei10" => [52.1f64, 71.4, 60.3],
            "satjob" => ["very satisfied", "mod. satisfied", "very satisfied"],
            "fechld" => ["agree", "disagree", "agree"],
            "fefam" => ["disagree", "strongly disagree", "agree"],
            "fepol" => ["disagree", "disagree", "agree"],
            "fepresch" => ["agree", "disagree", "disagree"],
            "meovrwrk" => ["agree", "neither agree nor disagree", "disagree"],
        )
        .unwrap()
    }

    #[test]
    fn renames_columns_to_readable_labels() {
        let clean = DataCleaner::clean(&raw_fixture()).unwrap();

        for label in [
            "weight",
            "education",
            "income",
            "job_prestige",
            "mother_job_prestige",
            "father_job_prestige",
            "socioeconomic_index",
            "relationship",
            "male_breadwinner",
            "men_bettersuited",
            "child_suffer",
            "men_overwork",
        ] {
            assert!(clean.column(label).is_ok(), "missing column {label}");
        }
        assert!(clean.column("coninc").is_err());
        assert_eq!(clean.width(), RAW_COLUMNS.len());
    }

    #[test]
    fn age_is_numeric_after_cleaning() {
        let clean = DataCleaner::clean(&raw_fixture()).unwrap();
        let age = clean.column("age").unwrap();

        assert_eq!(age.dtype(), &DataType::Float64);
        let values = age.f64().unwrap();
        assert_eq!(values.get(0), Some(31.0));
        assert_eq!(values.get(1), Some(89.0));
        assert_eq!(values.get(2), None);
    }

    #[test]
    fn numeric_age_column_is_cast_without_replacement() {
        let mut raw = raw_fixture();
        raw.replace("age", Series::new("age".into(), [31i64, 89, 23]))
            .unwrap();

        let clean = DataCleaner::clean(&raw).unwrap();
        let age = clean.column("age").unwrap();
        assert_eq!(age.dtype(), &DataType::Float64);
        assert_eq!(age.f64().unwrap().get(2), Some(23.0));
    }

    #[test]
    fn missing_expected_column_is_reported() {
        let raw = raw_fixture().drop("satjob").unwrap();
        match DataCleaner::clean(&raw) {
            Err(CleanError::MissingColumn(name)) => assert_eq!(name, "satjob"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
