//! Aggregation Module
//! Grouped means, grouped counts, and equal-width binning over the cleaned
//! survey table.

use polars::prelude::*;
use thiserror::Error;

/// Labels for the six equal-width occupational prestige bins.
pub const PRESTIGE_LEVELS: [&str; 6] = [
    "Level 1", "Level 2", "Level 3", "Level 4", "Level 5", "Level 6",
];

/// Numeric attributes summarized in the grouped-means table.
pub const MEAN_COLUMNS: [&str; 4] = [
    "education",
    "income",
    "job_prestige",
    "socioeconomic_index",
];

// Ordinal answer ladders used to order bar-chart categories.
const AGREEMENT_LADDER: [&str; 5] = [
    "strongly agree",
    "agree",
    "neither agree nor disagree",
    "disagree",
    "strongly disagree",
];
const SATISFACTION_LADDER: [&str; 4] = [
    "very satisfied",
    "mod. satisfied",
    "a little dissat",
    "very dissatisfied",
];

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' has no usable values")]
    EmptyColumn(String),
    #[error("Column '{0}' is constant; equal-width bins are undefined")]
    ConstantColumn(String),
}

/// Per-group arithmetic mean of `value_cols`, keyed by `group_col`.
///
/// Null group keys are dropped, null values are skipped by the mean. The
/// group column comes back cast to String so numeric grouping keys
/// (e.g. education years) render uniformly downstream.
pub fn group_means(
    df: &DataFrame,
    group_col: &str,
    value_cols: &[&str],
) -> Result<DataFrame, AnalysisError> {
    // The grouping key cannot also be aggregated (education can be both).
    let aggs: Vec<Expr> = value_cols
        .iter()
        .filter(|c| **c != group_col)
        .map(|c| col(*c).cast(DataType::Float64).mean())
        .collect();

    let out = df
        .clone()
        .lazy()
        .filter(col(group_col).is_not_null())
        .group_by([col(group_col)])
        .agg(aggs)
        .sort([group_col], SortMultipleOptions::default())
        .with_column(col(group_col).cast(DataType::String))
        .collect()?;
    Ok(out)
}

/// Respondent counts per (group, answer level) pair. Rows where either key
/// is null are excluded before counting.
pub fn group_counts(
    df: &DataFrame,
    group_col: &str,
    var_col: &str,
) -> Result<DataFrame, AnalysisError> {
    let out = df
        .clone()
        .lazy()
        .filter(col(group_col).is_not_null().and(col(var_col).is_not_null()))
        .group_by([col(group_col), col(var_col)])
        .agg([len().alias("count")])
        .sort([group_col, var_col], SortMultipleOptions::default())
        .with_columns([
            col(group_col).cast(DataType::String),
            col(var_col).cast(DataType::String),
        ])
        .collect()?;
    Ok(out)
}

/// Append an equal-width categorical binning of `value_col` as `out_col`.
///
/// Bins are right-closed `(lo, hi]` over `labels.len()` equal widths, with
/// the lowest edge padded down by 0.1% of the range so the column minimum
/// falls in the first bin. Null and out-of-range values get a null label.
pub fn with_equal_width_bins(
    df: &DataFrame,
    value_col: &str,
    out_col: &str,
    labels: &[&str],
) -> Result<DataFrame, AnalysisError> {
    let values = df.column(value_col)?.cast(&DataType::Float64)?;
    let ca = values.f64()?;

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in ca.into_iter().flatten() {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() {
        return Err(AnalysisError::EmptyColumn(value_col.to_string()));
    }
    if hi <= lo {
        return Err(AnalysisError::ConstantColumn(value_col.to_string()));
    }

    let n = labels.len();
    let span = hi - lo;
    let mut edges: Vec<f64> = (0..=n).map(|i| lo + span * i as f64 / n as f64).collect();
    edges[0] = lo - span * 0.001;

    let assigned: Vec<Option<&str>> = ca
        .into_iter()
        .map(|opt| {
            opt.filter(|v| v.is_finite()).and_then(|v| {
                (0..n)
                    .find(|&i| v > edges[i] && v <= edges[i + 1])
                    .map(|i| labels[i])
            })
        })
        .collect();

    let mut out = df.clone();
    out.with_column(Column::new(out_col.into(), assigned))?;
    Ok(out)
}

/// Drop every row holding a null in any of `cols`.
pub fn drop_null_rows(df: &DataFrame, cols: &[&str]) -> Result<DataFrame, AnalysisError> {
    let mut keep = lit(true);
    for c in cols {
        keep = keep.and(col(*c).is_not_null());
    }
    Ok(df.clone().lazy().filter(keep).collect()?)
}

/// The (income, sex, prestige level) table behind the faceted box plot:
/// six equal-width prestige bins, rows with a missing value dropped.
pub fn prestige_level_table(clean: &DataFrame) -> Result<DataFrame, AnalysisError> {
    let subset = clean.select(["income", "sex", "job_prestige"])?;
    let binned = with_equal_width_bins(&subset, "job_prestige", "job_prestige_level", &PRESTIGE_LEVELS)?;
    drop_null_rows(&binned, &["income", "sex", "job_prestige_level"])
}

/// Order answer levels on their ordinal ladder when every observed level
/// belongs to a known ladder, otherwise alphabetically.
pub fn ordered_levels(levels: &[String]) -> Vec<String> {
    for ladder in [&AGREEMENT_LADDER[..], &SATISFACTION_LADDER[..]] {
        if !levels.is_empty() && levels.iter().all(|l| ladder.contains(&l.as_str())) {
            return ladder
                .iter()
                .filter(|step| levels.iter().any(|l| l == *step))
                .map(|s| s.to_string())
                .collect();
        }
    }
    let mut out = levels.to_vec();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_means_match_arithmetic_means() {
        let df = df!(
            "sex" => ["male", "male", "female", "female"],
            "income" => [100.0f64, 50.0, 80.0, 40.0],
        )
        .unwrap();

        let means = group_means(&df, "sex", &["income"]).unwrap();
        assert_eq!(means.height(), 2);

        let groups = means.column("sex").unwrap();
        let income = means.column("income").unwrap().f64().unwrap();
        assert_eq!(groups.str().unwrap().get(0), Some("female"));
        assert!((income.get(0).unwrap() - 60.0).abs() < 1e-12);
        assert!((income.get(1).unwrap() - 75.0).abs() < 1e-12);
    }

    #[test]
    fn grouped_means_skip_nulls_in_values_and_keys() {
        let df = df!(
            "sex" => [Some("male"), Some("male"), None],
            "income" => [Some(10.0f64), None, Some(99.0)],
        )
        .unwrap();

        let means = group_means(&df, "sex", &["income"]).unwrap();
        assert_eq!(means.height(), 1);
        assert_eq!(means.column("income").unwrap().f64().unwrap().get(0), Some(10.0));
    }

    #[test]
    fn counts_per_group_and_level() {
        let df = df!(
            "sex" => [Some("male"), Some("male"), Some("female"), None],
            "fefam" => [Some("agree"), Some("agree"), Some("disagree"), Some("agree")],
        )
        .unwrap();

        let counts = group_counts(&df, "sex", "fefam").unwrap();
        assert_eq!(counts.height(), 2);

        let n = counts.column("count").unwrap().u32().unwrap();
        assert_eq!(n.get(0), Some(1)); // female / disagree
        assert_eq!(n.get(1), Some(2)); // male / agree
    }

    #[test]
    fn equal_width_bins_are_right_closed() {
        let df = df!(
            "job_prestige" => [Some(0.0f64), Some(10.0), Some(10.5), Some(35.0), Some(60.0), None],
        )
        .unwrap();

        // Range 0..60, six bins of width 10.
        let binned =
            with_equal_width_bins(&df, "job_prestige", "level", &PRESTIGE_LEVELS).unwrap();
        let level = binned.column("level").unwrap();
        let level = level.str().unwrap();

        assert_eq!(level.get(0), Some("Level 1")); // minimum, padded left edge
        assert_eq!(level.get(1), Some("Level 1")); // edge value joins the lower bin
        assert_eq!(level.get(2), Some("Level 2"));
        assert_eq!(level.get(3), Some("Level 4"));
        assert_eq!(level.get(4), Some("Level 6")); // maximum
        assert_eq!(level.get(5), None);
    }

    #[test]
    fn constant_column_cannot_be_binned() {
        let df = df!("x" => [5.0f64, 5.0, 5.0]).unwrap();
        assert!(matches!(
            with_equal_width_bins(&df, "x", "level", &PRESTIGE_LEVELS),
            Err(AnalysisError::ConstantColumn(_))
        ));
    }

    #[test]
    fn prestige_table_has_no_missing_rows_after_drop() {
        let df = df!(
            "id" => [1i64, 2, 3, 4],
            "income" => [Some(100.0f64), None, Some(80.0), Some(55.0)],
            "sex" => [Some("male"), Some("female"), Some("female"), None],
            "job_prestige" => [Some(30.0f64), Some(40.0), Some(70.0), Some(50.0)],
        )
        .unwrap();

        let table = prestige_level_table(&df).unwrap();
        assert_eq!(table.height(), 2);
        for name in ["income", "sex", "job_prestige_level"] {
            assert_eq!(table.column(name).unwrap().null_count(), 0);
        }
    }

    #[test]
    fn known_ladders_order_levels_ordinally() {
        let observed = vec![
            "disagree".to_string(),
            "strongly agree".to_string(),
            "agree".to_string(),
        ];
        assert_eq!(
            ordered_levels(&observed),
            vec!["strongly agree", "agree", "disagree"]
        );
    }

    #[test]
    fn unknown_levels_fall_back_to_alphabetical() {
        let observed = vec!["zeta".to_string(), "alpha".to_string()];
        assert_eq!(ordered_levels(&observed), vec!["alpha", "zeta"]);
    }
}
