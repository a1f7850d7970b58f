//! Chart Builder Module
//! Stateless constructions mapping the cleaned table to plain chart data.
//! Drawing lives in the plotter; nothing here touches the UI.

use crate::analysis::{
    fit_ols, group_counts, group_means, ordered_levels, prestige_level_table, AnalysisError,
    LinearFit, MEAN_COLUMNS, PRESTIGE_LEVELS,
};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// Grouping keys offered by the explore dropdown.
pub const GROUPING_OPTIONS: [&str; 3] = ["sex", "region", "education"];

/// Attitude variables offered by the explore dropdown.
pub const VARIABLE_OPTIONS: [&str; 6] = [
    "satjob",
    "relationship",
    "male_breadwinner",
    "men_bettersuited",
    "child_suffer",
    "men_overwork",
];

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Grouped-means table (one row per group, one column per attribute).
#[derive(Debug, Clone, Serialize)]
pub struct MeansTable {
    pub group_label: String,
    pub columns: Vec<String>,
    pub rows: Vec<MeansRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeansRow {
    pub group: String,
    pub means: Vec<Option<f64>>,
}

/// Grouped bar chart of answer counts, one series per group.
#[derive(Debug, Clone)]
pub struct GroupedBarChart {
    pub var_label: String,
    pub levels: Vec<String>,
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone)]
pub struct BarSeries {
    pub group: String,
    /// Counts aligned with `GroupedBarChart::levels`.
    pub counts: Vec<u64>,
}

/// Scatter plot with one point cloud and OLS trendline per group.
#[derive(Debug, Clone)]
pub struct ScatterChart {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

#[derive(Debug, Clone)]
pub struct ScatterSeries {
    pub group: String,
    pub points: Vec<[f64; 2]>,
    pub fit: Option<LinearFit>,
}

/// Box plot of one numeric attribute split by group.
#[derive(Debug, Clone)]
pub struct BoxChart {
    pub value_label: String,
    pub groups: Vec<BoxGroup>,
}

#[derive(Debug, Clone)]
pub struct BoxGroup {
    pub group: String,
    pub values: Vec<f64>,
}

/// Grid of box plots split by a categorical facet.
#[derive(Debug, Clone)]
pub struct FacetedBoxChart {
    pub facet_label: String,
    pub facets: Vec<(String, BoxChart)>,
}

/// The six dashboard charts, built once per dataset load.
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub means: MeansTable,
    pub breadwinner_bar: GroupedBarChart,
    pub prestige_scatter: ScatterChart,
    pub income_box: BoxChart,
    pub prestige_box: BoxChart,
    pub income_by_level: FacetedBoxChart,
}

/// Output of the explore section for one (grouping, variable) selection.
#[derive(Debug, Clone)]
pub struct ExploreView {
    pub grouping: String,
    pub variable: String,
    pub bar: GroupedBarChart,
    pub means: MeansTable,
}

/// Readable label for a cleaned column name.
pub fn human_label(col: &str) -> String {
    match col {
        "satjob" => "job satisfaction".to_string(),
        _ => col.replace('_', " "),
    }
}

/// Builds chart data structures from the cleaned table.
pub struct ChartBuilder;

impl ChartBuilder {
    /// Build all six dashboard charts. The constructions are independent,
    /// so they run in parallel.
    pub fn build_chart_set(clean: &DataFrame) -> Result<ChartSet, BuildError> {
        let ((means, bar), ((scatter, income_box), (prestige_box, faceted))) = rayon::join(
            || {
                rayon::join(
                    || Self::build_means_table(clean, "sex"),
                    || Self::build_counts_bar(clean, "sex", "male_breadwinner"),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || Self::build_scatter(clean),
                            || Self::build_box(clean, "income"),
                        )
                    },
                    || {
                        rayon::join(
                            || Self::build_box(clean, "job_prestige"),
                            || Self::build_faceted_box(clean),
                        )
                    },
                )
            },
        );

        Ok(ChartSet {
            means: means?,
            breadwinner_bar: bar?,
            prestige_scatter: scatter?,
            income_box: income_box?,
            prestige_box: prestige_box?,
            income_by_level: faceted?,
        })
    }

    /// Build the explore section for a (grouping, variable) selection.
    pub fn build_explore(
        clean: &DataFrame,
        grouping: &str,
        variable: &str,
    ) -> Result<ExploreView, BuildError> {
        let (bar, means) = rayon::join(
            || Self::build_counts_bar(clean, grouping, variable),
            || Self::build_means_table(clean, grouping),
        );
        Ok(ExploreView {
            grouping: grouping.to_string(),
            variable: variable.to_string(),
            bar: bar?,
            means: means?,
        })
    }

    /// Grouped means of the four socioeconomic attributes, rounded to two
    /// decimals for display.
    pub fn build_means_table(df: &DataFrame, group_col: &str) -> Result<MeansTable, BuildError> {
        let summarized: Vec<&str> = MEAN_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != group_col)
            .collect();
        let means_df = group_means(df, group_col, &summarized)?;

        let groups = means_df.column(group_col)?;
        let groups = groups.str()?;
        let value_cols: Vec<&Float64Chunked> = summarized
            .iter()
            .map(|c| means_df.column(c).and_then(|col| col.f64()))
            .collect::<PolarsResult<_>>()?;

        let mut rows = Vec::with_capacity(means_df.height());
        for i in 0..means_df.height() {
            let Some(group) = groups.get(i) else { continue };
            let means = value_cols
                .iter()
                .map(|ca| ca.get(i).map(|v| (v * 100.0).round() / 100.0))
                .collect();
            rows.push(MeansRow {
                group: group.to_string(),
                means,
            });
        }

        Ok(MeansTable {
            group_label: human_label(group_col),
            columns: summarized
                .iter()
                .map(|c| format!("mean {}", human_label(c)))
                .collect(),
            rows,
        })
    }

    /// Answer counts per (group, level), with levels in ordinal order.
    pub fn build_counts_bar(
        df: &DataFrame,
        group_col: &str,
        var_col: &str,
    ) -> Result<GroupedBarChart, BuildError> {
        let counts = group_counts(df, group_col, var_col)?;

        let groups_col = counts.column(group_col)?;
        let groups_col = groups_col.str()?;
        let levels_col = counts.column(var_col)?;
        let levels_col = levels_col.str()?;
        let n_col = counts.column("count")?.u32()?;

        let mut observed: Vec<(String, String, u64)> = Vec::with_capacity(counts.height());
        for i in 0..counts.height() {
            if let (Some(g), Some(l), Some(n)) =
                (groups_col.get(i), levels_col.get(i), n_col.get(i))
            {
                observed.push((g.to_string(), l.to_string(), n as u64));
            }
        }

        let mut level_set: Vec<String> = observed.iter().map(|(_, l, _)| l.clone()).collect();
        level_set.sort();
        level_set.dedup();
        let levels = ordered_levels(&level_set);

        let mut group_set: Vec<String> = observed.iter().map(|(g, _, _)| g.clone()).collect();
        group_set.sort();
        group_set.dedup();

        let series = group_set
            .into_iter()
            .map(|group| {
                let counts = levels
                    .iter()
                    .map(|level| {
                        observed
                            .iter()
                            .find(|(g, l, _)| g == &group && l == level)
                            .map(|(_, _, n)| *n)
                            .unwrap_or(0)
                    })
                    .collect();
                BarSeries { group, counts }
            })
            .collect();

        Ok(GroupedBarChart {
            var_label: human_label(var_col),
            levels,
            series,
        })
    }

    /// Occupational prestige vs income by sex, with an OLS trendline fitted
    /// per group.
    pub fn build_scatter(df: &DataFrame) -> Result<ScatterChart, BuildError> {
        let series = Self::unique_groups(df, "sex")
            .into_iter()
            .map(|group| {
                let points = Self::xy_for_group(df, "sex", &group, "job_prestige", "income")?;
                let pairs: Vec<(f64, f64)> = points.iter().map(|p| (p[0], p[1])).collect();
                let fit = fit_ols(&pairs);
                Ok(ScatterSeries { group, points, fit })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        Ok(ScatterChart {
            x_label: "occupational prestige".to_string(),
            y_label: "income".to_string(),
            series,
        })
    }

    /// Distribution of one numeric attribute split by sex.
    pub fn build_box(df: &DataFrame, value_col: &str) -> Result<BoxChart, BuildError> {
        let groups = Self::unique_groups(df, "sex")
            .into_iter()
            .map(|group| {
                let values = Self::values_for_group(df, "sex", &group, value_col)?;
                Ok(BoxGroup { group, values })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        Ok(BoxChart {
            value_label: human_label(value_col),
            groups,
        })
    }

    /// Income by sex across the six occupational prestige levels.
    pub fn build_faceted_box(df: &DataFrame) -> Result<FacetedBoxChart, BuildError> {
        let table = prestige_level_table(df)?;

        let facets = PRESTIGE_LEVELS
            .par_iter()
            .map(|level| {
                let subset = table
                    .clone()
                    .lazy()
                    .filter(col("job_prestige_level").eq(lit(*level)))
                    .collect()?;
                if subset.height() == 0 {
                    return Ok(None);
                }
                let chart = Self::build_box(&subset, "income")?;
                Ok(Some((level.to_string(), chart)))
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        Ok(FacetedBoxChart {
            facet_label: "level of occupational prestige".to_string(),
            facets: facets.into_iter().flatten().collect(),
        })
    }

    /// Unique non-null values of a column, sorted.
    pub fn unique_groups(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .ok()
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                let mut groups: Vec<String> = series
                    .iter()
                    .filter_map(|v| {
                        if v.is_null() {
                            None
                        } else {
                            Some(v.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();
                groups.sort();
                groups
            })
            .unwrap_or_default()
    }

    /// Non-null values of `value_col` for one group.
    fn values_for_group(
        df: &DataFrame,
        group_col: &str,
        group: &str,
        value_col: &str,
    ) -> Result<Vec<f64>, BuildError> {
        let values = df
            .clone()
            .lazy()
            .filter(col(group_col).eq(lit(group)))
            .select([col(value_col).cast(DataType::Float64)])
            .collect()?;

        Ok(values
            .column(value_col)?
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect())
    }

    /// (x, y) pairs for one group; rows missing either coordinate drop out.
    fn xy_for_group(
        df: &DataFrame,
        group_col: &str,
        group: &str,
        x_col: &str,
        y_col: &str,
    ) -> Result<Vec<[f64; 2]>, BuildError> {
        let pair = df
            .clone()
            .lazy()
            .filter(col(group_col).eq(lit(group)))
            .select([
                col(x_col).cast(DataType::Float64),
                col(y_col).cast(DataType::Float64),
            ])
            .collect()?;

        let xs = pair.column(x_col)?.f64()?;
        let ys = pair.column(y_col)?.f64()?;

        let mut points = Vec::with_capacity(pair.height());
        for i in 0..pair.height() {
            if let (Some(x), Some(y)) = (xs.get(i), ys.get(i)) {
                if x.is_finite() && y.is_finite() {
                    points.push([x, y]);
                }
            }
        }
        Ok(points)
    }
}
