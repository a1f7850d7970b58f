//! Summary Report Module
//! Serializes the headline aggregates to JSON for use outside the app.

use crate::analysis::LinearFit;
use crate::charts::ChartSet;
use crate::data::GSS_2018_URL;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
pub struct SummaryReport<'a> {
    pub dataset: &'a str,
    pub group_means: &'a crate::charts::MeansTable,
    pub trendlines: Vec<TrendlineSummary<'a>>,
}

/// OLS trendline of income on occupational prestige for one group.
#[derive(Serialize)]
pub struct TrendlineSummary<'a> {
    pub group: &'a str,
    #[serde(flatten)]
    pub fit: LinearFit,
}

pub fn summary_report(charts: &ChartSet) -> SummaryReport<'_> {
    SummaryReport {
        dataset: GSS_2018_URL,
        group_means: &charts.means,
        trendlines: charts
            .prestige_scatter
            .series
            .iter()
            .filter_map(|s| {
                s.fit.map(|fit| TrendlineSummary {
                    group: &s.group,
                    fit,
                })
            })
            .collect(),
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary(path: &Path, charts: &ChartSet) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &summary_report(charts))?;
    info!(path = %path.display(), "summary written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartBuilder;
    use polars::prelude::*;

    #[test]
    fn report_carries_means_and_trendlines() {
        let df = df!(
            "sex" => ["male", "male", "male", "female", "female", "female"],
            "education" => [12.0f64, 14.0, 16.0, 12.0, 14.0, 16.0],
            "income" => [20.0f64, 40.0, 60.0, 30.0, 50.0, 70.0],
            "job_prestige" => [10.0f64, 20.0, 30.0, 15.0, 25.0, 35.0],
            "socioeconomic_index" => [40.0f64, 50.0, 60.0, 45.0, 55.0, 65.0],
            "male_breadwinner" => ["agree", "disagree", "agree", "disagree", "agree", "disagree"],
        )
        .unwrap();

        let charts = ChartBuilder::build_chart_set(&df).unwrap();
        let value = serde_json::to_value(summary_report(&charts)).unwrap();

        assert_eq!(value["group_means"]["rows"].as_array().unwrap().len(), 2);
        let trendlines = value["trendlines"].as_array().unwrap();
        assert_eq!(trendlines.len(), 2);
        assert!(trendlines[0]["slope"].as_f64().unwrap() > 0.0);
    }
}
