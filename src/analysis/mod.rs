//! Analysis module - grouped aggregates and regression

mod aggregate;
mod regression;

pub use aggregate::{
    drop_null_rows, group_counts, group_means, ordered_levels, prestige_level_table,
    with_equal_width_bins, AnalysisError, MEAN_COLUMNS, PRESTIGE_LEVELS,
};
pub use regression::{fit_ols, LinearFit};
