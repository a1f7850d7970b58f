//! Charts module - chart construction and drawing

mod builder;
mod plotter;

pub use builder::{
    human_label, BarSeries, BoxChart, BoxGroup, BuildError, ChartBuilder, ChartSet, ExploreView,
    FacetedBoxChart, GroupedBarChart, MeansRow, MeansTable, ScatterChart, ScatterSeries,
    GROUPING_OPTIONS, VARIABLE_OPTIONS,
};
pub use plotter::{ChartPlotter, FEMALE_COLOR, MALE_COLOR, PALETTE};
