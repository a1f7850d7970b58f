//! GSS Explorer - Gender Distribution of Income and Occupational Prestige
//!
//! Downloads the 2018 General Social Survey extract, cleans it, computes the
//! grouped aggregates, and presents six charts plus an interactive explore
//! section in a single-window dashboard.

pub mod analysis;
pub mod charts;
pub mod data;
pub mod gui;
pub mod report;
