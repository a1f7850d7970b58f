//! Chart Plotter Module
//! Draws the chart data structures with egui_plot.

use crate::charts::{BoxChart, FacetedBoxChart, GroupedBarChart, MeansTable, ScatterChart};
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points,
};

/// Fixed colors for the two sexes, matching the dashboard's convention.
pub const MALE_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const FEMALE_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

/// Palette for other grouping keys (region, education).
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
    Color32::from_rgb(205, 220, 57),  // Lime
];

/// Five-number summary backing one box element.
struct BoxSummary {
    whisker_low: f64,
    q1: f64,
    median: f64,
    q3: f64,
    whisker_high: f64,
}

/// Draws dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for a group: sexes keep their fixed colors, everything else
    /// cycles through the palette.
    pub fn group_color(group: &str, group_index: usize) -> Color32 {
        match group {
            "male" => MALE_COLOR,
            "female" => FEMALE_COLOR,
            _ => PALETTE[group_index % PALETTE.len()],
        }
    }

    /// Grouped-means table as a striped grid.
    pub fn draw_means_table(ui: &mut egui::Ui, table: &MeansTable, id: &str) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("means_table_{id}")))
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new(&table.group_label).strong().size(12.0));
                        for column in &table.columns {
                            ui.label(RichText::new(column).strong().size(12.0));
                        }
                        ui.end_row();

                        for row in &table.rows {
                            ui.label(RichText::new(&row.group).size(12.0));
                            for mean in &row.means {
                                match mean {
                                    Some(v) => ui.label(RichText::new(format!("{v:.2}")).size(12.0)),
                                    None => ui.label(RichText::new("-").size(12.0)),
                                };
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    /// Grouped bar chart: answer levels on the x-axis, one bar color per
    /// group, side by side within each level.
    pub fn draw_bar_chart(ui: &mut egui::Ui, chart: &GroupedBarChart, id: &str, height: f32) {
        let n_series = chart.series.len().max(1);
        let slot = 0.8;
        let bar_width = slot / n_series as f64;

        let x_labels: Vec<String> = chart.levels.clone();

        Plot::new(format!("bar_{id}"))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(chart.var_label.clone())
            .y_axis_label("count")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 0.3 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (s, series) in chart.series.iter().enumerate() {
                    let color = Self::group_color(&series.group, s);
                    let offset = (s as f64 - (n_series as f64 - 1.0) / 2.0) * bar_width;

                    let bars: Vec<Bar> = series
                        .counts
                        .iter()
                        .enumerate()
                        .map(|(i, &count)| {
                            Bar::new(i as f64 + offset, count as f64)
                                .width(bar_width * 0.9)
                                .fill(color)
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&series.group));
                }
            });
    }

    /// Scatter plot with one point cloud and trendline per group.
    pub fn draw_scatter(ui: &mut egui::Ui, chart: &ScatterChart, id: &str, height: f32) {
        Plot::new(format!("scatter_{id}"))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .show(ui, |plot_ui| {
                for (s, series) in chart.series.iter().enumerate() {
                    let color = Self::group_color(&series.group, s);

                    let points: PlotPoints = series.points.iter().copied().collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(2.0)
                            .color(color.gamma_multiply(0.75))
                            .name(&series.group),
                    );

                    if let Some(fit) = &series.fit {
                        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
                        for p in &series.points {
                            x_min = x_min.min(p[0]);
                            x_max = x_max.max(p[0]);
                        }
                        if x_min < x_max {
                            let line: PlotPoints = [
                                [x_min, fit.predict(x_min)],
                                [x_max, fit.predict(x_max)],
                            ]
                            .into_iter()
                            .collect();
                            plot_ui.line(
                                Line::new(line)
                                    .color(color)
                                    .width(2.0)
                                    .name(format!("{} OLS", series.group)),
                            );
                        }
                    }
                }
            });
    }

    /// Box plot, one box per group on the x-axis.
    pub fn draw_box_chart(ui: &mut egui::Ui, chart: &BoxChart, id: &str, height: f32) {
        let x_labels: Vec<String> = chart.groups.iter().map(|g| g.group.clone()).collect();

        Plot::new(format!("box_{id}"))
            .height(height)
            .allow_scroll(false)
            .y_axis_label(chart.value_label.clone())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 0.3 && idx < x_labels.len() {
                    x_labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, group) in chart.groups.iter().enumerate() {
                    if group.values.is_empty() {
                        continue;
                    }
                    let color = Self::group_color(&group.group, i);
                    let summary = Self::box_summary(&group.values);

                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(
                            summary.whisker_low,
                            summary.q1,
                            summary.median,
                            summary.q3,
                            summary.whisker_high,
                        ),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&group.group));
                }
            });
    }

    /// Faceted box plot: small multiples wrapped two per row.
    pub fn draw_faceted_box(ui: &mut egui::Ui, chart: &FacetedBoxChart, id: &str) {
        let facet_width = (ui.available_width() - 30.0) / 2.0;

        for pair in chart.facets.chunks(2) {
            ui.horizontal(|ui| {
                for (level, facet) in pair {
                    ui.vertical(|ui| {
                        ui.set_width(facet_width);
                        ui.label(RichText::new(level).strong().size(13.0));
                        Self::draw_box_chart(ui, facet, &format!("{id}_{level}"), 180.0);
                    });
                    ui.add_space(10.0);
                }
            });
            ui.add_space(8.0);
        }
    }

    /// Quartiles with 1.5*IQR whiskers clamped to observed values.
    fn box_summary(values: &[f64]) -> BoxSummary {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len();
        let q1 = sorted[n / 4];
        let median = sorted[n / 2];
        let q3 = sorted[3 * n / 4];
        let iqr = q3 - q1;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - 1.5 * iqr)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + 1.5 * iqr)
            .unwrap_or(q3);

        BoxSummary {
            whisker_low,
            q1,
            median,
            q3,
            whisker_high,
        }
    }
}
