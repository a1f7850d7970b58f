//! Dashboard Page
//! Single scrollable page with the six charts and the explore controls,
//! mirroring the one-page layout of the original report.

use crate::charts::{
    human_label, ChartPlotter, ChartSet, ExploreView, GROUPING_OPTIONS, VARIABLE_OPTIONS,
};
use egui::{ComboBox, RichText, ScrollArea};

const INTRO_WAGE_GAP: &str = "The gender wage gap measures what women are paid relative to men. \
Recent estimates put women's pay at roughly 83% of men's, and while the gap has narrowed over \
the decades it has not closed. Comparing income and occupational prestige by sex in the same \
survey makes the remaining difference visible, including between respondents doing similarly \
prestigious work.";

const INTRO_GSS: &str = "The General Social Survey (GSS) is one of the longest-running studies \
of American society. Conducted since 1972, it collects demographic, behavioral, and attitudinal \
data through scientifically sampled interviews and is a standard source for research on trends \
in the United States. This dashboard uses the 2018 extract.";

const CHART_HEIGHT: f32 = 280.0;

/// The explore section's current dropdown state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreSelection {
    pub grouping: String,
    pub variable: String,
}

impl Default for ExploreSelection {
    fn default() -> Self {
        Self {
            grouping: "sex".to_string(),
            variable: "satjob".to_string(),
        }
    }
}

/// Renders the dashboard page.
pub struct Dashboard;

impl Dashboard {
    /// Draw the full page. Returns true when a dropdown changed and the
    /// explore section needs to be recomputed.
    pub fn show(
        ui: &mut egui::Ui,
        charts: &ChartSet,
        explore: Option<&ExploreView>,
        selection: &mut ExploreSelection,
    ) -> bool {
        let mut selection_changed = false;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(8.0);
                ui.heading(
                    RichText::new("Gender Distribution of Income and Occupational Prestige")
                        .size(24.0),
                );
                ui.add_space(8.0);

                ui.label(RichText::new(INTRO_WAGE_GAP).size(13.0));
                ui.add_space(6.0);
                ui.label(RichText::new(INTRO_GSS).size(13.0));

                Self::section(ui, "Mean socioeconomic measures by sex");
                ChartPlotter::draw_means_table(ui, &charts.means, "sex_means");

                Self::section(ui, "Male breadwinner: level of agreement by sex");
                ChartPlotter::draw_bar_chart(ui, &charts.breadwinner_bar, "breadwinner", CHART_HEIGHT);

                Self::section(ui, "Occupational prestige vs income");
                ChartPlotter::draw_scatter(ui, &charts.prestige_scatter, "prestige_income", 320.0);

                Self::section(ui, "Distributions by sex");
                ui.columns(2, |cols| {
                    cols[0].label(RichText::new("Income").strong());
                    ChartPlotter::draw_box_chart(&mut cols[0], &charts.income_box, "income", CHART_HEIGHT);
                    cols[1].label(RichText::new("Occupational prestige").strong());
                    ChartPlotter::draw_box_chart(
                        &mut cols[1],
                        &charts.prestige_box,
                        "prestige",
                        CHART_HEIGHT,
                    );
                });

                Self::section(ui, "Income by occupational prestige level");
                ChartPlotter::draw_faceted_box(ui, &charts.income_by_level, "income_by_level");

                Self::section(ui, "Explore");
                selection_changed = Self::explore_controls(ui, selection);
                ui.add_space(8.0);

                if let Some(view) = explore {
                    ChartPlotter::draw_bar_chart(
                        ui,
                        &view.bar,
                        &format!("explore_{}_{}", view.grouping, view.variable),
                        CHART_HEIGHT,
                    );
                    ui.add_space(8.0);
                    ChartPlotter::draw_means_table(
                        ui,
                        &view.means,
                        &format!("explore_{}", view.grouping),
                    );
                }

                ui.add_space(20.0);
            });

        selection_changed
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(18.0);
        ui.separator();
        ui.add_space(6.0);
        ui.label(RichText::new(title).size(17.0).strong());
        ui.add_space(6.0);
    }

    /// The two dropdowns. Every change is reported to the caller, which
    /// recomputes the grouped aggregates for the new selection.
    fn explore_controls(ui: &mut egui::Ui, selection: &mut ExploreSelection) -> bool {
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label("Group by:");
            ComboBox::from_id_salt("grouping")
                .width(140.0)
                .selected_text(human_label(&selection.grouping))
                .show_ui(ui, |ui| {
                    for option in GROUPING_OPTIONS {
                        if ui
                            .selectable_label(selection.grouping == option, human_label(option))
                            .clicked()
                            && selection.grouping != option
                        {
                            selection.grouping = option.to_string();
                            changed = true;
                        }
                    }
                });

            ui.add_space(20.0);

            ui.label("Variable:");
            ComboBox::from_id_salt("variable")
                .width(180.0)
                .selected_text(human_label(&selection.variable))
                .show_ui(ui, |ui| {
                    for option in VARIABLE_OPTIONS {
                        if ui
                            .selectable_label(selection.variable == option, human_label(option))
                            .clicked()
                            && selection.variable != option
                        {
                            selection.variable = option.to_string();
                            changed = true;
                        }
                    }
                });
        });

        changed
    }
}
