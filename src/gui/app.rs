//! GSS Explorer Main Application
//! Window shell: background dataset loading, toolbar, and the dashboard.

use crate::charts::{ChartBuilder, ChartSet, ExploreView};
use crate::data::{DataCleaner, DatasetLoader, GSS_2018_URL};
use crate::gui::{Dashboard, ExploreSelection};
use crate::report;
use polars::prelude::DataFrame;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use tracing::{error, info};

/// Pipeline result from the background thread.
enum LoadResult {
    Progress(f32, String),
    Complete(Box<Loaded>),
    Error(String),
}

struct Loaded {
    clean: DataFrame,
    charts: ChartSet,
    explore: ExploreView,
}

/// Main application window.
pub struct ExplorerApp {
    clean: Option<DataFrame>,
    charts: Option<ChartSet>,
    explore: Option<ExploreView>,
    selection: ExploreSelection,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
    progress: f32,
    status: String,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            clean: None,
            charts: None,
            explore: None,
            selection: ExploreSelection::default(),
            load_rx: None,
            is_loading: false,
            progress: 0.0,
            status: "Starting".to_string(),
        };
        app.start_load();
        app
    }

    /// Kick off the one-shot load/clean/aggregate pipeline in the
    /// background. The UI keeps repainting while it runs.
    fn start_load(&mut self) {
        if self.is_loading {
            return;
        }
        self.is_loading = true;
        self.progress = 0.0;
        self.status = "Downloading dataset...".to_string();

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let selection = self.selection.clone();

        thread::spawn(move || {
            Self::run_pipeline(tx, selection);
        });
    }

    /// Fetch, clean, and build every chart (called from the worker thread).
    /// There is no retry; any failure is reported and the app stays idle.
    fn run_pipeline(tx: Sender<LoadResult>, selection: ExploreSelection) {
        let raw = match DatasetLoader::fetch(GSS_2018_URL) {
            Ok(df) => df,
            Err(e) => {
                error!(error = %e, "dataset download failed");
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(LoadResult::Progress(40.0, "Cleaning data...".to_string()));
        let clean = match DataCleaner::clean(&raw) {
            Ok(df) => df,
            Err(e) => {
                error!(error = %e, "cleaning failed");
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(LoadResult::Progress(70.0, "Building charts...".to_string()));
        let charts = match ChartBuilder::build_chart_set(&clean) {
            Ok(set) => set,
            Err(e) => {
                error!(error = %e, "chart construction failed");
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }
        };

        let explore =
            match ChartBuilder::build_explore(&clean, &selection.grouping, &selection.variable) {
                Ok(view) => view,
                Err(e) => {
                    error!(error = %e, "explore construction failed");
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                    return;
                }
            };

        info!(rows = clean.height(), "pipeline complete");
        let _ = tx.send(LoadResult::Complete(Box::new(Loaded {
            clean,
            charts,
            explore,
        })));
    }

    /// Drain pipeline results from the channel.
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.progress = progress;
                        self.status = status;
                    }
                    LoadResult::Complete(loaded) => {
                        let rows = loaded.clean.height();
                        self.clean = Some(loaded.clean);
                        self.charts = Some(loaded.charts);
                        self.explore = Some(loaded.explore);
                        self.progress = 100.0;
                        self.status = format!("Loaded {rows} respondents");
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.progress = 0.0;
                        self.status = format!("Error: {error}");
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Recompute the explore aggregates for the current dropdown selection.
    fn refresh_explore(&mut self) {
        let Some(clean) = &self.clean else { return };

        match ChartBuilder::build_explore(clean, &self.selection.grouping, &self.selection.variable)
        {
            Ok(view) => self.explore = Some(view),
            Err(e) => {
                error!(error = %e, "explore recompute failed");
                self.status = format!("Error: {e}");
            }
        }
    }

    /// Export the grouped means and trendlines as JSON.
    fn handle_export(&mut self) {
        let Some(charts) = &self.charts else { return };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("gss_summary.json")
            .save_file()
        else {
            return; // User cancelled
        };

        match report::write_summary(&path, charts) {
            Ok(()) => self.status = format!("Summary exported to {}", path.display()),
            Err(e) => self.status = format!("Export error: {e}"),
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        let mut export_clicked = false;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("GSS Explorer").size(16.0).strong());
                ui.separator();

                if ui
                    .add_enabled(self.charts.is_some(), egui::Button::new("Export summary"))
                    .clicked()
                {
                    export_clicked = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.is_loading {
                        ui.spinner();
                    }
                    ui.label(egui::RichText::new(&self.status).size(12.0));
                });
            });
        });
        if export_clicked {
            self.handle_export();
        }

        let mut explore_changed = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(charts) = &self.charts {
                explore_changed =
                    Dashboard::show(ui, charts, self.explore.as_ref(), &mut self.selection);
            } else {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.4);
                    ui.add(
                        egui::ProgressBar::new(self.progress / 100.0)
                            .desired_width(300.0)
                            .show_percentage()
                            .animate(self.is_loading),
                    );
                    ui.add_space(6.0);
                    ui.label(&self.status);
                });
            }
        });
        if explore_changed {
            self.refresh_explore();
        }
    }
}
