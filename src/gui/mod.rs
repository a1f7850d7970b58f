//! GUI module - application window and dashboard page

mod app;
mod dashboard;

pub use app::ExplorerApp;
pub use dashboard::{Dashboard, ExploreSelection};
