//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.

use co2_db::{DashboardView, Database, Selection};
use dioxus::prelude::*;

/// Shared application state for the dashboard.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Database instance (None until loaded)
    pub db: Signal<Option<Database>>,
    /// Whether the app is still loading
    pub loading: Signal<bool>,
    /// Fatal error message; when set nothing else renders
    pub error_msg: Signal<Option<String>>,
    /// Active charts and radar countries
    pub selection: Signal<Selection>,
    /// Countries offered by the radar picker (latest year, complete rows)
    pub radar_options: Signal<Vec<String>>,
    /// View-model of the last render pass
    pub view: Signal<Option<DashboardView>>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new() -> Self {
        Self {
            db: Signal::new(None),
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            selection: Signal::new(Selection::default()),
            radar_options: Signal::new(Vec::new()),
            view: Signal::new(None),
        }
    }
}
