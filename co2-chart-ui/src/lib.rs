//! Shared Dioxus components and D3.js bridge for the CO2 dashboard.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for D3.js chart functions via `js_sys::eval()`
//! - `panels`: per-chart DOM ids, chart configs and dispatch to `js_bridge`
//! - `state`: Reactive AppState with Dioxus Signals
//! - `components`: Reusable RSX components (selectors, containers, etc.)

pub mod components;
pub mod js_bridge;
pub mod panels;
pub mod state;
