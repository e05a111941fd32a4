//! Reusable Dioxus RSX components for the CO2 dashboard.

mod chart_container;
mod chart_header;
mod chart_selector;
mod country_selector;
mod error_display;
mod info_message;
mod loading_spinner;

pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use chart_selector::ChartSelector;
pub use country_selector::CountrySelector;
pub use error_display::ErrorDisplay;
pub use info_message::InfoMessage;
pub use loading_spinner::LoadingSpinner;
