//! Loading spinner component.

use dioxus::prelude::*;

/// Shown while the dataset is decoded and cleaned.
#[component]
pub fn LoadingSpinner() -> Element {
    rsx! {
        div {
            style: "display: flex; justify-content: center; align-items: center; padding: 40px; color: #666;",
            "Loading and cleaning CO\u{2082} data..."
        }
    }
}
