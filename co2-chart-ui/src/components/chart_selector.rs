//! Sidebar multi-select over the four chart panels.

use crate::state::AppState;
use co2_db::ChartKind;
use dioxus::prelude::*;

/// One checkbox per chart; toggling updates `AppState::selection`.
#[component]
pub fn ChartSelector() -> Element {
    let state = use_context::<AppState>();
    let selection = state.selection.read().clone();

    rsx! {
        fieldset {
            style: "border: none; margin: 0; padding: 0;",
            legend {
                style: "font-weight: bold; margin-bottom: 8px;",
                "Select visualizations:"
            }
            for kind in ChartKind::ALL {
                label {
                    key: "{kind}",
                    style: "display: block; margin: 4px 0; cursor: pointer;",
                    input {
                        r#type: "checkbox",
                        checked: selection.is_active(kind),
                        onchange: move |_| {
                            let mut selection = state.selection;
                            selection.write().toggle(kind);
                        },
                    }
                    " {kind}"
                }
            }
        }
    }
}
