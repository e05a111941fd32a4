//! Inline multi-select for the radar comparison.
//!
//! Selected countries render as removable chips; the dropdown offers every
//! latest-year country that is not selected yet.

use crate::state::AppState;
use dioxus::prelude::*;

#[component]
pub fn CountrySelector() -> Element {
    let mut state = use_context::<AppState>();
    let selected = state.selection.read().radar_countries.clone();
    let available: Vec<String> = state
        .radar_options
        .read()
        .iter()
        .filter(|c| !selected.contains(c))
        .cloned()
        .collect();

    let on_add = move |evt: Event<FormData>| {
        let country = evt.value();
        if country.is_empty() {
            return;
        }
        let mut selection = state.selection.write();
        if !selection.radar_countries.contains(&country) {
            selection.radar_countries.push(country);
        }
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "radar-country-select",
                style: "font-weight: bold; margin-right: 8px;",
                "Select countries to compare:"
            }
            div {
                style: "display: flex; flex-wrap: wrap; gap: 6px; margin: 6px 0;",
                for country in selected.iter().cloned() {
                    span {
                        key: "{country}",
                        style: "display: inline-flex; align-items: center; gap: 4px; padding: 2px 8px; background: #FF4B4B; color: white; border-radius: 12px; font-size: 13px;",
                        "{country}"
                        button {
                            style: "border: none; background: transparent; color: white; cursor: pointer; padding: 0 2px;",
                            title: "Remove",
                            onclick: move |_| {
                                state.selection.write().radar_countries.retain(|c| c != &country);
                            },
                            "\u{00D7}"
                        }
                    }
                }
            }
            select {
                id: "radar-country-select",
                onchange: on_add,
                option { value: "", selected: true, "Add a country\u{2026}" }
                for country in available.iter() {
                    option {
                        key: "{country}",
                        value: "{country}",
                        "{country}"
                    }
                }
            }
        }
    }
}
