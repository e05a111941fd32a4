//! Non-fatal informational notice.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct InfoMessageProps {
    pub message: String,
}

/// Blue notice box shown in place of a chart that has nothing to draw.
#[component]
pub fn InfoMessage(props: InfoMessageProps) -> Element {
    rsx! {
        div {
            style: "padding: 12px 16px; margin: 8px 0; background: #E3F2FD; color: #0D47A1; border-radius: 4px; border: 1px solid #90CAF9;",
            "{props.message}"
        }
    }
}
