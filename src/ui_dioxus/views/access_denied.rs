use dioxus::prelude::*;

#[component]
pub fn AccessDenied() -> Element {
    rsx! {
        div {
            style: "padding: 80px 24px; text-align: center; color: #374151;",
            div { style: "font-size: 48px;", "🔒" }
            h2 { "Access Denied" }
            p { style: "color: #6b7280;", "You do not have permission to view this page." }
        }
    }
}
