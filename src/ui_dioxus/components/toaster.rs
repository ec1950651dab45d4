use dioxus::prelude::*;

use crate::services::toast::ToastKind;
use crate::ui_dioxus::state::{AppContext, LiveState};

fn toast_style(kind: ToastKind) -> String {
    let (background, border) = kind.colors();
    format!(
        "background: {}; border: 1px solid {}; border-radius: 8px; padding: 10px 14px;
         display: flex; gap: 10px; align-items: flex-start; font-size: 14px;
         box-shadow: 0 4px 12px rgba(0, 0, 0, 0.08);",
        background, border
    )
}

/// Stack of live toasts in the top-right corner.
#[component]
pub fn Toaster() -> Element {
    let ctx = use_context::<AppContext>();
    let mut live = use_context::<LiveState>();
    let toasts = live.toasts.read().clone();

    rsx! {
        div {
            style: "position: fixed; top: 16px; right: 16px; z-index: 2000;
                   display: flex; flex-direction: column; gap: 8px; max-width: 360px;",
            for toast in toasts {
                div {
                    key: "{toast.id}",
                    style: toast_style(toast.kind),
                    span { style: "font-weight: 700;", "{toast.kind.icon()}" }
                    span { style: "flex: 1; color: #1f2937;", "{toast.message}" }
                    button {
                        style: "border: none; background: none; cursor: pointer; color: #6b7280;",
                        onclick: {
                            let ctx = ctx.clone();
                            let id = toast.id;
                            move |_| {
                                ctx.toasts.dismiss(id);
                                live.sync(&ctx);
                            }
                        },
                        "×"
                    }
                }
            }
        }
    }
}
