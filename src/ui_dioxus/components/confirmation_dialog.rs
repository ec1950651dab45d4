use dioxus::prelude::*;

use super::scoped_dialog::ScopedDialog;

/// Yes/no prompt for destructive row actions.
#[component]
pub fn ConfirmationDialog(
    title: String,
    message: String,
    confirm_text: String,
    cancel_text: String,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
    danger: bool,
    #[props(default)] busy: bool,
) -> Element {
    let confirm_color = if danger { "#dc2626" } else { "#3b82f6" };

    rsx! {
        ScopedDialog {
            title: title,
            busy: busy,
            max_width: "400px".to_string(),
            on_dismiss: move |_| on_cancel.call(()),

            p {
                style: "margin: 0 0 24px 0; color: #666; line-height: 1.5;",
                "{message}"
            }

            div {
                style: "display: flex; justify-content: flex-end; gap: 10px;",

                button {
                    style: "padding: 8px 20px; border: 1px solid #ddd;
                           background: white; color: #333; border-radius: 4px;
                           cursor: pointer; font-size: 14px;",
                    disabled: busy,
                    onclick: move |_| on_cancel.call(()),
                    "{cancel_text}"
                }

                button {
                    style: format!("padding: 8px 20px; border: none;
                           background: {}; color: white; border-radius: 4px;
                           cursor: pointer; font-size: 14px;", confirm_color),
                    disabled: busy,
                    onclick: move |_| on_confirm.call(()),
                    if busy { "Working..." } else { "{confirm_text}" }
                }
            }
        }
    }
}
