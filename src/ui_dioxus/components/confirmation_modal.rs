use dioxus::prelude::*;

use super::scoped_dialog::ScopedDialog;
use crate::domain::registration::{ConfirmationSummary, RegistrationMode};
use crate::domain::rupees;

/// Read-only summary shown before the registration POST.
#[component]
pub fn ConfirmationModal(
    summary: ConfirmationSummary,
    submitting: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let heading = match summary.mode {
        RegistrationMode::Family => "Family",
        RegistrationMode::Individual => "Individuals",
    };

    rsx! {
        ScopedDialog {
            title: "Confirm Registration".to_string(),
            busy: submitting,
            max_width: "440px".to_string(),
            on_dismiss: move |_| on_cancel.call(()),

            div {
                style: "display: flex; flex-direction: column; gap: 14px; font-size: 14px;",

                div {
                    style: "background: #f9fafb; border-radius: 8px; padding: 12px;",
                    div { style: "font-weight: 600;", "{summary.event_title}" }
                    div { style: "color: #6b7280; font-size: 13px;", "{summary.event_when}" }
                }

                div {
                    div { style: "font-weight: 600; margin-bottom: 6px;", "{heading}" }
                    ul {
                        style: "margin: 0; padding-left: 18px; color: #374151;",
                        for name in summary.names.iter() {
                            li { "{name}" }
                        }
                    }
                    if let Some(more) = summary.more_label() {
                        div { style: "color: #6b7280; font-size: 13px; margin-top: 4px;", "{more}" }
                    }
                }

                div {
                    style: "border-top: 1px solid #e5e7eb; padding-top: 10px; display: flex; flex-direction: column; gap: 4px;",
                    div {
                        style: "display: flex; justify-content: space-between;",
                        span { "Total members" }
                        span { "{summary.total_members}" }
                    }
                    if summary.is_free() {
                        div {
                            style: "display: flex; justify-content: space-between; font-weight: 600; color: #15803d;",
                            span { "Fee" }
                            span { "Free" }
                        }
                    } else {
                        div {
                            style: "display: flex; justify-content: space-between; color: #6b7280;",
                            span { "Fee per person" }
                            span { "{rupees(summary.per_person_fee)}" }
                        }
                        div {
                            style: "display: flex; justify-content: space-between; font-weight: 600;",
                            span { "Total amount" }
                            span { "{rupees(summary.total_fee)}" }
                        }
                    }
                }

                div {
                    style: "display: flex; justify-content: flex-end; gap: 10px;",
                    button {
                        style: "padding: 8px 20px; border: 1px solid #ddd; background: white; color: #333;
                               border-radius: 4px; cursor: pointer; font-size: 14px;",
                        disabled: submitting,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        style: "padding: 8px 20px; border: none; background: #4f46e5; color: white;
                               border-radius: 4px; cursor: pointer; font-size: 14px;",
                        disabled: submitting,
                        onclick: move |_| on_confirm.call(()),
                        if submitting { "Registering..." } else { "Confirm" }
                    }
                }
            }
        }
    }
}
