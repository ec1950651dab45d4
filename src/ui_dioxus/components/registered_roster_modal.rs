use dioxus::prelude::*;

use super::scoped_dialog::ScopedDialog;
use crate::domain::event::Event;
use crate::domain::family::{display_gender, filter_groups, FamilyGroup, RegisteredParishioner};
use crate::ui_dioxus::state::{AppContext, LiveState};

/// Who is registered for an event, grouped by family, with receipt re-download.
#[component]
pub fn RegisteredRosterModal(event: Event, on_close: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let mut live = use_context::<LiveState>();
    let mut search = use_signal(String::new);
    let mut downloading = use_signal(|| None::<String>);

    let roster = use_resource({
        let ctx = ctx.clone();
        let event_id = event.id;
        move || {
            let ctx = ctx.clone();
            async move {
                let groups = ctx.registration.registered_roster(event_id).await;
                live.sync(&ctx);
                groups
            }
        }
    });

    let redownload = {
        let ctx = ctx.clone();
        move |receipt_number: Option<String>| {
            let ctx = ctx.clone();
            spawn(async move {
                downloading.set(receipt_number.clone());
                ctx.registration
                    .redownload_receipt(receipt_number.as_deref())
                    .await;
                downloading.set(None);
                live.sync(&ctx);
            });
        }
    };

    let groups: Option<Vec<FamilyGroup<RegisteredParishioner>>> = match &*roster.read() {
        Some(Some(groups)) => Some(filter_groups(groups, &search.read())),
        Some(None) => Some(Vec::new()),
        None => None,
    };
    let busy_receipt = downloading.read().clone();

    rsx! {
        ScopedDialog {
            title: format!("Registered · {}", event.title),
            busy: false,
            max_width: "640px".to_string(),
            on_dismiss: move |_| on_close.call(()),

            input {
                r#type: "text",
                placeholder: "Search by name, head of family or phone...",
                value: "{search}",
                style: "width: 100%; padding: 8px 12px; border: 1px solid #d1d5db; border-radius: 6px;
                       font-size: 14px; margin-bottom: 12px; box-sizing: border-box;",
                oninput: move |evt| search.set(evt.value()),
            }

            match groups {
                None => rsx! {
                    div { style: "padding: 24px; text-align: center; color: #6b7280;", "Loading..." }
                },
                Some(groups) if groups.is_empty() => rsx! {
                    div { style: "padding: 24px; text-align: center; color: #6b7280;", "No registrations found" }
                },
                Some(groups) => rsx! {
                    for group in groups {
                        div {
                            key: "{group.family_id}",
                            style: "margin-bottom: 10px; border: 1px solid #f3f4f6; border-radius: 8px;",
                            div {
                                style: "padding: 8px 10px; background: #f9fafb; display: flex; gap: 8px; align-items: baseline;",
                                span { style: "font-weight: 600;", "{group.head_of_family}" }
                                span { style: "font-size: 12px; color: #6b7280;", "{group.phone_number}" }
                            }
                            for member in group.members.iter() {
                                div {
                                    key: "{member.id}",
                                    style: "display: flex; align-items: center; gap: 10px; padding: 6px 10px 6px 24px; font-size: 14px;",
                                    span { style: "flex: 1;", "{member.name}" }
                                    span { style: "font-size: 12px; color: #6b7280;", {display_gender(member.gender.as_deref())} }
                                    if let Some(number) = member.receipt_number.clone() {
                                        button {
                                            style: "padding: 4px 10px; border: 1px solid #4f46e5; color: #4f46e5; background: white;
                                                   border-radius: 4px; cursor: pointer; font-size: 12px;",
                                            disabled: busy_receipt.as_deref() == Some(number.as_str()),
                                            onclick: {
                                                let redownload = redownload.clone();
                                                let number = number.clone();
                                                move |_| redownload(Some(number.clone()))
                                            },
                                            "Receipt #{number}"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
