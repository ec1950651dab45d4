use dioxus::prelude::*;

use super::confirmation_modal::ConfirmationModal;
use super::scoped_dialog::ScopedDialog;
use crate::domain::registration::{RegistrationMode, RegistrationWorkflow, WorkflowState};
use crate::domain::rupees;
use crate::services::EventCatalog;
use crate::ui_dioxus::state::{AppContext, LiveState};

const ROW_STYLE: &str = "display: flex; align-items: center; gap: 10px; padding: 8px 10px;
                         border-radius: 6px; cursor: pointer;";

/// Candidate picker for one event. Rendered only while the workflow is open.
#[component]
pub fn RegistrationModal(
    mut workflow: Signal<RegistrationWorkflow>,
    mut catalog: Signal<EventCatalog>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let mut live = use_context::<LiveState>();

    let wf = workflow.read().clone();
    let Some(event) = wf.event().cloned() else {
        return rsx! {};
    };
    let state = wf.state();
    let mode = wf.mode();
    let title = match mode {
        RegistrationMode::Family => format!("Register Family · {}", event.title),
        RegistrationMode::Individual => format!("Register Individuals · {}", event.title),
    };
    let total_members = wf.total_members();
    let total_fee = wf.total_fee();
    let confirming = matches!(state, WorkflowState::Confirming | WorkflowState::Submitting);

    let mut close = {
        let ctx = ctx.clone();
        move || {
            workflow.write().close();
            live.sync(&ctx);
        }
    };

    let register_now = {
        let ctx = ctx.clone();
        move |_| {
            ctx.registration.request_confirmation(&mut workflow.write());
            live.sync(&ctx);
        }
    };

    let cancel_confirmation = move |_| {
        workflow.write().cancel_confirmation();
    };

    let confirm = {
        let ctx = ctx.clone();
        let event = event.clone();
        move |_| {
            let service = ctx.registration.clone();
            let Some(request) = service.begin_submit(&mut workflow.write()) else {
                live.sync(&ctx);
                return;
            };
            let ctx = ctx.clone();
            let event = event.clone();
            spawn(async move {
                let outcome = service.submit(&request, &event).await;
                let registered = service.apply_outcome(&mut workflow.write(), outcome);
                live.sync(&ctx);
                if registered {
                    let mode = request.mode();
                    let candidates = service.load_candidates(event.id, mode).await;
                    service.apply_candidates(&mut workflow.write(), event.id, candidates);
                    let events = ctx.api.list_events().await;
                    catalog.write().apply_fetch(events, &ctx.toasts);
                    live.sync(&ctx);
                }
            });
        }
    };

    rsx! {
        ScopedDialog {
            title: title,
            busy: confirming,
            max_width: "640px".to_string(),
            on_dismiss: {
                let mut close = close.clone();
                move |_| close()
            },

            div {
                style: "display: flex; justify-content: space-between; font-size: 13px; color: #4b5563; margin-bottom: 12px;",
                span { "📅 {event.date_label()}" }
                span { "{event.fee_label()}" }
            }

            input {
                r#type: "text",
                placeholder: match mode {
                    RegistrationMode::Family => "Search by head of family or phone...",
                    RegistrationMode::Individual => "Search by name, head of family or phone...",
                },
                value: "{wf.search()}",
                style: "width: 100%; padding: 8px 12px; border: 1px solid #d1d5db; border-radius: 6px;
                       font-size: 14px; margin-bottom: 12px; box-sizing: border-box;",
                oninput: move |evt| workflow.write().set_search(evt.value()),
            }

            div {
                style: "max-height: 45vh; overflow-y: auto; border: 1px solid #f3f4f6; border-radius: 8px; padding: 4px;",

                if state == WorkflowState::Loading {
                    div { style: "padding: 24px; text-align: center; color: #6b7280;", "Loading..." }
                } else if wf.pool().is_empty() {
                    div {
                        style: "padding: 24px; text-align: center; color: #6b7280;",
                        "Everyone is already registered for this event"
                    }
                } else {
                    match mode {
                        RegistrationMode::Family => rsx! {
                            for family in wf.visible_families() {
                                div {
                                    key: "{family.id}",
                                    style: if wf.is_selected(family.id) {
                                        format!("{ROW_STYLE} background: #eef2ff;")
                                    } else {
                                        ROW_STYLE.to_string()
                                    },
                                    onclick: move |_| {
                                        let mut wf = workflow.write();
                                        if wf.is_selected(family.id) {
                                            wf.clear_selection();
                                        } else {
                                            wf.select_family(family.id);
                                        }
                                    },
                                    input {
                                        r#type: "radio",
                                        checked: wf.is_selected(family.id),
                                        disabled: state != WorkflowState::Browsing,
                                    }
                                    div {
                                        style: "flex: 1;",
                                        div { style: "font-weight: 500;", "{family.head_of_family}" }
                                        div {
                                            style: "font-size: 12px; color: #6b7280;",
                                            {family.phone_number.clone().unwrap_or_else(|| "N/A".to_string())}
                                        }
                                    }
                                    span { style: "font-size: 12px; color: #4b5563;", "{family.member_count} members" }
                                }
                            }
                        },
                        RegistrationMode::Individual => rsx! {
                            for group in wf.visible_groups() {
                                div {
                                    key: "{group.family_id}",
                                    style: "margin-bottom: 6px;",
                                    div {
                                        style: "display: flex; justify-content: space-between; align-items: center;
                                               padding: 6px 10px; background: #f9fafb; border-radius: 6px; cursor: pointer;",
                                        onclick: move |_| workflow.write().toggle_family_expanded(group.family_id),
                                        div {
                                            span { style: "font-weight: 600;", "{group.head_of_family}" }
                                            span { style: "font-size: 12px; color: #6b7280; margin-left: 8px;", "{group.phone_number}" }
                                            if let Some(bcc) = group.bcc_group.as_ref() {
                                                span { style: "font-size: 12px; color: #6b7280; margin-left: 8px;", "· {bcc}" }
                                            }
                                        }
                                        span {
                                            if wf.is_family_expanded(group.family_id) { "▾" } else { "▸" }
                                        }
                                    }
                                    if wf.is_family_expanded(group.family_id) {
                                        for member in group.members.iter().cloned() {
                                            div {
                                                key: "{member.id}",
                                                style: "{ROW_STYLE} padding-left: 28px;",
                                                onclick: move |_| {
                                                    workflow.write().toggle_individual(member.id);
                                                },
                                                input {
                                                    r#type: "checkbox",
                                                    checked: wf.is_selected(member.id),
                                                    disabled: state != WorkflowState::Browsing,
                                                }
                                                span { style: "flex: 1;", "{member.name}" }
                                                span {
                                                    style: "font-size: 12px; color: #6b7280;",
                                                    {crate::domain::family::display_gender(member.gender.as_deref())}
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

            div {
                style: "display: flex; justify-content: space-between; align-items: center; margin-top: 16px;",
                div {
                    style: "font-size: 14px; color: #374151;",
                    "Selected: {total_members} "
                    if total_members == 1 { "member" } else { "members" }
                    if !event.is_free() {
                        " · Total: {rupees(total_fee)}"
                    }
                }
                div {
                    style: "display: flex; gap: 10px;",
                    button {
                        style: "padding: 8px 20px; border: 1px solid #ddd; background: white; color: #333;
                               border-radius: 4px; cursor: pointer; font-size: 14px;",
                        disabled: confirming,
                        onclick: move |_| close(),
                        "Cancel"
                    }
                    button {
                        style: "padding: 8px 20px; border: none; background: #4f46e5; color: white;
                               border-radius: 4px; cursor: pointer; font-size: 14px;",
                        disabled: !wf.can_register(),
                        onclick: register_now,
                        "Register Now"
                    }
                }
            }
        }

        if confirming {
            if let Some(summary) = wf.confirmation_summary() {
                ConfirmationModal {
                    summary: summary,
                    submitting: wf.is_submitting(),
                    on_confirm: confirm,
                    on_cancel: cancel_confirmation,
                }
            }
        }
    }
}
