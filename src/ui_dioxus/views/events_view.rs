use chrono::Utc;
use dioxus::prelude::*;

use crate::domain::event::Event;
use crate::domain::registration::{RegistrationMode, RegistrationWorkflow};
use crate::services::EventCatalog;
use crate::ui_dioxus::components::{EventCard, EventFilters, RegisteredRosterModal, RegistrationModal};
use crate::ui_dioxus::state::{AppContext, LiveState};

#[component]
pub fn EventsView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut live = use_context::<LiveState>();
    let mut catalog = use_signal(EventCatalog::new);
    let mut workflow = use_signal(RegistrationWorkflow::new);
    let mut roster_event = use_signal(|| None::<Event>);

    // Load events on mount
    use_effect({
        let ctx = ctx.clone();
        move || {
            let ctx = ctx.clone();
            spawn(async move {
                let events = ctx.api.list_events().await;
                catalog.write().apply_fetch(events, &ctx.toasts);
                live.sync(&ctx);
            });
        }
    });

    let open_registration = {
        let ctx = ctx.clone();
        move |(event, mode): (Event, RegistrationMode)| {
            let service = ctx.registration.clone();
            if !service.begin(&mut workflow.write(), &event, mode, Utc::now()) {
                live.sync(&ctx);
                return;
            }
            let ctx = ctx.clone();
            spawn(async move {
                let candidates = service.load_candidates(event.id, mode).await;
                service.apply_candidates(&mut workflow.write(), event.id, candidates);
                live.sync(&ctx);
            });
        }
    };

    let now = Utc::now();
    let snapshot = catalog.read().clone();
    let view = snapshot.view(now);
    let loaded = snapshot.is_loaded();
    let workflow_open = workflow.read().is_open();

    rsx! {
        div {
            style: "padding: 24px; display: flex; flex-direction: column; gap: 16px;",

            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                h1 { style: "margin: 0; font-size: 24px;", "Events" }
                span {
                    style: "color: #6b7280; font-size: 14px;",
                    "{view.total()} of {snapshot.events().len()} events"
                }
            }

            EventFilters { catalog: catalog }

            if !loaded {
                div { style: "padding: 40px; text-align: center; color: #6b7280;", "Loading events..." }
            } else if view.is_empty() {
                div { style: "padding: 40px; text-align: center; color: #6b7280;", "No events match the current filters" }
            } else {
                if !view.upcoming.is_empty() {
                    h2 { style: "margin: 8px 0 0 0; font-size: 18px;", "Upcoming" }
                    div {
                        style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 16px;",
                        for event in view.upcoming.iter().cloned() {
                            EventCard {
                                key: "{event.id}",
                                event: event,
                                now: now,
                                on_register: open_registration.clone(),
                                on_roster: move |e| roster_event.set(Some(e)),
                            }
                        }
                    }
                }
                if !view.past.is_empty() {
                    h2 { style: "margin: 8px 0 0 0; font-size: 18px; color: #6b7280;", "Past" }
                    div {
                        style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 16px; opacity: 0.85;",
                        for event in view.past.iter().cloned() {
                            EventCard {
                                key: "{event.id}",
                                event: event,
                                now: now,
                                on_register: open_registration.clone(),
                                on_roster: move |e| roster_event.set(Some(e)),
                            }
                        }
                    }
                }
            }
        }

        if workflow_open {
            RegistrationModal { workflow: workflow, catalog: catalog }
        }

        if let Some(event) = roster_event.read().clone() {
            RegisteredRosterModal {
                event: event,
                on_close: move |_| roster_event.set(None),
            }
        }
    }
}
