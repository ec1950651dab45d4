use chrono::{DateTime, Utc};
use dioxus::prelude::*;

use crate::domain::event::Event;
use crate::domain::registration::RegistrationMode;

#[component]
pub fn EventCard(
    event: Event,
    now: DateTime<Utc>,
    on_register: EventHandler<(Event, RegistrationMode)>,
    on_roster: EventHandler<Event>,
) -> Element {
    let upcoming = event.is_upcoming(now);
    let actions = event.card_actions(now);
    let soon = event.is_within_next_week(now);
    let border = if upcoming { "#c7d2fe" } else { "#e5e7eb" };
    let fee_color = if event.is_free() { "#15803d" } else { "#1d4ed8" };

    rsx! {
        div {
            style: "background: white; border: 1px solid {border}; border-radius: 10px; padding: 16px;
                   display: flex; flex-direction: column; gap: 8px;",

            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                span {
                    style: "font-size: 12px; padding: 2px 8px; border-radius: 999px; background: #eef2ff; color: #4338ca;",
                    "{event.category}"
                }
                if soon {
                    span { style: "font-size: 12px; color: #b45309; font-weight: 600;", "This week" }
                }
            }

            h3 { style: "margin: 0; font-size: 17px;", "{event.title}" }

            div {
                style: "font-size: 13px; color: #4b5563; display: flex; flex-direction: column; gap: 2px;",
                span { "📅 {event.date_label()}" }
                if event.start_time.is_some() {
                    span { "🕒 {event.time_label()}" }
                }
                span { "📍 {event.location_or_default()}" }
                if let Some(duration) = event.duration_label() {
                    span { "⏱ {duration}" }
                }
            }

            if let Some(description) = event.description.as_ref().filter(|d| !d.trim().is_empty()) {
                p { style: "margin: 0; font-size: 13px; color: #6b7280;", "{description}" }
            }

            div {
                style: "display: flex; justify-content: space-between; font-size: 13px;",
                span { style: "color: {fee_color}; font-weight: 600;", "{event.fee_label()}" }
                span {
                    style: "color: #6b7280;",
                    "{event.families_registered} families · {event.total_registered} people"
                }
            }

            if actions.register {
                div {
                    style: "display: flex; gap: 8px; margin-top: 4px;",
                    button {
                        style: "flex: 1; padding: 8px; border: none; border-radius: 6px; background: #4f46e5;
                               color: white; cursor: pointer; font-size: 13px;",
                        onclick: {
                            let event = event.clone();
                            move |_| on_register.call((event.clone(), RegistrationMode::Family))
                        },
                        "Register Family"
                    }
                    button {
                        style: "flex: 1; padding: 8px; border: 1px solid #4f46e5; border-radius: 6px; background: white;
                               color: #4f46e5; cursor: pointer; font-size: 13px;",
                        onclick: {
                            let event = event.clone();
                            move |_| on_register.call((event.clone(), RegistrationMode::Individual))
                        },
                        "Register Individuals"
                    }
                }
            }

            if actions.roster {
                button {
                    style: "padding: 8px; border: 1px solid #d1d5db; border-radius: 6px; background: #f9fafb;
                           cursor: pointer; font-size: 13px;",
                    onclick: {
                        let event = event.clone();
                        move |_| on_roster.call(event.clone())
                    },
                    "View Registered"
                }
            }
        }
    }
}
