use dioxus::prelude::*;

use crate::domain::catalog::SortField;
use crate::domain::event::EventCategory;
use crate::services::EventCatalog;

const INPUT_STYLE: &str = "padding: 6px 10px; border: 1px solid #d1d5db; border-radius: 6px; font-size: 13px;";
const LABEL_STYLE: &str = "display: flex; flex-direction: column; gap: 4px; font-size: 12px; color: #4b5563;";

#[component]
pub fn EventFilters(mut catalog: Signal<EventCatalog>) -> Element {
    let mut expanded = use_signal(|| false);
    let snapshot = catalog.read().clone();
    let filter = &snapshot.filter;
    let active = filter.active_count();
    let sort = snapshot.sort;
    let category_value = filter.category.map(|c| c.code()).unwrap_or("");

    rsx! {
        div {
            style: "background: white; border: 1px solid #e5e7eb; border-radius: 10px; padding: 12px 16px;
                   display: flex; flex-direction: column; gap: 12px;",

            div {
                style: "display: flex; gap: 10px; align-items: center; flex-wrap: wrap;",
                input {
                    r#type: "text",
                    placeholder: "Search events...",
                    value: "{filter.text}",
                    style: "flex: 1; min-width: 200px; {INPUT_STYLE}",
                    oninput: move |evt| catalog.write().filter.text = evt.value(),
                }
                select {
                    style: INPUT_STYLE,
                    value: "{sort.field.key()}",
                    onchange: move |evt| {
                        if let Some(field) = SortField::from_key(&evt.value()) {
                            catalog.write().set_sort_field(field);
                        }
                    },
                    for field in SortField::ALL {
                        option {
                            value: field.key(),
                            selected: field == sort.field,
                            "Sort by {field.label()}"
                        }
                    }
                }
                button {
                    style: "{INPUT_STYLE} background: white; cursor: pointer;",
                    title: "Toggle sort direction",
                    onclick: move |_| catalog.write().toggle_sort_direction(),
                    "{sort.direction.arrow()}"
                }
                button {
                    style: "{INPUT_STYLE} background: #f9fafb; cursor: pointer;",
                    onclick: move |_| {
                        let open = *expanded.read();
                        expanded.set(!open);
                    },
                    if active > 0 { "Filters ({active})" } else { "Filters" }
                }
                if active > 0 {
                    button {
                        style: "{INPUT_STYLE} background: white; color: #dc2626; cursor: pointer;",
                        onclick: move |_| catalog.write().reset_filters(),
                        "Reset filters"
                    }
                }
            }

            if *expanded.read() {
                div {
                    style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 10px;",

                    label {
                        style: LABEL_STYLE,
                        "Category"
                        select {
                            style: INPUT_STYLE,
                            value: category_value,
                            onchange: move |evt| {
                                catalog.write().filter.category = EventCategory::from_code(&evt.value());
                            },
                            option { value: "", selected: filter.category.is_none(), "All categories" }
                            for category in EventCategory::ALL {
                                option {
                                    value: category.code(),
                                    selected: filter.category == Some(category),
                                    "{category}"
                                }
                            }
                        }
                    }
                    label {
                        style: LABEL_STYLE,
                        "From date"
                        input {
                            r#type: "date",
                            style: INPUT_STYLE,
                            value: "{filter.date_from}",
                            oninput: move |evt| catalog.write().filter.date_from = evt.value(),
                        }
                    }
                    label {
                        style: LABEL_STYLE,
                        "To date"
                        input {
                            r#type: "date",
                            style: INPUT_STYLE,
                            value: "{filter.date_to}",
                            oninput: move |evt| catalog.write().filter.date_to = evt.value(),
                        }
                    }
                    label {
                        style: LABEL_STYLE,
                        "Min fee"
                        input {
                            r#type: "number",
                            style: INPUT_STYLE,
                            value: "{filter.fee_min}",
                            oninput: move |evt| catalog.write().filter.fee_min = evt.value(),
                        }
                    }
                    label {
                        style: LABEL_STYLE,
                        "Max fee"
                        input {
                            r#type: "number",
                            style: INPUT_STYLE,
                            value: "{filter.fee_max}",
                            oninput: move |evt| catalog.write().filter.fee_max = evt.value(),
                        }
                    }
                    label {
                        style: LABEL_STYLE,
                        "Min registered"
                        input {
                            r#type: "number",
                            style: INPUT_STYLE,
                            value: "{filter.registrations_min}",
                            oninput: move |evt| catalog.write().filter.registrations_min = evt.value(),
                        }
                    }
                    label {
                        style: LABEL_STYLE,
                        "Max registered"
                        input {
                            r#type: "number",
                            style: INPUT_STYLE,
                            value: "{filter.registrations_max}",
                            oninput: move |evt| catalog.write().filter.registrations_max = evt.value(),
                        }
                    }
                }
            }
        }
    }
}
