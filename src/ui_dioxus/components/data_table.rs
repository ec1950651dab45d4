use dioxus::prelude::*;

use crate::domain::table::{Column, RowAction, TableRow, TableState};

/// Searchable, paginated table over any [`TableRow`].
#[component]
pub fn DataTable<T: TableRow + Clone + PartialEq + 'static>(
    rows: Vec<T>,
    columns: Vec<Column>,
    page_size: usize,
    #[props(default)] actions: Vec<RowAction>,
    on_action: Option<EventHandler<(&'static str, String)>>,
    #[props(default)] hide_search: bool,
    #[props(default)] hide_pagination: bool,
    empty_message: Option<String>,
) -> Element {
    let mut state = use_signal(|| TableState::new(page_size));

    let table = state.read().clone();
    let filtered = table.filtered(&rows, &columns);
    let count = filtered.len();
    let visible = if hide_pagination {
        filtered.clone()
    } else {
        table.page_rows(&filtered)
    };
    let page = table.current_page(count);
    let pages = table.total_pages(count);
    let has_actions = !actions.is_empty();
    let span = columns.len() + usize::from(has_actions);
    let empty_text = empty_message.unwrap_or_else(|| "No records found".to_string());

    rsx! {
        div {
            style: "background: white; border-radius: 8px; border: 1px solid #e5e7eb; overflow: hidden;",

            if !hide_search {
                div {
                    style: "padding: 12px; border-bottom: 1px solid #e5e7eb;",
                    input {
                        r#type: "text",
                        placeholder: "Search...",
                        value: "{table.filter()}",
                        style: "width: 100%; max-width: 320px; padding: 8px 12px; border: 1px solid #d1d5db;
                               border-radius: 6px; font-size: 14px;",
                        oninput: move |evt| state.write().set_filter(evt.value()),
                    }
                }
            }

            table {
                style: "width: 100%; border-collapse: collapse; font-size: 14px;",
                thead {
                    tr {
                        style: "background: #f9fafb;",
                        for col in columns.iter() {
                            th {
                                key: "{col.key}",
                                style: "padding: 10px 12px; text-align: {col.align.css()}; font-weight: 600;
                                       color: #374151; border-bottom: 1px solid #e5e7eb;",
                                "{col.header}"
                            }
                        }
                        if has_actions {
                            th {
                                style: "padding: 10px 12px; text-align: center; border-bottom: 1px solid #e5e7eb;",
                                "Actions"
                            }
                        }
                    }
                }
                tbody {
                    if visible.is_empty() {
                        tr {
                            td {
                                colspan: "{span}",
                                style: "padding: 24px; text-align: center; color: #6b7280;",
                                "{empty_text}"
                            }
                        }
                    }
                    for row in visible.iter() {
                        tr {
                            key: "{row.row_key()}",
                            style: "border-bottom: 1px solid #f3f4f6;",
                            for col in columns.iter() {
                                td {
                                    style: "padding: 10px 12px; text-align: {col.align.css()};",
                                    "{row.render_cell(col.key)}"
                                }
                            }
                            if has_actions {
                                td {
                                    style: "padding: 6px 12px; text-align: center; white-space: nowrap;",
                                    for action in actions.iter() {
                                        button {
                                            style: "margin: 0 3px; padding: 4px 10px; border: none; border-radius: 4px;
                                                   background: {action.color()}; color: white; cursor: pointer; font-size: 12px;",
                                            onclick: {
                                                let key = action.key;
                                                let row_key = row.row_key();
                                                move |_| {
                                                    if let Some(handler) = on_action {
                                                        handler.call((key, row_key.clone()));
                                                    }
                                                }
                                            },
                                            "{action.label}"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div {
                style: "display: flex; justify-content: space-between; align-items: center; padding: 10px 12px;
                       color: #6b7280; font-size: 13px;",
                span {
                    {table.summary(count).unwrap_or_default()}
                }
                if !hide_pagination && table.needs_pagination(count) {
                    div {
                        style: "display: flex; gap: 6px; align-items: center;",
                        button {
                            style: "padding: 4px 10px; border: 1px solid #d1d5db; background: white; border-radius: 4px; cursor: pointer;",
                            disabled: page <= 1,
                            onclick: move |_| state.write().prev_page(count),
                            "Previous"
                        }
                        span { "Page {page} of {pages}" }
                        button {
                            style: "padding: 4px 10px; border: 1px solid #d1d5db; background: white; border-radius: 4px; cursor: pointer;",
                            disabled: page >= pages,
                            onclick: move |_| state.write().next_page(count),
                            "Next"
                        }
                    }
                }
            }
        }
    }
}
