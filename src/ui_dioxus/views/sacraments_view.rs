use dioxus::prelude::*;

use crate::domain::sacrament::{count_by_type, sacrament_columns, SacramentRow, SacramentType};
use crate::domain::table::RowAction;
use crate::ui_dioxus::components::{ConfirmationDialog, DataTable};
use crate::ui_dioxus::state::{AppContext, LiveState};

#[component]
pub fn SacramentsView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut live = use_context::<LiveState>();
    let mut rows = use_signal(|| None::<Vec<SacramentRow>>);
    let mut pending_delete = use_signal(|| None::<SacramentRow>);
    let mut deleting = use_signal(|| false);

    use_effect({
        let ctx = ctx.clone();
        move || {
            let ctx = ctx.clone();
            spawn(async move {
                let fetched = ctx.records.sacraments().await.unwrap_or_default();
                rows.set(Some(fetched));
                live.sync(&ctx);
            });
        }
    });

    let confirm_delete = {
        let ctx = ctx.clone();
        move |_| {
            let Some(row) = pending_delete.read().clone() else {
                return;
            };
            let ctx = ctx.clone();
            spawn(async move {
                deleting.set(true);
                if ctx.records.delete_sacrament(row.id).await {
                    if let Some(all) = rows.write().as_mut() {
                        all.retain(|r| r.id != row.id);
                    }
                }
                deleting.set(false);
                pending_delete.set(None);
                live.sync(&ctx);
            });
        }
    };

    let all_rows = rows.read().clone();
    let counts = all_rows.as_deref().map(count_by_type).unwrap_or_default();
    let pending = pending_delete.read().clone();

    rsx! {
        div {
            style: "padding: 24px; display: flex; flex-direction: column; gap: 16px;",

            h1 { style: "margin: 0; font-size: 24px;", "Sacrament Records" }

            div {
                style: "display: grid; grid-template-columns: repeat(5, 1fr); gap: 12px;",
                for kind in SacramentType::ALL {
                    div {
                        key: "{kind:?}",
                        style: "background: white; border: 1px solid #e5e7eb; border-left: 4px solid {kind.accent()};
                               border-radius: 8px; padding: 12px;",
                        div { style: "font-size: 12px; color: #4b5563;", "{kind}" }
                        div {
                            style: "font-size: 20px; font-weight: 600;",
                            "{counts.get(&kind).copied().unwrap_or(0)}"
                        }
                    }
                }
            }

            match all_rows {
                None => rsx! {
                    div { style: "padding: 40px; text-align: center; color: #6b7280;", "Loading sacrament records..." }
                },
                Some(records) => rsx! {
                    DataTable {
                        rows: records,
                        columns: sacrament_columns(),
                        page_size: ctx.page_size(),
                        actions: vec![RowAction::delete()],
                        on_action: move |(action, key): (&'static str, String)| {
                            if action != "delete" {
                                return;
                            }
                            let row = rows
                                .read()
                                .as_ref()
                                .and_then(|all| all.iter().find(|r| r.id.to_string() == key).cloned());
                            pending_delete.set(row);
                        },
                        empty_message: "No sacrament records found".to_string(),
                    }
                },
            }
        }

        if let Some(row) = pending {
            ConfirmationDialog {
                title: "Delete Sacrament Record".to_string(),
                message: format!("Delete the {} record for {}?", row.kind, row.parishioner_name),
                confirm_text: "Delete".to_string(),
                cancel_text: "Cancel".to_string(),
                danger: true,
                busy: *deleting.read(),
                on_confirm: confirm_delete,
                on_cancel: move |_| pending_delete.set(None),
            }
        }
    }
}
