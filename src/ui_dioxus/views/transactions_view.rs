use dioxus::prelude::*;

use crate::domain::rupees;
use crate::domain::table::RowAction;
use crate::domain::transaction::{
    transaction_columns, Period, TransactionCategory, TransactionFilter, TransactionRow,
    TransactionSummary, TransactionType,
};
use crate::services::transaction_report;
use crate::ui_dioxus::components::{ConfirmationDialog, DataTable};
use crate::ui_dioxus::state::{AppContext, LiveState};

const INPUT_STYLE: &str = "padding: 6px 10px; border: 1px solid #d1d5db; border-radius: 6px; font-size: 13px;";

fn kind_code(kind: Option<TransactionType>) -> &'static str {
    match kind {
        Some(TransactionType::Income) => "INCOME",
        Some(TransactionType::Expense) => "EXPENSE",
        None => "",
    }
}

#[component]
pub fn TransactionsView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut live = use_context::<LiveState>();
    let mut rows = use_signal(|| None::<Vec<TransactionRow>>);
    let mut filter = use_signal(TransactionFilter::default);
    let mut pending_delete = use_signal(|| None::<TransactionRow>);
    let mut deleting = use_signal(|| false);

    let reload = {
        let ctx = ctx.clone();
        move || {
            let ctx = ctx.clone();
            spawn(async move {
                if let Some(fetched) = ctx.records.transactions().await {
                    rows.set(Some(fetched));
                } else if rows.peek().is_none() {
                    rows.set(Some(Vec::new()));
                }
                live.sync(&ctx);
            });
        }
    };

    // Load transactions on mount
    use_effect({
        let reload = reload.clone();
        move || reload()
    });

    let today = AppContext::today();
    let current_filter = filter.read().clone();
    let filtered = rows
        .read()
        .as_deref()
        .map(|all| current_filter.apply(all))
        .unwrap_or_default();
    let summary = TransactionSummary::from_rows(&filtered);
    let net_color = if summary.is_surplus() { "#15803d" } else { "#dc2626" };

    let export = {
        let ctx = ctx.clone();
        let filtered = filtered.clone();
        let current_filter = current_filter.clone();
        move |_| {
            match transaction_report::export(ctx.downloads.as_ref(), &filtered, &current_filter, today) {
                Ok(file_name) => {
                    ctx.toasts.success(format!("Report saved as {}", file_name));
                }
                Err(e) => {
                    tracing::error!(error = %format!("{:#}", e), "Report export failed");
                    ctx.toasts.error("Failed to export transaction report");
                }
            }
            live.sync(&ctx);
        }
    };

    let confirm_delete = {
        let ctx = ctx.clone();
        move |_| {
            let Some(row) = pending_delete.read().clone() else {
                return;
            };
            let ctx = ctx.clone();
            let reload = reload.clone();
            spawn(async move {
                deleting.set(true);
                let deleted = ctx.records.delete_transaction(&row).await;
                deleting.set(false);
                pending_delete.set(None);
                live.sync(&ctx);
                if deleted {
                    reload();
                }
            });
        }
    };

    let all_rows = rows.read().clone();
    let pending = pending_delete.read().clone();

    rsx! {
        div {
            style: "padding: 24px; display: flex; flex-direction: column; gap: 16px;",

            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                h1 { style: "margin: 0; font-size: 24px;", "Transactions" }
                button {
                    style: "padding: 8px 16px; background: #6366f1; color: white; border: none; border-radius: 6px;
                           cursor: pointer; font-size: 14px; font-weight: 500;",
                    disabled: filtered.is_empty(),
                    onclick: export,
                    "📥 Export CSV"
                }
            }

            // Summary cards
            div {
                style: "display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px;",
                div {
                    style: "background: #f0fdf4; border-radius: 8px; padding: 14px;",
                    div { style: "font-size: 12px; color: #4b5563;", "Income" }
                    div { style: "font-size: 20px; font-weight: 600; color: #15803d;", "{rupees(summary.income)}" }
                }
                div {
                    style: "background: #fef2f2; border-radius: 8px; padding: 14px;",
                    div { style: "font-size: 12px; color: #4b5563;", "Expense" }
                    div { style: "font-size: 20px; font-weight: 600; color: #dc2626;", "{rupees(summary.expense)}" }
                }
                div {
                    style: "background: #f9fafb; border-radius: 8px; padding: 14px;",
                    div { style: "font-size: 12px; color: #4b5563;", "Net balance" }
                    div { style: "font-size: 20px; font-weight: 600; color: {net_color};", "{rupees(summary.net)}" }
                }
            }

            // Filters
            div {
                style: "display: flex; gap: 10px; flex-wrap: wrap; align-items: center;
                       background: white; border: 1px solid #e5e7eb; border-radius: 10px; padding: 12px;",
                select {
                    style: INPUT_STYLE,
                    value: kind_code(current_filter.kind),
                    onchange: move |evt| {
                        filter.write().kind = match evt.value().as_str() {
                            "INCOME" => Some(TransactionType::Income),
                            "EXPENSE" => Some(TransactionType::Expense),
                            _ => None,
                        };
                    },
                    option { value: "", "All types" }
                    option { value: "INCOME", selected: current_filter.kind == Some(TransactionType::Income), "Income" }
                    option { value: "EXPENSE", selected: current_filter.kind == Some(TransactionType::Expense), "Expense" }
                }
                select {
                    style: INPUT_STYLE,
                    onchange: move |evt| {
                        let value = evt.value();
                        filter.write().category = TransactionCategory::ALL
                            .into_iter()
                            .find(|c| c.to_string() == value);
                    },
                    option { value: "", selected: current_filter.category.is_none(), "All categories" }
                    for category in TransactionCategory::ALL {
                        option {
                            value: "{category}",
                            selected: current_filter.category == Some(category),
                            "{category}"
                        }
                    }
                }
                select {
                    style: INPUT_STYLE,
                    onchange: move |evt| {
                        let period = Period::ALL.into_iter().find(|p| p.label() == evt.value());
                        filter.write().set_period(period, today);
                    },
                    option { value: "", selected: current_filter.period().is_none(), "Custom range" }
                    for period in Period::ALL {
                        option {
                            value: period.label(),
                            selected: current_filter.period() == Some(period),
                            "{period.label()}"
                        }
                    }
                }
                input {
                    r#type: "date",
                    style: INPUT_STYLE,
                    value: "{current_filter.date_from()}",
                    oninput: move |evt| filter.write().set_date_from(evt.value()),
                }
                span { style: "color: #6b7280;", "to" }
                input {
                    r#type: "date",
                    style: INPUT_STYLE,
                    value: "{current_filter.date_to()}",
                    oninput: move |evt| filter.write().set_date_to(evt.value()),
                }
                input {
                    r#type: "number",
                    placeholder: "Min amount",
                    style: "width: 110px; {INPUT_STYLE}",
                    value: "{current_filter.amount_min}",
                    oninput: move |evt| filter.write().amount_min = evt.value(),
                }
                input {
                    r#type: "number",
                    placeholder: "Max amount",
                    style: "width: 110px; {INPUT_STYLE}",
                    value: "{current_filter.amount_max}",
                    oninput: move |evt| filter.write().amount_max = evt.value(),
                }
                button {
                    style: "{INPUT_STYLE} background: white; cursor: pointer;",
                    onclick: move |_| filter.write().clear(),
                    "Clear"
                }
                span {
                    style: "margin-left: auto; font-size: 12px; color: #6b7280;",
                    "{current_filter.date_range_label(today)}"
                }
            }

            match all_rows {
                None => rsx! {
                    div { style: "padding: 40px; text-align: center; color: #6b7280;", "Loading transactions..." }
                },
                Some(_) => rsx! {
                    DataTable {
                        rows: filtered.clone(),
                        columns: transaction_columns(),
                        page_size: ctx.page_size(),
                        actions: vec![RowAction::delete()],
                        on_action: move |(action, key): (&'static str, String)| {
                            if action != "delete" {
                                return;
                            }
                            let row = rows
                                .read()
                                .as_ref()
                                .and_then(|all| all.iter().find(|r| r.transaction.id.to_string() == key).cloned());
                            pending_delete.set(row);
                        },
                        empty_message: "No transactions found".to_string(),
                    }
                },
            }
        }

        if let Some(row) = pending {
            ConfirmationDialog {
                title: "Delete Transaction".to_string(),
                message: format!(
                    "Delete transaction #{} ({})? This cannot be undone.",
                    row.sno,
                    rupees(row.transaction.amount)
                ),
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
