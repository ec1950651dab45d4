use chrono::{Duration, NaiveDate, TimeZone, Utc};
use parish_console::domain::sacrament::{sacrament_columns, Sacrament, SacramentRow};
use parish_console::domain::table::{TableRow, TableState};
use parish_console::domain::transaction::{
    number_rows, transaction_columns, Period, Transaction, TransactionCategory, TransactionFilter,
    TransactionSummary, TransactionType,
};
use parish_console::services::toast::ToastKind;
use parish_console::services::{transaction_report, RecordsService, ToastQueue};
use parish_console::test_helpers::*;
use std::sync::Arc;

fn ledger(count: i64) -> Vec<Transaction> {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
    (1..=count)
        .map(|id| Transaction {
            id,
            amount: 100.0 * id as f64,
            description: Some(format!("Entry {id}")),
            created_at: Some(base + Duration::days(id)),
            event_id: None,
            kind: if id % 3 == 0 {
                TransactionType::Expense
            } else {
                TransactionType::Income
            },
            category: if id % 3 == 0 {
                TransactionCategory::Maintenance
            } else {
                TransactionCategory::Donation
            },
            custom_category: None,
        })
        .collect()
}

#[test]
fn test_pages_over_numbered_transactions() {
    let rows = number_rows(ledger(23));
    let columns = transaction_columns();
    let mut state = TableState::new(10);

    let filtered = state.filtered(&rows, &columns);
    assert_eq!(filtered.len(), 23);
    assert_eq!(state.total_pages(23), 3);
    assert!(state.needs_pagination(23));

    // Newest first
    let first_page = state.page_rows(&filtered);
    assert_eq!(first_page[0].transaction.id, 23);
    assert_eq!(first_page[0].sno, 1);
    assert_eq!(state.summary(23).as_deref(), Some("Showing 1 to 10 of 23 entries"));

    state.next_page(23);
    state.next_page(23);
    state.next_page(23);
    assert_eq!(state.current_page(23), 3);
    assert_eq!(state.page_rows(&filtered).len(), 3);
    assert_eq!(state.summary(23).as_deref(), Some("Showing 21 to 23 of 23 entries"));

    state.prev_page(23);
    assert_eq!(state.current_page(23), 2);
}

#[test]
fn test_search_resets_page_and_matches_any_column() {
    let rows = number_rows(ledger(23));
    let columns = transaction_columns();
    let mut state = TableState::new(10);
    state.go_to(3, 23);

    state.set_filter("maintenance");
    let filtered = state.filtered(&rows, &columns);
    assert_eq!(filtered.len(), 7);
    assert_eq!(state.current_page(filtered.len()), 1);
    assert!(!state.needs_pagination(filtered.len()));

    // Same search twice, same rows
    let again = state.filtered(&rows, &columns);
    assert_eq!(filtered, again);

    state.set_filter("Entry 17");
    assert_eq!(state.filtered(&rows, &columns).len(), 1);
}

#[test]
fn test_page_clamps_when_filter_shrinks() {
    let rows = number_rows(ledger(30));
    let columns = transaction_columns();
    let mut state = TableState::new(10);
    state.go_to(3, 30);

    let fewer: Vec<_> = rows.iter().take(12).cloned().collect();
    let filtered = state.filtered(&fewer, &columns);
    assert_eq!(state.current_page(filtered.len()), 2);
    assert_eq!(state.page_rows(&filtered).len(), 2);
}

#[test]
fn test_empty_table_has_no_summary() {
    let rows: Vec<SacramentRow> = Vec::new();
    let state = TableState::new(10);
    assert!(state.filtered(&rows, &sacrament_columns()).is_empty());
    assert_eq!(state.summary(0), None);
    assert_eq!(state.total_pages(0), 0);
    assert_eq!(state.current_page(0), 1);
}

#[test]
fn test_sacrament_rows_fill_missing_names() {
    let sacrament: Sacrament = serde_json::from_str(
        r#"{"id": 4, "type": "FIRST_COMMUNION", "parishioner": {"name": "Maria Thomas"}, "priest": null}"#,
    )
    .unwrap();
    let row = SacramentRow::from(&sacrament);
    assert_eq!(row.render_cell("parishionerName"), "Maria Thomas");
    assert_eq!(row.render_cell("priestName"), "N/A");
    assert_eq!(row.render_cell("type"), "First Communion");
    assert_eq!(row.render_cell("date"), "N/A");
    // Missing dates never match a search
    assert_eq!(row.cell_value("date"), None);
}

#[test]
fn test_filter_and_summary_over_period() {
    let rows = number_rows(ledger(40));
    let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
    let mut filter = TransactionFilter::default();
    filter.set_period(Some(Period::OneMonth), today);
    filter.kind = Some(TransactionType::Income);

    let matched = filter.apply(&rows);
    // Jan 10 through Feb 10 covers ids 9..=40; incomes skip multiples of three
    assert!(!matched.is_empty());
    assert!(matched.iter().all(|r| r.transaction.kind == TransactionType::Income));
    assert!(
        matched
            .iter()
            .all(|r| r.transaction.id >= 9 && r.transaction.id % 3 != 0)
    );

    let summary = TransactionSummary::from_rows(&matched);
    assert_eq!(summary.expense, 0.0);
    assert!(summary.is_surplus());
    assert_eq!(filter.date_range_label(today), "10/01/2026 to 10/02/2026");

    filter.set_date_to("2026-01-31");
    assert_eq!(filter.period(), None);
    assert_eq!(filter.date_range_label(today), "10/01/2026 to 31/01/2026");
}

#[tokio::test]
async fn test_records_service_numbers_and_deletes() {
    let api = MockParishApi::new();
    api.set_transactions(Ok(ledger(3)));
    let toasts = ToastQueue::default();
    let records = RecordsService::new(Arc::new(api.clone()), toasts.clone());

    let rows = records.transactions().await.expect("transactions load");
    assert_eq!(rows.iter().map(|r| r.sno).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(rows[0].transaction.id, 3);

    assert!(records.delete_transaction(&rows[0]).await);
    assert_eq!(api.count_calls(|c| *c == MockCall::DeleteTransaction(3)), 1);
    assert_eq!(
        toasts.messages(),
        vec![(
            ToastKind::Success,
            "Transaction #1 has been deleted successfully.".to_string()
        )]
    );
}

#[test]
fn test_report_follows_filtered_rows() {
    let sink = MemorySink::new();
    let rows = number_rows(ledger(6));
    let mut filter = TransactionFilter::default();
    filter.kind = Some(TransactionType::Expense);
    let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();

    let visible = filter.apply(&rows);
    let file_name = transaction_report::export(&sink, &visible, &filter, today).unwrap();
    assert_eq!(file_name, "Transaction_Report_2026-02-10.csv");

    let (_, bytes) = &sink.delivered()[0];
    let text = String::from_utf8(bytes.clone()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Transaction Report");
    assert_eq!(lines[1], "Date Range: All dates");
    // Header block plus the two expenses
    assert_eq!(lines.len(), 4 + 2);
    assert!(lines[4].starts_with("1,600.00,Entry 6,"));
}
