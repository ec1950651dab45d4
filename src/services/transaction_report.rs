use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::domain::transaction::{TransactionFilter, TransactionRow};
use crate::services::receipt::ReceiptSink;

pub const REPORT_HEADERS: [&str; 6] = [
    "S.No",
    "Amount (In Rupees)",
    "Description",
    "Date & Time",
    "Type",
    "Category",
];

pub fn report_file_name(today: NaiveDate) -> String {
    format!("Transaction_Report_{}.csv", today.format("%Y-%m-%d"))
}

/// Title block, blank spacer, header row, then one record per filtered row.
pub fn render_csv(rows: &[TransactionRow], filter: &TransactionFilter, today: NaiveDate) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(["Transaction Report"])?;
    writer.write_record([format!("Date Range: {}", filter.date_range_label(today))])?;
    writer.write_record([""])?;
    writer.write_record(REPORT_HEADERS)?;

    for row in rows {
        let t = &row.transaction;
        writer.write_record([
            row.sno.to_string(),
            format!("{:.2}", t.amount),
            t.description_or_default().to_string(),
            t.datetime_label(),
            t.kind.to_string(),
            t.category_label(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing report: {}", e.error()))
}

/// Renders and delivers the report, returning the file name used.
pub fn export(
    sink: &dyn ReceiptSink,
    rows: &[TransactionRow],
    filter: &TransactionFilter,
    today: NaiveDate,
) -> Result<String> {
    let bytes = render_csv(rows, filter, today).context("rendering transaction report")?;
    let file_name = report_file_name(today);
    sink.deliver(&file_name, &bytes)
        .with_context(|| format!("delivering {}", file_name))?;
    tracing::info!(file_name = %file_name, rows = rows.len(), "Transaction report exported");
    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::{
        number_rows, Transaction, TransactionCategory, TransactionType,
    };
    use crate::services::receipt::sink::MockReceiptSink;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn rows() -> Vec<TransactionRow> {
        number_rows(vec![
            Transaction {
                id: 1,
                amount: 1200.0,
                description: Some("Feast, offering".into()),
                created_at: None,
                event_id: None,
                kind: TransactionType::Income,
                category: TransactionCategory::SundayCollection,
                custom_category: None,
            },
            Transaction {
                id: 2,
                amount: 80.5,
                description: None,
                created_at: None,
                event_id: None,
                kind: TransactionType::Expense,
                category: TransactionCategory::Other,
                custom_category: Some("Flowers".into()),
            },
        ])
    }

    #[test]
    fn test_report_layout() {
        let bytes = render_csv(&rows(), &TransactionFilter::default(), today()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Transaction Report");
        assert_eq!(lines[1], "Date Range: All dates");
        assert_eq!(lines[2], "\"\"");
        assert_eq!(
            lines[3],
            "S.No,Amount (In Rupees),Description,Date & Time,Type,Category"
        );
        assert_eq!(lines[4], "1,1200.00,\"Feast, offering\",N/A,INCOME,Sunday Collection");
        assert_eq!(lines[5], "2,80.50,no description,N/A,EXPENSE,Flowers");
    }

    #[test]
    fn test_report_names_the_period() {
        let mut filter = TransactionFilter::default();
        filter.set_date_from("2024-01-01");
        let text = String::from_utf8(render_csv(&[], &filter, today()).unwrap()).unwrap();
        assert!(text.contains("Date Range: 01/01/2024 to End"));
    }

    #[test]
    fn test_export_delivers_named_file() {
        let mut sink = MockReceiptSink::new();
        sink.expect_deliver()
            .withf(|name, bytes| {
                name.to_string() == "Transaction_Report_2024-03-15.csv" && !bytes.is_empty()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let name = export(&sink, &rows(), &TransactionFilter::default(), today()).unwrap();
        assert_eq!(name, "Transaction_Report_2024-03-15.csv");
    }

    #[test]
    fn test_export_surfaces_sink_failure() {
        let mut sink = MockReceiptSink::new();
        sink.expect_deliver()
            .returning(|_, _| Err(anyhow::anyhow!("disk full")));
        let err = export(&sink, &rows(), &TransactionFilter::default(), today()).unwrap_err();
        assert!(format!("{:#}", err).contains("disk full"));
    }
}
