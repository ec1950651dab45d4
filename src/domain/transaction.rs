use chrono::{DateTime, Local, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::parse_bound;
use super::null_as_default;
use super::table::{Align, Column, TableRow};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => f.write_str("INCOME"),
            TransactionType::Expense => f.write_str("EXPENSE"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionCategory {
    SundayCollection,
    Donation,
    SubscriptionFees,
    EventRegistration,
    Maintenance,
    Salary,
    EventExpense,
    Charity,
    Dumpbox,
    SundayOffering,
    Subscription,
    #[default]
    #[serde(other)]
    Other,
}

impl TransactionCategory {
    pub const ALL: [TransactionCategory; 12] = [
        TransactionCategory::SundayCollection,
        TransactionCategory::Donation,
        TransactionCategory::SubscriptionFees,
        TransactionCategory::EventRegistration,
        TransactionCategory::Maintenance,
        TransactionCategory::Salary,
        TransactionCategory::EventExpense,
        TransactionCategory::Charity,
        TransactionCategory::Dumpbox,
        TransactionCategory::SundayOffering,
        TransactionCategory::Subscription,
        TransactionCategory::Other,
    ];
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionCategory::SundayCollection => "Sunday Collection",
            TransactionCategory::Donation => "Donation",
            TransactionCategory::SubscriptionFees => "Subscription Fees",
            TransactionCategory::EventRegistration => "Event Registration",
            TransactionCategory::Maintenance => "Maintenance",
            TransactionCategory::Salary => "Salary",
            TransactionCategory::EventExpense => "Event Expense",
            TransactionCategory::Charity => "Charity",
            TransactionCategory::Dumpbox => "Dumpbox",
            TransactionCategory::SundayOffering => "Sunday Offering",
            TransactionCategory::Subscription => "Subscription",
            TransactionCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: TransactionCategory,
    #[serde(default)]
    pub custom_category: Option<String>,
}

impl Transaction {
    pub fn category_label(&self) -> String {
        match (&self.category, self.custom_category.as_deref()) {
            (TransactionCategory::Other, Some(custom)) if !custom.trim().is_empty() => {
                custom.to_string()
            }
            (category, _) => category.to_string(),
        }
    }

    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("no description")
    }

    pub fn local_day(&self) -> Option<NaiveDate> {
        self.created_at.map(|t| t.with_timezone(&Local).date_naive())
    }

    pub fn datetime_label(&self) -> String {
        self.created_at
            .map(|t| t.with_timezone(&Local).format("%d/%m/%Y %I:%M %p").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    TwelveMonths,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::TwelveMonths,
    ];

    pub fn months(&self) -> u32 {
        match self {
            Period::OneMonth => 1,
            Period::ThreeMonths => 3,
            Period::SixMonths => 6,
            Period::TwelveMonths => 12,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::OneMonth => "Last month",
            Period::ThreeMonths => "Last 3 months",
            Period::SixMonths => "Last 6 months",
            Period::TwelveMonths => "Last 12 months",
        }
    }

    pub fn start_from(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN)
    }
}

const DATE_INPUT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<TransactionCategory>,
    date_from: String,
    date_to: String,
    pub amount_min: String,
    pub amount_max: String,
    period: Option<Period>,
}

impl TransactionFilter {
    pub fn date_from(&self) -> &str {
        &self.date_from
    }

    pub fn date_to(&self) -> &str {
        &self.date_to
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    /// A preset fills both dates, ending today.
    pub fn set_period(&mut self, period: Option<Period>, today: NaiveDate) {
        self.period = period;
        if let Some(period) = period {
            self.date_from = period.start_from(today).format(DATE_INPUT).to_string();
            self.date_to = today.format(DATE_INPUT).to_string();
        }
    }

    /// Editing a date by hand drops any period preset.
    pub fn set_date_from(&mut self, value: impl Into<String>) {
        self.date_from = value.into();
        self.period = None;
    }

    pub fn set_date_to(&mut self, value: impl Into<String>) {
        self.date_to = value.into();
        self.period = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        if self.kind.is_some_and(|k| k != transaction.kind) {
            return false;
        }
        if self.category.is_some_and(|c| c != transaction.category) {
            return false;
        }

        let from: Option<NaiveDate> = parse_bound(&self.date_from);
        let to: Option<NaiveDate> = parse_bound(&self.date_to);
        if from.is_some() || to.is_some() {
            let Some(day) = transaction.local_day() else {
                return false;
            };
            if from.is_some_and(|f| day < f) || to.is_some_and(|t| day > t) {
                return false;
            }
        }

        let min: Option<f64> = parse_bound(&self.amount_min);
        let max: Option<f64> = parse_bound(&self.amount_max);
        min.is_none_or(|m| transaction.amount >= m) && max.is_none_or(|m| transaction.amount <= m)
    }

    pub fn apply(&self, rows: &[TransactionRow]) -> Vec<TransactionRow> {
        rows.iter()
            .filter(|r| self.matches(&r.transaction))
            .cloned()
            .collect()
    }

    /// Human-readable range for report headers.
    pub fn date_range_label(&self, today: NaiveDate) -> String {
        let display = |d: NaiveDate| d.format("%d/%m/%Y").to_string();
        if let Some(period) = self.period {
            return format!(
                "{} to {}",
                display(period.start_from(today)),
                display(today)
            );
        }
        let from: Option<NaiveDate> = parse_bound(&self.date_from);
        let to: Option<NaiveDate> = parse_bound(&self.date_to);
        match (from, to) {
            (None, None) => "All dates".to_string(),
            (from, to) => format!(
                "{} to {}",
                from.map(display).unwrap_or_else(|| "Start".to_string()),
                to.map(display).unwrap_or_else(|| "End".to_string())
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionSummary {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

impl TransactionSummary {
    pub fn from_rows(rows: &[TransactionRow]) -> Self {
        let (income, expense) = rows.iter().fold((0.0, 0.0), |(inc, exp), row| {
            match row.transaction.kind {
                TransactionType::Income => (inc + row.transaction.amount, exp),
                TransactionType::Expense => (inc, exp + row.transaction.amount),
            }
        });
        Self {
            income,
            expense,
            net: income - expense,
        }
    }

    pub fn is_surplus(&self) -> bool {
        self.net >= 0.0
    }
}

/// A transaction numbered for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub sno: usize,
    pub transaction: Transaction,
}

/// Newest first, numbered from 1. Undated entries go last.
pub fn number_rows(mut transactions: Vec<Transaction>) -> Vec<TransactionRow> {
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    transactions
        .into_iter()
        .enumerate()
        .map(|(i, transaction)| TransactionRow {
            sno: i + 1,
            transaction,
        })
        .collect()
}

pub fn transaction_columns() -> Vec<Column> {
    vec![
        Column::new("sno", "S.No"),
        Column::new("amount", "Amount").align(Align::Right),
        Column::new("description", "Description"),
        Column::new("datetime", "Date & Time"),
        Column::new("type", "Type"),
        Column::new("category", "Category"),
    ]
}

impl TableRow for TransactionRow {
    fn row_key(&self) -> String {
        self.transaction.id.to_string()
    }

    fn cell_value(&self, key: &str) -> Option<String> {
        let t = &self.transaction;
        match key {
            "sno" => Some(self.sno.to_string()),
            "amount" => Some(format!("{:.2}", t.amount)),
            "description" => Some(t.description_or_default().to_string()),
            "datetime" => t.created_at.map(|d| d.to_rfc3339()),
            "type" => Some(t.kind.to_string()),
            "category" => Some(t.category_label()),
            _ => None,
        }
    }

    fn render_cell(&self, key: &str) -> String {
        match key {
            "datetime" => self.transaction.datetime_label(),
            _ => self.cell_value(key).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn tx(id: i64, kind: TransactionType, amount: f64, days_ago: i64) -> Transaction {
        Transaction {
            id,
            amount,
            description: None,
            created_at: Some(Utc::now() - Duration::days(days_ago)),
            event_id: None,
            kind,
            category: TransactionCategory::Donation,
            custom_category: None,
        }
    }

    #[test]
    fn test_decode_transaction() {
        let json = r#"{"id": 3, "amount": 250.5, "type": "EXPENSE", "category": "MAINTENANCE",
                       "createdAt": "2030-01-02T03:04:05Z", "description": null}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TransactionType::Expense);
        assert_eq!(t.category, TransactionCategory::Maintenance);
        assert_eq!(t.description_or_default(), "no description");
    }

    #[test]
    fn test_rows_are_newest_first() {
        let rows = number_rows(vec![
            tx(1, TransactionType::Income, 10.0, 5),
            tx(2, TransactionType::Income, 20.0, 1),
        ]);
        assert_eq!(rows[0].transaction.id, 2);
        assert_eq!(rows[0].sno, 1);
        assert_eq!(rows[1].sno, 2);
    }

    #[test]
    fn test_summary() {
        let rows = number_rows(vec![
            tx(1, TransactionType::Income, 500.0, 1),
            tx(2, TransactionType::Expense, 700.0, 2),
            tx(3, TransactionType::Income, 100.0, 3),
        ]);
        let summary = TransactionSummary::from_rows(&rows);
        assert_eq!(summary.income, 600.0);
        assert_eq!(summary.expense, 700.0);
        assert_eq!(summary.net, -100.0);
        assert!(!summary.is_surplus());
    }

    #[test]
    fn test_period_sets_dates_and_manual_edit_clears_it() {
        let today = NaiveDate::from_ymd_opt(2030, 5, 31).unwrap();
        let mut filter = TransactionFilter::default();
        filter.set_period(Some(Period::ThreeMonths), today);
        assert_eq!(filter.date_from(), "2030-02-28");
        assert_eq!(filter.date_to(), "2030-05-31");
        assert_eq!(filter.date_range_label(today), "28/02/2030 to 31/05/2030");

        filter.set_date_to("2030-04-01");
        assert_eq!(filter.period(), None);
        assert_eq!(filter.date_range_label(today), "28/02/2030 to 01/04/2030");
    }

    #[test]
    fn test_filter_by_type_and_amount() {
        let rows = number_rows(vec![
            tx(1, TransactionType::Income, 50.0, 1),
            tx(2, TransactionType::Income, 500.0, 1),
            tx(3, TransactionType::Expense, 500.0, 1),
        ]);
        let filter = TransactionFilter {
            kind: Some(TransactionType::Income),
            amount_min: "100".into(),
            ..Default::default()
        };
        let hits = filter.apply(&rows);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].transaction.id, 2);
    }

    #[test]
    fn test_date_filter_uses_local_days() {
        let day = NaiveDate::from_ymd_opt(2030, 3, 10).unwrap();
        let mut t = tx(1, TransactionType::Income, 1.0, 0);
        t.created_at = Local
            .from_local_datetime(&day.and_hms_opt(22, 0, 0).unwrap())
            .earliest()
            .map(|d| d.with_timezone(&Utc));

        let mut filter = TransactionFilter::default();
        filter.set_date_from("2030-03-10");
        filter.set_date_to("2030-03-10");
        assert!(filter.matches(&t));

        filter.set_date_from("2030-03-11");
        assert!(!filter.matches(&t));
    }

    #[test]
    fn test_all_dates_label() {
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(
            TransactionFilter::default().date_range_label(today),
            "All dates"
        );
    }

    #[test]
    fn test_custom_category_label() {
        let mut t = tx(1, TransactionType::Expense, 1.0, 0);
        t.category = TransactionCategory::Other;
        t.custom_category = Some("Flowers".into());
        assert_eq!(t.category_label(), "Flowers");
    }
}
