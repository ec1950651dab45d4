use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::opt_string_or_number;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptEvent {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub registration_fees: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptFamily {
    #[serde(default)]
    pub head_of_family: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReceiptGroup {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptParishioner {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub family: Option<ReceiptFamily>,
    #[serde(default)]
    pub bcc_group: Option<ReceiptGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReceiptRegistration {
    #[serde(default)]
    pub parishioner: Option<ReceiptParishioner>,
}

/// Canonical receipt record from `GET /api/events/receipt/{n}`.
/// Decoding is lenient; [`Receipt::validate`] decides whether it can be printed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event: Option<ReceiptEvent>,
    #[serde(default)]
    pub registrations: Vec<ReceiptRegistration>,
    #[serde(default)]
    pub per_person_fee: Option<f64>,
    #[serde(default)]
    pub total_fee: Option<f64>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReceiptError {
    #[error("receipt is missing {0}")]
    MissingField(&'static str),
}

/// One printed line per registered person.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    pub name: String,
    /// Family head and group, joined for the secondary line.
    pub detail: Option<String>,
    pub fee: f64,
}

/// A receipt that passed validation, with every fallback resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReceipt {
    pub receipt_number: String,
    pub issued_at: DateTime<Utc>,
    pub event_title: String,
    pub event_start: DateTime<Utc>,
    pub location: String,
    pub registration_type: &'static str,
    pub lines: Vec<ReceiptLine>,
    pub per_person_fee: f64,
    pub total_fee: f64,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Receipt {
    pub fn registration_type_label(&self) -> &'static str {
        if self.registrations.len() > 1 {
            "Group"
        } else {
            "Individual"
        }
    }

    pub fn per_person_fee(&self) -> f64 {
        self.per_person_fee
            .or_else(|| self.event.as_ref().and_then(|e| e.registration_fees))
            .unwrap_or(0.0)
    }

    pub fn total_fee(&self) -> f64 {
        self.total_fee
            .unwrap_or_else(|| self.per_person_fee() * self.registrations.len() as f64)
    }

    /// Checks required fields in print order and resolves display fallbacks.
    pub fn validate(&self) -> Result<ValidReceipt, ReceiptError> {
        let receipt_number = present(self.receipt_number.as_deref())
            .ok_or(ReceiptError::MissingField("receipt number"))?;
        let event = self
            .event
            .as_ref()
            .ok_or(ReceiptError::MissingField("event"))?;
        let event_title = present(event.title.as_deref())
            .ok_or(ReceiptError::MissingField("event title"))?;
        let event_start = event
            .start_time
            .ok_or(ReceiptError::MissingField("event start time"))?;
        if self.registrations.is_empty() {
            return Err(ReceiptError::MissingField("registrations"));
        }

        let per_person_fee = self.per_person_fee();
        let lines = self
            .registrations
            .iter()
            .map(|reg| {
                let person = reg
                    .parishioner
                    .as_ref()
                    .ok_or(ReceiptError::MissingField("parishioner"))?;
                let name = present(person.name.as_deref())
                    .ok_or(ReceiptError::MissingField("parishioner name"))?;
                let head = person
                    .family
                    .as_ref()
                    .and_then(|f| present(f.head_of_family.as_deref()))
                    .map(|h| format!("Family: {h}"));
                let group = person
                    .bcc_group
                    .as_ref()
                    .and_then(|g| present(g.name.as_deref()))
                    .map(|g| format!("Group: {g}"));
                let detail = match (head, group) {
                    (Some(h), Some(g)) => Some(format!("{h} | {g}")),
                    (h, g) => h.or(g),
                };
                Ok(ReceiptLine {
                    name: name.to_string(),
                    detail,
                    fee: per_person_fee,
                })
            })
            .collect::<Result<Vec<_>, ReceiptError>>()?;

        Ok(ValidReceipt {
            receipt_number: receipt_number.to_string(),
            issued_at: self.registered_at.unwrap_or(event_start),
            event_title: event_title.to_string(),
            event_start,
            location: present(event.location.as_deref())
                .unwrap_or("Church hall")
                .to_string(),
            registration_type: self.registration_type_label(),
            lines,
            per_person_fee,
            total_fee: self.total_fee(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "receiptNumber": 1042,
            "registeredAt": "2030-04-01T09:00:00Z",
            "event": {"id": 1, "title": "Easter Retreat", "startTime": "2030-04-10T08:00:00Z",
                      "location": "", "registrationFees": 100},
            "registrations": [
                {"parishioner": {"id": 10, "name": "Anna", "family": {"headOfFamily": "Joseph"},
                                 "bccGroup": {"name": "St. Jude"}}},
                {"parishioner": {"id": 11, "name": "Mary"}}
            ]
        }"#
    }

    #[test]
    fn test_validate_resolves_fallbacks() {
        let receipt: Receipt = serde_json::from_str(sample_json()).unwrap();
        let valid = receipt.validate().unwrap();

        assert_eq!(valid.receipt_number, "1042");
        assert_eq!(valid.location, "Church hall");
        assert_eq!(valid.registration_type, "Group");
        assert_eq!(valid.per_person_fee, 100.0);
        assert_eq!(valid.total_fee, 200.0);
        assert_eq!(
            valid.lines[0].detail.as_deref(),
            Some("Family: Joseph | Group: St. Jude")
        );
        assert_eq!(valid.lines[1].detail, None);
    }

    #[test]
    fn test_missing_title_fails() {
        let mut receipt: Receipt = serde_json::from_str(sample_json()).unwrap();
        if let Some(event) = receipt.event.as_mut() {
            event.title = None;
        }
        assert_eq!(
            receipt.validate(),
            Err(ReceiptError::MissingField("event title"))
        );
    }

    #[test]
    fn test_missing_name_fails() {
        let mut receipt: Receipt = serde_json::from_str(sample_json()).unwrap();
        receipt.registrations[1].parishioner = Some(ReceiptParishioner::default());
        assert_eq!(
            receipt.validate(),
            Err(ReceiptError::MissingField("parishioner name"))
        );
    }

    #[test]
    fn test_single_registration_is_individual() {
        let mut receipt: Receipt = serde_json::from_str(sample_json()).unwrap();
        receipt.registrations.truncate(1);
        receipt.total_fee = Some(150.0);
        assert_eq!(receipt.registration_type_label(), "Individual");
        assert_eq!(receipt.total_fee(), 150.0);
    }

    #[test]
    fn test_empty_receipt_is_invalid() {
        assert_eq!(
            Receipt::default().validate(),
            Err(ReceiptError::MissingField("receipt number"))
        );
    }
}
