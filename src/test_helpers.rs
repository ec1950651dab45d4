// Test helpers for integration testing

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::ParishInfo;
use crate::domain::event::{Event, EventCategory};
use crate::domain::family::{BccGroupRef, Family, FamilyRef, Parishioner, RegisteredParishioner};
use crate::domain::receipt::{
    Receipt, ReceiptEvent, ReceiptFamily, ReceiptGroup, ReceiptParishioner, ReceiptRegistration,
};
use crate::services::receipt::{ReceiptGenerator, ReceiptSink};
use crate::services::toast::ToastQueue;
use crate::services::RegistrationService;

pub use crate::services::api_client::mock::{MockCall, MockParishApi};

/// Sink that keeps deliveries in memory and can be told to fail.
#[derive(Clone, Default)]
pub struct MemorySink {
    delivered: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    failing: Arc<Mutex<bool>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn file_names(&self) -> Vec<String> {
        self.delivered.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn delivered(&self) -> Vec<(String, Vec<u8>)> {
        self.delivered.lock().clone()
    }
}

impl ReceiptSink for MemorySink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<()> {
        if *self.failing.lock() {
            bail!("download blocked");
        }
        self.delivered
            .lock()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// A registration service wired to a mock API, an in-memory sink and a fresh toast queue.
pub struct TestContext {
    pub api: MockParishApi,
    pub sink: MemorySink,
    pub toasts: ToastQueue,
    pub service: RegistrationService,
}

impl TestContext {
    pub fn new_for_test() -> Self {
        let api = MockParishApi::new();
        let sink = MemorySink::new();
        let toasts = ToastQueue::default();
        let receipts = ReceiptGenerator::new(Arc::new(sink.clone()), ParishInfo::default());
        let service = RegistrationService::new(Arc::new(api.clone()), receipts, toasts.clone());
        Self {
            api,
            sink,
            toasts,
            service,
        }
    }
}

pub fn event_at(id: i64, title: &str, start: DateTime<Utc>, fee: f64) -> Event {
    let mut event = Event::new(id, title);
    event.category = EventCategory::Other;
    event.start_time = Some(start);
    event.duration = 90;
    event.registration_fees = fee;
    event.location = Some("Parish Hall".to_string());
    event
}

/// Starts ten days from `now`.
pub fn upcoming_event(id: i64, fee: f64, now: DateTime<Utc>) -> Event {
    event_at(id, "Parish Retreat", now + Duration::days(10), fee)
}

/// Started two days before `now`.
pub fn past_event(id: i64, fee: f64, now: DateTime<Utc>) -> Event {
    event_at(id, "Harvest Festival", now - Duration::days(2), fee)
}

pub fn family(id: i64, head: &str, members: u32) -> Family {
    Family {
        id,
        head_of_family: head.to_string(),
        phone_number: Some(format!("98450{:05}", id)),
        member_count: members,
    }
}

fn family_ref(head: &str, group: Option<&str>) -> FamilyRef {
    FamilyRef {
        head_of_family: head.to_string(),
        phone_number: None,
        bcc_group: group.map(|name| BccGroupRef {
            id: None,
            name: Some(name.to_string()),
        }),
    }
}

pub fn parishioner(id: i64, name: &str, family_id: i64, head: &str) -> Parishioner {
    Parishioner {
        id,
        name: name.to_string(),
        gender: None,
        family_id,
        family: Some(family_ref(head, Some("St. Anne"))),
    }
}

pub fn registered(
    id: i64,
    name: &str,
    family_id: i64,
    head: &str,
    receipt_number: Option<&str>,
) -> RegisteredParishioner {
    RegisteredParishioner {
        id,
        name: name.to_string(),
        gender: Some("F".to_string()),
        family_id,
        family: Some(family_ref(head, None)),
        registered_at: None,
        receipt_number: receipt_number.map(str::to_string),
    }
}

/// A complete receipt for `names`, all from one family.
pub fn receipt(number: &str, event: &Event, names: &[&str]) -> Receipt {
    let registrations = names
        .iter()
        .map(|name| ReceiptRegistration {
            parishioner: Some(ReceiptParishioner {
                id: None,
                name: Some(name.to_string()),
                family: Some(ReceiptFamily {
                    head_of_family: Some("Thomas Mathew".to_string()),
                }),
                bcc_group: Some(ReceiptGroup {
                    name: Some("St. Anne".to_string()),
                }),
            }),
        })
        .collect::<Vec<_>>();

    Receipt {
        receipt_number: Some(number.to_string()),
        registered_at: event.start_time.map(|t| t - Duration::days(1)),
        event: Some(ReceiptEvent {
            id: Some(event.id),
            title: Some(event.title.clone()),
            start_time: event.start_time,
            location: event.location.clone(),
            registration_fees: Some(event.registration_fees),
        }),
        per_person_fee: Some(event.registration_fees),
        total_fee: Some(event.registration_fees * registrations.len() as f64),
        registrations,
    }
}
