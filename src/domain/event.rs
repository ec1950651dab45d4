use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{null_as_default, rupees};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Mass,
    FeastDay,
    Retreat,
    Meeting,
    #[default]
    #[serde(other)]
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Mass,
        EventCategory::FeastDay,
        EventCategory::Retreat,
        EventCategory::Meeting,
        EventCategory::Other,
    ];

    /// Wire value, as used by the API and the category filter.
    pub fn code(&self) -> &'static str {
        match self {
            EventCategory::Mass => "MASS",
            EventCategory::FeastDay => "FEAST_DAY",
            EventCategory::Retreat => "RETREAT",
            EventCategory::Meeting => "MEETING",
            EventCategory::Other => "OTHER",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventCategory::Mass => "Mass",
            EventCategory::FeastDay => "Feast Day",
            EventCategory::Retreat => "Retreat",
            EventCategory::Meeting => "Meeting",
            EventCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: EventCategory,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Minutes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub registration_fees: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub families_registered: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_registered: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardActions {
    pub register: bool,
    pub roster: bool,
}

impl Event {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            category: EventCategory::Other,
            start_time: None,
            duration: 0,
            registration_fees: 0.0,
            location: None,
            description: None,
            families_registered: 0,
            total_registered: 0,
        }
    }

    pub fn is_free(&self) -> bool {
        self.registration_fees <= 0.0
    }

    /// An event without a start time never ends.
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.start_time.is_some_and(|start| start <= now)
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        !self.has_ended(now)
    }

    /// True when the event starts within the next seven calendar days.
    pub fn is_within_next_week(&self, now: DateTime<Utc>) -> bool {
        let Some(start) = self.start_time else {
            return false;
        };
        let today = now.with_timezone(&Local).date_naive();
        let days = (start.with_timezone(&Local).date_naive() - today).num_days();
        (0..=7).contains(&days) && start > now
    }

    pub fn duration_label(&self) -> Option<String> {
        (self.duration > 0).then(|| format!("Duration: {} minutes", self.duration))
    }

    /// Registering is for upcoming events only; the roster is open on every card.
    pub fn card_actions(&self, now: DateTime<Utc>) -> CardActions {
        CardActions {
            register: self.is_upcoming(now),
            roster: true,
        }
    }

    pub fn location_or_default(&self) -> &str {
        match self.location.as_deref() {
            Some(loc) if !loc.trim().is_empty() => loc,
            _ => "Church hall",
        }
    }

    pub fn fee_label(&self) -> String {
        if self.is_free() {
            "Free".to_string()
        } else {
            format!("{} per person", rupees(self.registration_fees))
        }
    }

    pub fn fee_for(&self, members: u32) -> f64 {
        self.registration_fees * f64::from(members)
    }

    pub fn date_label(&self) -> String {
        self.start_time
            .map(|t| t.with_timezone(&Local).format("%A, %-d %B %Y").to_string())
            .unwrap_or_else(|| "Date to be announced".to_string())
    }

    pub fn time_label(&self) -> String {
        self.start_time
            .map(|t| t.with_timezone(&Local).format("%I:%M %p").to_string())
            .unwrap_or_default()
    }
}
