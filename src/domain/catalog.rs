use chrono::{DateTime, Local, NaiveDate, Utc};
use std::cmp::Ordering;
use std::str::FromStr;

use super::event::{Event, EventCategory};

/// Empty or unparsable input means "no bound".
pub fn parse_bound<T: FromStr>(raw: &str) -> Option<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Catalog filter as typed into the filter panel. Bounds stay as raw strings
/// and are parsed when the filter is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub text: String,
    pub category: Option<EventCategory>,
    pub date_from: String,
    pub date_to: String,
    pub fee_min: String,
    pub fee_max: String,
    pub registrations_min: String,
    pub registrations_max: String,
}

#[derive(Debug, Clone, Copy)]
struct Bounds<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

struct CompiledFilter {
    needle: String,
    category: Option<EventCategory>,
    dates: Bounds<NaiveDate>,
    fees: Bounds<f64>,
    registrations: Bounds<u32>,
}

impl CompiledFilter {
    fn matches(&self, event: &Event) -> bool {
        if !self.needle.is_empty() {
            let in_title = event.title.to_lowercase().contains(&self.needle);
            let in_description = event
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&self.needle));
            if !in_title && !in_description {
                return false;
            }
        }

        if self.category.is_some_and(|c| c != event.category) {
            return false;
        }

        if self.dates.is_set() {
            // Events without a start time cannot satisfy a date range.
            let Some(start) = event.start_time else {
                return false;
            };
            if !self.dates.contains(start.with_timezone(&Local).date_naive()) {
                return false;
            }
        }

        self.fees.contains(event.registration_fees)
            && self.registrations.contains(event.total_registered)
    }
}

impl EventFilter {
    fn compile(&self) -> CompiledFilter {
        CompiledFilter {
            needle: self.text.trim().to_lowercase(),
            category: self.category,
            dates: Bounds {
                min: parse_bound(&self.date_from),
                max: parse_bound(&self.date_to),
            },
            fees: Bounds {
                min: parse_bound(&self.fee_min),
                max: parse_bound(&self.fee_max),
            },
            registrations: Bounds {
                min: parse_bound(&self.registrations_min),
                max: parse_bound(&self.registrations_max),
            },
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.compile().matches(event)
    }

    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        let compiled = self.compile();
        events.iter().filter(|e| compiled.matches(e)).cloned().collect()
    }

    /// Each filter group counts once when it narrows anything.
    pub fn active_count(&self) -> usize {
        let compiled = self.compile();
        [
            !compiled.needle.is_empty(),
            compiled.category.is_some(),
            compiled.dates.is_set(),
            compiled.fees.is_set(),
            compiled.registrations.is_set(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    StartTime,
    Title,
    RegistrationFees,
    TotalRegistered,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::StartTime,
        SortField::Title,
        SortField::RegistrationFees,
        SortField::TotalRegistered,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortField::StartTime => "Date",
            SortField::Title => "Title",
            SortField::RegistrationFees => "Fee",
            SortField::TotalRegistered => "Registrations",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SortField::StartTime => "startTime",
            SortField::Title => "title",
            SortField::RegistrationFees => "registrationFees",
            SortField::TotalRegistered => "totalRegistered",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl EventSort {
    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggle();
    }

    fn compare(&self, a: &Event, b: &Event) -> Ordering {
        match self.field {
            // Undated events sort after dated ones when ascending.
            SortField::StartTime => match (a.start_time, b.start_time) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::RegistrationFees => a.registration_fees.total_cmp(&b.registration_fees),
            SortField::TotalRegistered => a.total_registered.cmp(&b.total_registered),
        }
    }

    /// Stable: equal keys keep their input order in both directions.
    pub fn apply(&self, events: &mut [Event]) {
        events.sort_by(|a, b| {
            let ord = self.compare(a, b);
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    pub upcoming: Vec<Event>,
    pub past: Vec<Event>,
}

impl CatalogView {
    pub fn total(&self) -> usize {
        self.upcoming.len() + self.past.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Filter, sort, then split into upcoming and past.
pub fn catalog_view(
    events: &[Event],
    filter: &EventFilter,
    sort: &EventSort,
    now: DateTime<Utc>,
) -> CatalogView {
    let mut visible = filter.apply(events);
    sort.apply(&mut visible);

    let (past, upcoming) = visible.into_iter().partition(|e| e.has_ended(now));
    CatalogView { upcoming, past }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn event(id: i64, title: &str, fee: f64, registered: u32) -> Event {
        let mut e = Event::new(id, title);
        e.registration_fees = fee;
        e.total_registered = registered;
        e
    }

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound::<f64>(""), None);
        assert_eq!(parse_bound::<f64>("abc"), None);
        assert_eq!(parse_bound::<f64>(" 12.5 "), Some(12.5));
        assert_eq!(parse_bound::<u32>("-1"), None);
    }

    #[test]
    fn test_text_matches_title_and_description() {
        let mut retreat = event(1, "Youth Retreat", 0.0, 0);
        retreat.description = Some("Weekend at the hills".into());
        let filter = EventFilter {
            text: "HILLS".into(),
            ..Default::default()
        };
        assert!(filter.matches(&retreat));
        assert!(!filter.matches(&event(2, "Choir practice", 0.0, 0)));
    }

    #[test]
    fn test_fee_and_registration_ranges() {
        let events = vec![
            event(1, "a", 0.0, 5),
            event(2, "b", 100.0, 20),
            event(3, "c", 250.0, 50),
        ];
        let filter = EventFilter {
            fee_min: "50".into(),
            registrations_max: "30".into(),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(&events).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(filter.active_count(), 2);
    }

    #[test]
    fn test_date_range_is_inclusive_by_local_day() {
        let day = NaiveDate::from_ymd_opt(2030, 6, 15).unwrap();
        let late = Local
            .from_local_datetime(&day.and_hms_opt(23, 30, 0).unwrap())
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        let mut e = event(1, "Vigil", 0.0, 0);
        e.start_time = Some(late);

        let filter = EventFilter {
            date_from: "2030-06-15".into(),
            date_to: "2030-06-15".into(),
            ..Default::default()
        };
        assert!(filter.matches(&e));

        e.start_time = None;
        assert!(!filter.matches(&e));
    }

    #[test]
    fn test_category_filter() {
        let mut mass = event(1, "Sunday Mass", 0.0, 0);
        mass.category = EventCategory::Mass;
        let filter = EventFilter {
            category: Some(EventCategory::Meeting),
            ..Default::default()
        };
        assert!(!filter.matches(&mass));
    }

    #[test]
    fn test_reset_clears_active_count() {
        let mut filter = EventFilter {
            text: "x".into(),
            fee_max: "oops".into(),
            ..Default::default()
        };
        assert_eq!(filter.active_count(), 1);
        filter.reset();
        assert_eq!(filter, EventFilter::default());
    }

    #[test]
    fn test_title_sort_is_case_folded_and_stable() {
        let mut events = vec![
            event(1, "beta", 0.0, 0),
            event(2, "Alpha", 0.0, 0),
            event(3, "BETA", 0.0, 0),
        ];
        let sort = EventSort {
            field: SortField::Title,
            direction: SortDirection::Ascending,
        };
        sort.apply(&mut events);
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_partition_upcoming_first() {
        let now = Utc::now();
        let mut past = event(1, "Past", 0.0, 0);
        past.start_time = Some(now - Duration::days(2));
        let mut soon = event(2, "Soon", 0.0, 0);
        soon.start_time = Some(now + Duration::days(2));
        let undated = event(3, "Undated", 0.0, 0);

        let view = catalog_view(
            &[past, soon, undated],
            &EventFilter::default(),
            &EventSort::default(),
            now,
        );
        let upcoming: Vec<i64> = view.upcoming.iter().map(|e| e.id).collect();
        assert_eq!(upcoming, vec![2, 3]);
        assert_eq!(view.past.len(), 1);
    }
}
