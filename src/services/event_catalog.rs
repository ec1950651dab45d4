use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::catalog::{catalog_view, CatalogView, EventFilter, EventSort, SortField};
use crate::domain::event::Event;
use crate::error::ApiError;
use crate::services::api_client::ParishApi;
use crate::services::toast::ToastQueue;

/// The fetched event list plus the operator's filter and sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventCatalog {
    events: Vec<Event>,
    pub filter: EventFilter,
    pub sort: EventSort,
    loaded: bool,
}

impl EventCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn find(&self, event_id: i64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// Replaces the list on success; on failure keeps the old list and reports.
    /// Either way the first fetch is settled.
    pub fn apply_fetch(&mut self, result: Result<Vec<Event>, ApiError>, toasts: &ToastQueue) -> bool {
        self.loaded = true;
        match result {
            Ok(events) => {
                info!(count = events.len(), "Events loaded");
                self.events = events;
                true
            }
            Err(e) => {
                warn!(error = %e, "Event list fetch failed");
                toasts.error(e.user_message("Failed to fetch events"));
                false
            }
        }
    }

    pub async fn refresh(&mut self, api: &dyn ParishApi, toasts: &ToastQueue) -> bool {
        let result = api.list_events().await;
        self.apply_fetch(result, toasts)
    }

    pub fn view(&self, now: DateTime<Utc>) -> CatalogView {
        catalog_view(&self.events, &self.filter, &self.sort, now)
    }

    /// Picking a new field keeps the current direction.
    pub fn set_sort_field(&mut self, field: SortField) {
        self.sort.field = field;
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort.toggle_direction();
    }

    pub fn reset_filters(&mut self) {
        self.filter.reset();
        self.sort = EventSort::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api_client::mock::MockParishApi;

    #[tokio::test]
    async fn test_refresh_replaces_events() {
        let api = MockParishApi::new();
        api.set_events(Ok(vec![Event::new(1, "Mass"), Event::new(2, "Retreat")]));
        let toasts = ToastQueue::default();

        let mut catalog = EventCatalog::new();
        assert!(catalog.refresh(&api, &toasts).await);
        assert_eq!(catalog.events().len(), 2);
        assert!(catalog.is_loaded());
        assert!(toasts.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_old_list() {
        let api = MockParishApi::new();
        api.set_events(Ok(vec![Event::new(1, "Mass")]));
        let toasts = ToastQueue::default();
        let mut catalog = EventCatalog::new();
        catalog.refresh(&api, &toasts).await;

        api.set_events(Err(ApiError::Network {
            message: "offline".into(),
        }));
        assert!(!catalog.refresh(&api, &toasts).await);
        assert_eq!(catalog.events().len(), 1);
        assert_eq!(toasts.snapshot()[0].message, "Failed to fetch events");
    }

    #[test]
    fn test_failed_first_fetch_still_settles() {
        let toasts = ToastQueue::default();
        let mut catalog = EventCatalog::new();
        assert!(!catalog.is_loaded());

        let result = Err(ApiError::Status {
            status: 500,
            message: Some("Database unavailable".into()),
        });
        assert!(!catalog.apply_fetch(result, &toasts));
        assert!(catalog.is_loaded());
        assert!(catalog.events().is_empty());
        assert_eq!(toasts.snapshot()[0].message, "Database unavailable");
    }

    #[test]
    fn test_reset_filters_restores_default_sort() {
        let mut catalog = EventCatalog::new();
        catalog.filter.text = "feast".into();
        catalog.set_sort_field(SortField::Title);
        catalog.toggle_sort_direction();

        catalog.reset_filters();
        assert_eq!(catalog.filter, EventFilter::default());
        assert_eq!(catalog.sort, EventSort::default());
    }
}
