use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            ToastKind::Success => ("#f0fdf4", "#bbf7d0"),
            ToastKind::Error => ("#fef2f2", "#fecaca"),
            ToastKind::Warning => ("#fefce8", "#fef08a"),
            ToastKind::Info => ("#eff6ff", "#bfdbfe"),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✕",
            ToastKind::Warning => "⚠",
            ToastKind::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Process-wide transient messages. Clones share one queue.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
    duration: Duration,
}

impl PartialEq for ToastQueue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.toasts, &other.toasts)
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(std::time::Duration::from_millis(5_000))
    }
}

impl ToastQueue {
    pub fn new(duration: std::time::Duration) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            duration: Duration::from_std(duration).unwrap_or_else(|_| Duration::seconds(5)),
        }
    }

    /// A zero duration keeps the toast until dismissed.
    pub fn push_at(&self, kind: ToastKind, message: impl Into<String>, now: DateTime<Utc>) -> Uuid {
        let message = message.into();
        match kind {
            ToastKind::Error => error!(toast = %message, "Error toast"),
            ToastKind::Warning => warn!(toast = %message, "Warning toast"),
            ToastKind::Success | ToastKind::Info => info!(toast = %message, "Toast"),
        }

        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            message,
            expires_at: (self.duration > Duration::zero()).then(|| now + self.duration),
        };
        let id = toast.id;
        self.toasts.lock().push(toast);
        id
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> Uuid {
        self.push_at(kind, message, Utc::now())
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Warning, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Info, message)
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = self.toasts.lock();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    /// Drops expired toasts and returns the rest, oldest first.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Toast> {
        let mut toasts = self.toasts.lock();
        toasts.retain(|t| t.expires_at.is_none_or(|at| at > now));
        toasts.clone()
    }

    /// Everything queued, expired or not.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    pub fn messages(&self) -> Vec<(ToastKind, String)> {
        self.snapshot()
            .into_iter()
            .map(|t| (t.kind, t.message))
            .collect()
    }

    pub fn clear(&self) {
        self.toasts.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_order() {
        let queue = ToastQueue::default();
        queue.success("saved");
        queue.warning("careful");
        assert_eq!(
            queue.messages(),
            vec![
                (ToastKind::Success, "saved".to_string()),
                (ToastKind::Warning, "careful".to_string())
            ]
        );
    }

    #[test]
    fn test_expiry() {
        let queue = ToastQueue::new(std::time::Duration::from_secs(5));
        let now = Utc::now();
        queue.push_at(ToastKind::Info, "hello", now);

        assert_eq!(queue.active(now + Duration::seconds(4)).len(), 1);
        assert!(queue.active(now + Duration::seconds(5)).is_empty());
        assert!(queue.snapshot().is_empty());
    }

    #[test]
    fn test_zero_duration_is_sticky() {
        let queue = ToastQueue::new(std::time::Duration::ZERO);
        let now = Utc::now();
        queue.push_at(ToastKind::Error, "stuck", now);
        assert_eq!(queue.active(now + Duration::days(1)).len(), 1);
    }

    #[test]
    fn test_dismiss_and_shared_clones() {
        let queue = ToastQueue::default();
        let other = queue.clone();
        let id = queue.error("boom");
        assert_eq!(other.snapshot().len(), 1);
        assert!(other.dismiss(id));
        assert!(!queue.dismiss(id));
        assert!(queue.snapshot().is_empty());
    }
}
