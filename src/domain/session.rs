use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    Staff,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Active {
        user: User,
        token: Option<String>,
    },
    /// The server rejected the credentials mid-session.
    Expired,
}

#[derive(Debug, Default)]
struct SessionInner {
    state: RwLock<SessionState>,
    revision: AtomicU64,
}

/// The one place the console keeps who is signed in.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn replace(&self, next: SessionState) {
        *self.inner.state.write() = next;
        self.inner.revision.fetch_add(1, Ordering::SeqCst);
    }

    pub fn sign_in(&self, user: User, token: Option<String>) {
        tracing::info!(user_id = user.id, role = ?user.role, "Session started");
        self.replace(SessionState::Active { user, token });
    }

    pub fn sign_out(&self) {
        tracing::info!("Session cleared");
        self.replace(SessionState::Anonymous);
    }

    /// Only an active session can expire; repeated signals are no-ops.
    pub fn expire(&self) -> bool {
        let was_active = matches!(*self.inner.state.read(), SessionState::Active { .. });
        if was_active {
            tracing::warn!("Session expired, login required");
            self.replace(SessionState::Expired);
        }
        was_active
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.read().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        match &*self.inner.state.read() {
            SessionState::Active { user, .. } => Some(user.clone()),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<String> {
        match &*self.inner.state.read() {
            SessionState::Active { token, .. } => token.clone(),
            _ => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(*self.inner.state.read(), SessionState::Active { .. })
    }

    pub fn is_expired(&self) -> bool {
        matches!(*self.inner.state.read(), SessionState::Expired)
    }

    /// Bumped on every change so the UI can notice sign-in, sign-out and expiry.
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    AdminOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RequireLogin,
    Forbidden,
}

impl Access {
    pub fn decide(&self, user: Option<&User>) -> AccessDecision {
        match (self, user) {
            (Access::Public, _) => AccessDecision::Allow,
            (_, None) => AccessDecision::RequireLogin,
            (Access::Authenticated, Some(_)) => AccessDecision::Allow,
            (Access::AdminOnly, Some(u)) if u.is_admin() => AccessDecision::Allow,
            (Access::AdminOnly, Some(_)) => AccessDecision::Forbidden,
        }
    }
}
