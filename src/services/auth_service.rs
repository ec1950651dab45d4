use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::session::{SessionHandle, User};
use crate::error::ApiError;
use crate::services::api_client::{Credentials, ParishApi};
use crate::services::toast::ToastQueue;

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    SignedIn(User),
    Rejected(String),
}

/// Login and logout against the API, recorded in the shared session.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn ParishApi>,
    session: SessionHandle,
    toasts: ToastQueue,
}

impl AuthService {
    pub fn new(api: Arc<dyn ParishApi>, session: SessionHandle, toasts: ToastQueue) -> Self {
        Self {
            api,
            session,
            toasts,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn validate(email: &str, password: &str) -> Result<(), String> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err("Please enter your email and password.".to_string());
        }
        if !email.contains('@') {
            return Err("Please enter a valid email address.".to_string());
        }
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        if let Err(message) = Self::validate(email, password) {
            self.toasts.warning(message.clone());
            return LoginOutcome::Rejected(message);
        }

        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api.login(&credentials).await {
            Ok(response) => {
                info!(user_id = response.user.id, "Login accepted");
                self.session
                    .sign_in(response.user.clone(), response.token);
                self.toasts.success("Login successful! Welcome back.");
                LoginOutcome::SignedIn(response.user)
            }
            Err(ApiError::Status { status, .. }) if status == 400 || status == 401 => {
                let message = "Invalid email or password.".to_string();
                warn!(status, "Login rejected");
                self.toasts.error(message.clone());
                LoginOutcome::Rejected(message)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                let message = "Login failed. Please try again.".to_string();
                self.toasts.error(message.clone());
                LoginOutcome::Rejected(message)
            }
        }
    }

    /// The local session ends even if the server call fails.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Server logout failed; clearing local session anyway");
        }
        self.session.sign_out();
        self.toasts.info("You have been logged out.");
    }
}
