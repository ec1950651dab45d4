use chrono::{Local, NaiveDate};
use dioxus::prelude::*;
use std::sync::Arc;

use crate::config::ConsoleConfig;
use crate::domain::session::SessionHandle;
use crate::services::receipt::ReceiptSink;
use crate::services::toast::Toast;
use crate::services::{
    AuthService, HttpApiClient, ParishApi, ReceiptGenerator, RecordsService, RegistrationService,
    ToastQueue,
};

/// Everything the screens share, provided once at the root through context.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ConsoleConfig>,
    pub session: SessionHandle,
    pub toasts: ToastQueue,
    pub api: Arc<dyn ParishApi>,
    pub auth: AuthService,
    pub registration: RegistrationService,
    pub records: RecordsService,
    /// Receipts and CSV reports leave the app through this.
    pub downloads: Arc<dyn ReceiptSink>,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        self.session == other.session && self.toasts == other.toasts
    }
}

impl AppContext {
    pub fn from_config(config: ConsoleConfig) -> anyhow::Result<Self> {
        let session = SessionHandle::new();
        let api = HttpApiClient::new(&config, session.clone())?;
        let downloads = default_sink(&config);
        Ok(Self::with_api(config, session, Arc::new(api), downloads))
    }

    /// Wires the services around an already-built API, e.g. a mock in tests.
    pub fn with_api(
        config: ConsoleConfig,
        session: SessionHandle,
        api: Arc<dyn ParishApi>,
        downloads: Arc<dyn ReceiptSink>,
    ) -> Self {
        let toasts = ToastQueue::new(config.toast_duration);
        let receipts = ReceiptGenerator::new(downloads.clone(), config.parish.clone());
        Self {
            auth: AuthService::new(api.clone(), session.clone(), toasts.clone()),
            registration: RegistrationService::new(api.clone(), receipts, toasts.clone()),
            records: RecordsService::new(api.clone(), toasts.clone()),
            config: Arc::new(config),
            session,
            toasts,
            api,
            downloads,
        }
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Reactive mirrors of the session and toast queue, refreshed by the root ticker.
#[derive(Clone, Copy)]
pub struct LiveState {
    pub session_revision: Signal<u64>,
    pub toasts: Signal<Vec<Toast>>,
}

impl LiveState {
    /// Pulls the latest shared state into the signals, writing only on change.
    pub fn sync(&mut self, ctx: &AppContext) {
        let revision = ctx.session.revision();
        if *self.session_revision.peek() != revision {
            self.session_revision.set(revision);
        }
        let active = ctx.toasts.active(chrono::Utc::now());
        if *self.toasts.peek() != active {
            self.toasts.set(active);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_sink(config: &ConsoleConfig) -> Arc<dyn ReceiptSink> {
    Arc::new(crate::services::receipt::DirectorySink::new(
        config.receipt_dir.clone(),
    ))
}

#[cfg(target_arch = "wasm32")]
fn default_sink(_config: &ConsoleConfig) -> Arc<dyn ReceiptSink> {
    Arc::new(crate::services::receipt::BrowserDownloadSink)
}
