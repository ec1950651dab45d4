use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::event::Event;
use crate::domain::family::{group_by_family, FamilyGroup, RegisteredParishioner};
use crate::domain::registration::{
    CandidatePool, RegistrationMode, RegistrationRequest, RegistrationWorkflow, WorkflowError,
};
use crate::error::ApiError;
use crate::services::api_client::ParishApi;
use crate::services::event_catalog::EventCatalog;
use crate::services::receipt::ReceiptGenerator;
use crate::services::toast::ToastQueue;

pub const RECEIPT_DEGRADED: &str = "Registration succeeded, but the receipt could not be generated.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// Free event, or the server issued no receipt number.
    NotApplicable,
    Generated,
    /// Registration stands; the receipt fetch or render failed.
    Degraded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Registered { receipt: ReceiptStatus },
    Failed { server_message: Option<String> },
}

/// Drives a [`RegistrationWorkflow`] against the API, the receipt generator and the toasts.
///
/// Each step is exposed separately so the UI can hold its state in a signal
/// between awaits; [`RegistrationService::open`] and [`RegistrationService::confirm`]
/// chain them for callers that own the workflow outright.
#[derive(Clone)]
pub struct RegistrationService {
    api: Arc<dyn ParishApi>,
    receipts: ReceiptGenerator,
    toasts: ToastQueue,
}

impl RegistrationService {
    pub fn new(api: Arc<dyn ParishApi>, receipts: ReceiptGenerator, toasts: ToastQueue) -> Self {
        Self {
            api,
            receipts,
            toasts,
        }
    }

    pub fn api(&self) -> &Arc<dyn ParishApi> {
        &self.api
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    fn report(&self, error: &WorkflowError) {
        if error.is_warning() {
            self.toasts.warning(error.to_string());
        } else {
            self.toasts.error(error.to_string());
        }
    }

    /// Opens the dialog. Ended events are refused with a toast and no fetch.
    pub fn begin(
        &self,
        workflow: &mut RegistrationWorkflow,
        event: &Event,
        mode: RegistrationMode,
        now: DateTime<Utc>,
    ) -> bool {
        match workflow.begin(event, mode, now) {
            Ok(()) => {
                info!(event_id = event.id, %mode, "Registration opened");
                true
            }
            Err(e) => {
                warn!(event_id = event.id, %mode, error = %e, "Registration refused");
                self.report(&e);
                false
            }
        }
    }

    pub async fn load_candidates(
        &self,
        event_id: i64,
        mode: RegistrationMode,
    ) -> Result<CandidatePool, ApiError> {
        match mode {
            RegistrationMode::Family => self
                .api
                .unregistered_families(event_id)
                .await
                .map(CandidatePool::Families),
            RegistrationMode::Individual => self
                .api
                .unregistered_individuals(event_id)
                .await
                .map(CandidatePool::Individuals),
        }
    }

    /// Returns true when the workflow took the pool.
    pub fn apply_candidates(
        &self,
        workflow: &mut RegistrationWorkflow,
        event_id: i64,
        result: Result<CandidatePool, ApiError>,
    ) -> bool {
        match result {
            Ok(pool) => {
                let size = pool.len();
                let applied = workflow.candidates_loaded(event_id, pool);
                if applied {
                    info!(event_id, candidates = size, "Candidates loaded");
                }
                applied
            }
            Err(e) => {
                warn!(event_id, error = %e, "Candidate fetch failed");
                if let Some(error) = workflow.candidates_failed(event_id) {
                    self.report(&error);
                }
                false
            }
        }
    }

    pub fn request_confirmation(&self, workflow: &mut RegistrationWorkflow) -> bool {
        match workflow.request_confirmation() {
            Ok(()) => true,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Moves to Submitting. A second confirm while one is in flight is ignored quietly.
    pub fn begin_submit(&self, workflow: &mut RegistrationWorkflow) -> Option<RegistrationRequest> {
        match workflow.begin_submit() {
            Ok(request) => Some(request),
            Err(WorkflowError::Busy) => None,
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Issues the one registration POST, then the receipt fetch when one is due.
    #[instrument(skip(self, request, event), fields(event_id = request.event_id(), mode = %request.mode()))]
    pub async fn submit(&self, request: &RegistrationRequest, event: &Event) -> SubmissionOutcome {
        let response = match self.api.register(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Registration rejected");
                return SubmissionOutcome::Failed {
                    server_message: e.server_message().map(str::to_string),
                };
            }
        };
        info!(receipt_number = ?response.receipt_number, "Registration stored");

        let receipt_number = response
            .receipt_number
            .filter(|n| !n.trim().is_empty());
        let receipt = match receipt_number {
            Some(number) if !event.is_free() => match self.api.fetch_receipt(&number).await {
                Ok(receipt) if self.receipts.generate(&receipt) => ReceiptStatus::Generated,
                Ok(_) => ReceiptStatus::Degraded,
                Err(e) => {
                    warn!(receipt_number = %number, error = %e, "Receipt fetch failed");
                    ReceiptStatus::Degraded
                }
            },
            _ => ReceiptStatus::NotApplicable,
        };

        SubmissionOutcome::Registered { receipt }
    }

    /// Moves the workflow out of Submitting and posts the matching toasts.
    /// Returns true when the registration persisted.
    pub fn apply_outcome(
        &self,
        workflow: &mut RegistrationWorkflow,
        outcome: SubmissionOutcome,
    ) -> bool {
        match outcome {
            SubmissionOutcome::Registered { receipt } => {
                workflow.submit_succeeded();
                match receipt {
                    ReceiptStatus::Generated => {
                        self.toasts
                            .success("Registration successful! Receipt downloaded.");
                    }
                    ReceiptStatus::NotApplicable => {
                        self.toasts.success("Registration successful!");
                    }
                    ReceiptStatus::Degraded => {
                        self.toasts.success("Registration successful!");
                        self.toasts.warning(RECEIPT_DEGRADED);
                    }
                }
                true
            }
            SubmissionOutcome::Failed { server_message } => {
                let error = workflow.submit_failed(server_message);
                self.report(&error);
                false
            }
        }
    }

    /// Begin plus the initial candidate fetch.
    pub async fn open(
        &self,
        workflow: &mut RegistrationWorkflow,
        event: &Event,
        mode: RegistrationMode,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.begin(workflow, event, mode, now) {
            return false;
        }
        let result = self.load_candidates(event.id, mode).await;
        self.apply_candidates(workflow, event.id, result)
    }

    pub async fn refresh_candidates(&self, workflow: &mut RegistrationWorkflow) -> bool {
        let Some(event_id) = workflow.event().map(|e| e.id) else {
            return false;
        };
        let result = self.load_candidates(event_id, workflow.mode()).await;
        self.apply_candidates(workflow, event_id, result)
    }

    /// Confirm through to the refreshed pool and catalog.
    pub async fn confirm(
        &self,
        workflow: &mut RegistrationWorkflow,
        catalog: &mut EventCatalog,
    ) -> bool {
        let Some(request) = self.begin_submit(workflow) else {
            return false;
        };
        let Some(event) = workflow.event().cloned() else {
            return false;
        };

        let outcome = self.submit(&request, &event).await;
        let registered = self.apply_outcome(workflow, outcome);
        if registered {
            self.refresh_candidates(workflow).await;
            catalog.refresh(self.api.as_ref(), &self.toasts).await;
        }
        registered
    }

    pub async fn registered_roster(
        &self,
        event_id: i64,
    ) -> Option<Vec<FamilyGroup<RegisteredParishioner>>> {
        match self.api.registered_parishioners(event_id).await {
            Ok(people) => Some(group_by_family(&people)),
            Err(e) => {
                warn!(event_id, error = %e, "Roster fetch failed");
                self.toasts
                    .error(e.user_message("Failed to fetch registered parishioners"));
                None
            }
        }
    }

    /// Re-issues a receipt from the roster.
    pub async fn redownload_receipt(&self, receipt_number: Option<&str>) -> bool {
        let Some(number) = receipt_number.filter(|n| !n.trim().is_empty()) else {
            self.toasts
                .error("Receipt number not available for this registration");
            return false;
        };

        match self.api.fetch_receipt(number).await {
            Ok(receipt) if self.receipts.generate(&receipt) => {
                self.toasts.success("Receipt downloaded successfully!");
                true
            }
            Ok(_) => {
                self.toasts.error("Failed to generate receipt PDF");
                false
            }
            Err(e) => {
                warn!(receipt_number = number, error = %e, "Receipt fetch failed");
                self.toasts.error("Failed to download receipt");
                false
            }
        }
    }
}
