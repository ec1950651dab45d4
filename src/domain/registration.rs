use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use super::event::Event;
use super::family::{filter_families, filter_groups, group_by_family, Family, FamilyGroup, Parishioner};

/// How many names the confirmation step lists before collapsing the rest.
pub const SUMMARY_NAME_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationMode {
    Family,
    Individual,
}

impl fmt::Display for RegistrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationMode::Family => f.write_str("family"),
            RegistrationMode::Individual => f.write_str("individual"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CandidatePool {
    Families(Vec<Family>),
    Individuals(Vec<Parishioner>),
}

impl CandidatePool {
    pub fn empty(mode: RegistrationMode) -> Self {
        match mode {
            RegistrationMode::Family => CandidatePool::Families(Vec::new()),
            RegistrationMode::Individual => CandidatePool::Individuals(Vec::new()),
        }
    }

    pub fn mode(&self) -> RegistrationMode {
        match self {
            CandidatePool::Families(_) => RegistrationMode::Family,
            CandidatePool::Individuals(_) => RegistrationMode::Individual,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CandidatePool::Families(f) => f.len(),
            CandidatePool::Individuals(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Family mode holds at most one family; individual mode holds unique parishioners.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionSet {
    Family(Option<Family>),
    Individuals(Vec<Parishioner>),
}

impl SelectionSet {
    pub fn empty(mode: RegistrationMode) -> Self {
        match mode {
            RegistrationMode::Family => SelectionSet::Family(None),
            RegistrationMode::Individual => SelectionSet::Individuals(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SelectionSet::Family(f) => f.is_none(),
            SelectionSet::Individuals(p) => p.is_empty(),
        }
    }

    pub fn total_members(&self) -> u32 {
        match self {
            SelectionSet::Family(Some(f)) => f.member_count,
            SelectionSet::Family(None) => 0,
            SelectionSet::Individuals(p) => p.len() as u32,
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        match self {
            SelectionSet::Family(f) => f.as_ref().is_some_and(|f| f.id == id),
            SelectionSet::Individuals(p) => p.iter().any(|p| p.id == id),
        }
    }

    pub fn parishioner_ids(&self) -> Vec<i64> {
        match self {
            SelectionSet::Family(_) => Vec::new(),
            SelectionSet::Individuals(p) => p.iter().map(|p| p.id).collect(),
        }
    }
}

/// Body of a registration POST. Exactly one shape is ever sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegistrationRequest {
    #[serde(rename_all = "camelCase")]
    Family { event_id: i64, family_id: i64 },
    #[serde(rename_all = "camelCase")]
    Individuals {
        event_id: i64,
        parishioner_ids: Vec<i64>,
    },
}

impl RegistrationRequest {
    pub fn event_id(&self) -> i64 {
        match self {
            RegistrationRequest::Family { event_id, .. }
            | RegistrationRequest::Individuals { event_id, .. } => *event_id,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            RegistrationRequest::Family { .. } => "api/events/register/family",
            RegistrationRequest::Individuals { .. } => "api/events/register/individuals",
        }
    }

    pub fn mode(&self) -> RegistrationMode {
        match self {
            RegistrationRequest::Family { .. } => RegistrationMode::Family,
            RegistrationRequest::Individuals { .. } => RegistrationMode::Individual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Closed,
    /// Candidate pool in flight; rows are not selectable yet.
    Loading,
    Browsing,
    Confirming,
    Submitting,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Closed => "closed",
            WorkflowState::Loading => "loading",
            WorkflowState::Browsing => "browsing",
            WorkflowState::Confirming => "confirming",
            WorkflowState::Submitting => "submitting",
        };
        f.write_str(name)
    }
}

/// Errors surfaced to the operator. The display text is the toast message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Cannot register for an event that has already ended")]
    EventEnded,

    #[error("Failed to fetch unregistered families")]
    FamiliesFetch,

    #[error("Failed to fetch unregistered individuals")]
    IndividualsFetch,

    #[error("Please select at least one item to register")]
    EmptySelection,

    #[error("{message}")]
    Submission { message: String },

    #[error("A registration is already being submitted")]
    Busy,

    #[error("Action not available while {state}")]
    InvalidState { state: WorkflowState },
}

impl WorkflowError {
    pub fn fetch_failed(mode: RegistrationMode) -> Self {
        match mode {
            RegistrationMode::Family => WorkflowError::FamiliesFetch,
            RegistrationMode::Individual => WorkflowError::IndividualsFetch,
        }
    }

    pub fn submission(server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Failed to complete registration".to_string());
        WorkflowError::Submission { message }
    }

    /// Validation problems are warnings; everything else is an error toast.
    pub fn is_warning(&self) -> bool {
        matches!(self, WorkflowError::EmptySelection)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationSummary {
    pub event_title: String,
    pub event_when: String,
    pub mode: RegistrationMode,
    /// Family head with member count, or up to five individual names.
    pub names: Vec<String>,
    pub hidden_names: usize,
    pub total_members: u32,
    pub per_person_fee: f64,
    pub total_fee: f64,
}

impl ConfirmationSummary {
    pub fn more_label(&self) -> Option<String> {
        (self.hidden_names > 0).then(|| format!("...and {} more", self.hidden_names))
    }

    pub fn is_free(&self) -> bool {
        self.per_person_fee <= 0.0
    }
}

/// State of one registration dialog, from opening through submission.
#[derive(Debug, Clone)]
pub struct RegistrationWorkflow {
    state: WorkflowState,
    mode: RegistrationMode,
    event: Option<Event>,
    pool: CandidatePool,
    selection: SelectionSet,
    search: String,
    collapsed: HashSet<i64>,
}

impl Default for RegistrationWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWorkflow {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Closed,
            mode: RegistrationMode::Family,
            event: None,
            pool: CandidatePool::empty(RegistrationMode::Family),
            selection: SelectionSet::empty(RegistrationMode::Family),
            search: String::new(),
            collapsed: HashSet::new(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn mode(&self) -> RegistrationMode {
        self.mode
    }

    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_open(&self) -> bool {
        self.state != WorkflowState::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.state == WorkflowState::Submitting
    }

    /// Opens the dialog for an event. Ended events are refused without any change.
    pub fn begin(
        &mut self,
        event: &Event,
        mode: RegistrationMode,
        now: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        if self.is_submitting() {
            return Err(WorkflowError::Busy);
        }
        if event.has_ended(now) {
            return Err(WorkflowError::EventEnded);
        }

        self.reset();
        self.state = WorkflowState::Loading;
        self.mode = mode;
        self.event = Some(event.clone());
        self.pool = CandidatePool::empty(mode);
        self.selection = SelectionSet::empty(mode);
        Ok(())
    }

    /// Applies a fetched pool. Responses for another event or mode are stale and dropped.
    pub fn candidates_loaded(&mut self, event_id: i64, pool: CandidatePool) -> bool {
        let current = self.event.as_ref().map(|e| e.id);
        if current != Some(event_id) || pool.mode() != self.mode {
            return false;
        }
        match self.state {
            WorkflowState::Loading => {
                self.pool = pool;
                self.state = WorkflowState::Browsing;
                true
            }
            WorkflowState::Browsing => {
                self.pool = pool;
                true
            }
            _ => false,
        }
    }

    /// A failed initial fetch closes the dialog; a failed refresh keeps the old pool.
    /// Failures for a closed dialog or another event report nothing.
    pub fn candidates_failed(&mut self, event_id: i64) -> Option<WorkflowError> {
        if self.event.as_ref().map(|e| e.id) != Some(event_id) {
            return None;
        }
        let error = WorkflowError::fetch_failed(self.mode);
        match self.state {
            WorkflowState::Closed => return None,
            WorkflowState::Loading => self.reset(),
            _ => {}
        }
        Some(error)
    }

    /// Family mode: radio semantics, the new family replaces any prior one.
    pub fn select_family(&mut self, family_id: i64) -> bool {
        if self.state != WorkflowState::Browsing {
            return false;
        }
        let CandidatePool::Families(families) = &self.pool else {
            return false;
        };
        match families.iter().find(|f| f.id == family_id) {
            Some(family) => {
                self.selection = SelectionSet::Family(Some(family.clone()));
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        if matches!(self.state, WorkflowState::Browsing | WorkflowState::Loading) {
            self.selection = SelectionSet::empty(self.mode);
        }
    }

    /// Individual mode: adding an id already present leaves the set unchanged.
    pub fn set_individual_selected(&mut self, parishioner_id: i64, selected: bool) -> bool {
        if self.state != WorkflowState::Browsing {
            return false;
        }
        let CandidatePool::Individuals(pool) = &self.pool else {
            return false;
        };
        let SelectionSet::Individuals(chosen) = &mut self.selection else {
            return false;
        };

        let present = chosen.iter().any(|p| p.id == parishioner_id);
        match (selected, present) {
            (true, false) => match pool.iter().find(|p| p.id == parishioner_id) {
                Some(p) => {
                    chosen.push(p.clone());
                    true
                }
                None => false,
            },
            (false, true) => {
                chosen.retain(|p| p.id != parishioner_id);
                true
            }
            _ => false,
        }
    }

    pub fn toggle_individual(&mut self, parishioner_id: i64) -> bool {
        let selected = self.selection.contains(parishioner_id);
        self.set_individual_selected(parishioner_id, !selected)
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selection.contains(id)
    }

    pub fn total_members(&self) -> u32 {
        self.selection.total_members()
    }

    pub fn total_fee(&self) -> f64 {
        self.event
            .as_ref()
            .map(|e| e.fee_for(self.total_members()))
            .unwrap_or(0.0)
    }

    pub fn can_register(&self) -> bool {
        self.state == WorkflowState::Browsing && !self.selection.is_empty()
    }

    pub fn request_confirmation(&mut self) -> Result<(), WorkflowError> {
        if self.state != WorkflowState::Browsing {
            return Err(WorkflowError::InvalidState { state: self.state });
        }
        if self.selection.is_empty() {
            return Err(WorkflowError::EmptySelection);
        }
        self.state = WorkflowState::Confirming;
        Ok(())
    }

    /// Escape, backdrop and Cancel all land here. Ignored mid-submission.
    pub fn cancel_confirmation(&mut self) -> bool {
        if self.state != WorkflowState::Confirming {
            return false;
        }
        self.state = WorkflowState::Browsing;
        true
    }

    /// Moves to Submitting and returns the one payload to POST.
    pub fn begin_submit(&mut self) -> Result<RegistrationRequest, WorkflowError> {
        match self.state {
            WorkflowState::Confirming => {}
            WorkflowState::Submitting => return Err(WorkflowError::Busy),
            state => return Err(WorkflowError::InvalidState { state }),
        }
        let event_id = self
            .event
            .as_ref()
            .map(|e| e.id)
            .ok_or(WorkflowError::InvalidState { state: self.state })?;

        let request = match &self.selection {
            SelectionSet::Family(Some(family)) => RegistrationRequest::Family {
                event_id,
                family_id: family.id,
            },
            SelectionSet::Individuals(chosen) if !chosen.is_empty() => {
                RegistrationRequest::Individuals {
                    event_id,
                    parishioner_ids: self.selection.parishioner_ids(),
                }
            }
            _ => return Err(WorkflowError::EmptySelection),
        };

        self.state = WorkflowState::Submitting;
        Ok(request)
    }

    pub fn submit_succeeded(&mut self) {
        if self.state == WorkflowState::Submitting {
            self.selection = SelectionSet::empty(self.mode);
            self.state = WorkflowState::Browsing;
        }
    }

    /// Back to Browsing with the selection intact so the operator can retry.
    pub fn submit_failed(&mut self, server_message: Option<String>) -> WorkflowError {
        if self.state == WorkflowState::Submitting {
            self.state = WorkflowState::Browsing;
        }
        WorkflowError::submission(server_message)
    }

    /// Clears everything. Refused while a submission is in flight.
    pub fn close(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.state = WorkflowState::Closed;
        self.event = None;
        self.pool = CandidatePool::empty(self.mode);
        self.selection = SelectionSet::empty(self.mode);
        self.search.clear();
        self.collapsed.clear();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn visible_families(&self) -> Vec<Family> {
        match &self.pool {
            CandidatePool::Families(families) => filter_families(families, &self.search),
            CandidatePool::Individuals(_) => Vec::new(),
        }
    }

    pub fn visible_groups(&self) -> Vec<FamilyGroup<Parishioner>> {
        match &self.pool {
            CandidatePool::Individuals(people) => {
                filter_groups(&group_by_family(people), &self.search)
            }
            CandidatePool::Families(_) => Vec::new(),
        }
    }

    /// Groups start expanded.
    pub fn is_family_expanded(&self, family_id: i64) -> bool {
        !self.collapsed.contains(&family_id)
    }

    pub fn toggle_family_expanded(&mut self, family_id: i64) {
        if !self.collapsed.remove(&family_id) {
            self.collapsed.insert(family_id);
        }
    }

    pub fn confirmation_summary(&self) -> Option<ConfirmationSummary> {
        let event = self.event.as_ref()?;
        if self.selection.is_empty() {
            return None;
        }

        let (names, hidden_names) = match &self.selection {
            SelectionSet::Family(Some(family)) => (
                vec![format!(
                    "{} ({} members)",
                    family.head_of_family, family.member_count
                )],
                0,
            ),
            SelectionSet::Individuals(chosen) => (
                chosen
                    .iter()
                    .take(SUMMARY_NAME_LIMIT)
                    .map(|p| p.name.clone())
                    .collect(),
                chosen.len().saturating_sub(SUMMARY_NAME_LIMIT),
            ),
            SelectionSet::Family(None) => return None,
        };

        let when = match event.start_time {
            Some(_) => format!("{} at {}", event.date_label(), event.time_label()),
            None => event.date_label(),
        };

        Some(ConfirmationSummary {
            event_title: event.title.clone(),
            event_when: when,
            mode: self.mode,
            names,
            hidden_names,
            total_members: self.total_members(),
            per_person_fee: event.registration_fees,
            total_fee: self.total_fee(),
        })
    }
}
