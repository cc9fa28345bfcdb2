// ABOUTME: State management for the template upload wizard
// Tracks current step, per-step data, completion and error flags, and the terminal status

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use super::data::{flatten, StepData, TemplatePayload, UploadData};
use super::error::WizardError;
use super::events::{EventListeners, ListenerId, WizardEvent, WizardEventKind};
use super::step::{
    resolve_logical_step, total_steps_for, LogicalStep, STEPS_WITH_COMPONENT_DEFINITION,
};

/// Lifecycle status of one wizard session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    #[default]
    InProgress,
    Completed,
    Cancelled,
}

impl WizardStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Full wizard progress state
///
/// Only [`WizardStateManager`] mutates it; everything else reads it through `&WizardState`.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    current_step: usize,
    step_data: BTreeMap<LogicalStep, StepData>,
    step_completion: BTreeSet<usize>,
    step_errors: BTreeMap<usize, String>,
    status: WizardStatus,
    result_id: Option<String>,
}

impl WizardState {
    fn new() -> Self {
        Self {
            current_step: 1,
            step_data: BTreeMap::new(),
            step_completion: BTreeSet::new(),
            step_errors: BTreeMap::new(),
            status: WizardStatus::InProgress,
            result_id: None,
        }
    }

    /// Current step (1-indexed)
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Total steps for the current branch; provisional until the upload is known
    pub fn total_steps(&self) -> usize {
        self.upload().map_or(STEPS_WITH_COMPONENT_DEFINITION, |upload| {
            total_steps_for(upload.requires_component_definition())
        })
    }

    pub fn is_png_component_definition_required(&self) -> bool {
        self.upload()
            .is_some_and(UploadData::requires_component_definition)
    }

    pub fn current_logical_step(&self) -> Option<LogicalStep> {
        resolve_logical_step(self.current_step, self.total_steps())
    }

    pub fn logical_step_at(&self, step_number: usize) -> Option<LogicalStep> {
        resolve_logical_step(step_number, self.total_steps())
    }

    pub fn upload(&self) -> Option<&UploadData> {
        match self.step_data.get(&LogicalStep::Upload) {
            Some(StepData::Upload(upload)) => Some(upload),
            _ => None,
        }
    }

    pub fn step_data(&self, step: LogicalStep) -> Option<&StepData> {
        self.step_data.get(&step)
    }

    pub fn all_step_data(&self) -> &BTreeMap<LogicalStep, StepData> {
        &self.step_data
    }

    pub fn is_step_completed(&self, step_number: usize) -> bool {
        self.step_completion.contains(&step_number)
    }

    pub fn step_error(&self, step_number: usize) -> Option<&str> {
        self.step_errors.get(&step_number).map(String::as_str)
    }

    pub fn step_errors(&self) -> &BTreeMap<usize, String> {
        &self.step_errors
    }

    pub fn status(&self) -> WizardStatus {
        self.status
    }

    pub fn result_id(&self) -> Option<&str> {
        self.result_id.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check if we're on the final step
    pub fn is_final_step(&self) -> bool {
        self.current_step == self.total_steps()
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        !self.is_terminal() && self.current_step > 1
    }

    /// Validity predicate for one logical step
    pub fn is_step_valid(&self, step: LogicalStep) -> bool {
        match step {
            LogicalStep::Upload => self.upload().is_some_and(UploadData::is_acknowledged),
            LogicalStep::ComponentDefinition => matches!(
                self.step_data.get(&step),
                Some(StepData::ComponentDefinition(data)) if data.is_valid()
            ),
            LogicalStep::Metadata => matches!(
                self.step_data.get(&step),
                Some(StepData::Metadata(data)) if data.is_valid()
            ),
            // Review is possible once the payload can be built
            LogicalStep::Summary => self.template_data().is_ok(),
            LogicalStep::Completion => true,
        }
    }

    /// Flatten all step data into the persistence payload
    pub fn template_data(&self) -> Result<TemplatePayload, WizardError> {
        flatten(&self.step_data, self.is_png_component_definition_required())
    }
}

/// Sole owner and mutator of [`WizardState`]
///
/// Invalid transitions are no-ops that return `false`; they never panic or error.
#[derive(Debug)]
pub struct WizardStateManager {
    state: WizardState,
    listeners: EventListeners,
}

impl WizardStateManager {
    pub fn new() -> Self {
        Self {
            state: WizardState::new(),
            listeners: EventListeners::new(),
        }
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.state.total_steps()
    }

    pub fn is_png_component_definition_required(&self) -> bool {
        self.state.is_png_component_definition_required()
    }

    /// Title of the logical step shown at this number
    pub fn step_title(&self, step_number: usize) -> Option<&'static str> {
        self.state.logical_step_at(step_number).map(|s| s.title())
    }

    pub fn step_description(&self, step_number: usize) -> Option<&'static str> {
        self.state.logical_step_at(step_number).map(|s| s.description())
    }

    pub fn is_step_completed(&self, step_number: usize) -> bool {
        self.state.is_step_completed(step_number)
    }

    pub fn step_data(&self, step: LogicalStep) -> Option<&StepData> {
        self.state.step_data(step)
    }

    pub fn step_error(&self, step_number: usize) -> Option<&str> {
        self.state.step_error(step_number)
    }

    pub fn can_proceed_to_next_step(&self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state
            .current_logical_step()
            .is_some_and(|step| self.state.is_step_valid(step))
    }

    /// Move to next step if possible
    pub fn next_step(&mut self) -> bool {
        if !self.can_proceed_to_next_step() {
            debug!(step = self.state.current_step, "next_step ignored: step not valid");
            return false;
        }
        if self.state.is_final_step() {
            debug!(step = self.state.current_step, "next_step ignored: already on final step");
            return false;
        }

        let completed = self.state.current_step;
        self.state.step_completion.insert(completed);
        self.state.step_errors.remove(&completed);
        self.state.current_step += 1;

        debug!(from = completed, to = self.state.current_step, "Advanced wizard step");
        self.emit(WizardEvent::StepChanged {
            current_step: self.state.current_step,
        });
        true
    }

    /// Move to previous step
    pub fn previous_step(&mut self) -> bool {
        if !self.state.can_go_back() {
            return false;
        }

        self.state.current_step -= 1;
        self.emit(WizardEvent::StepChanged {
            current_step: self.state.current_step,
        });
        true
    }

    /// Store the data written by a step-view
    pub fn update_step_data(&mut self, data: StepData) -> bool {
        if self.state.is_terminal() {
            debug!(step = %data.step(), "Ignoring step data after wizard finished");
            return false;
        }

        let step = data.step();
        let previous_total = self.state.total_steps();
        let changes_branch = match &data {
            StepData::Upload(upload) => {
                total_steps_for(upload.requires_component_definition()) != previous_total
            }
            _ => false,
        };
        if changes_branch && self.state.current_step != 1 {
            debug!(
                step = self.state.current_step,
                "Ignoring upload that changes the branch outside step 1"
            );
            return false;
        }

        self.state.step_data.insert(step, data.clone());
        if changes_branch {
            self.apply_branch_change(previous_total);
        }

        self.emit(WizardEvent::StepDataUpdated { step, data });
        true
    }

    /// A different file class shifts every step after the upload, so all progress is dropped
    fn apply_branch_change(&mut self, previous_total: usize) {
        let total = self.state.total_steps();
        info!(previous_total, total, "Upload changed wizard branch");
        self.state.step_completion.clear();
        self.state.step_errors.retain(|n, _| *n < 2);
        if !self.state.is_png_component_definition_required() {
            self.state.step_data.remove(&LogicalStep::ComponentDefinition);
        }
    }

    pub fn set_step_error(&mut self, step_number: usize, message: impl Into<String>) {
        self.state.step_errors.insert(step_number, message.into());
    }

    pub fn clear_step_error(&mut self, step_number: usize) {
        self.state.step_errors.remove(&step_number);
    }

    /// Finish the session with the identifier returned by persistence
    pub fn mark_completed(&mut self, result_id: impl Into<String>) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        let result_id = result_id.into();
        let step = self.state.current_step;
        self.state.step_completion.insert(step);
        self.state.step_errors.remove(&step);
        self.state.status = WizardStatus::Completed;
        self.state.result_id = Some(result_id.clone());

        info!(%result_id, "Template wizard completed");
        self.emit(WizardEvent::WizardCompleted { result_id });
        true
    }

    pub fn mark_cancelled(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        self.state.status = WizardStatus::Cancelled;
        info!(step = self.state.current_step, "Template wizard cancelled");
        self.emit(WizardEvent::WizardCancelled);
        true
    }

    /// Start over from step 1; subscriptions survive
    pub fn reset(&mut self) {
        self.state = WizardState::new();
        debug!("Wizard state reset");
        self.emit(WizardEvent::StepChanged { current_step: 1 });
    }

    pub fn add_event_listener(
        &mut self,
        kind: WizardEventKind,
        handler: impl FnMut(&WizardEvent) + 'static,
    ) -> ListenerId {
        self.listeners.add(kind, handler)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn template_data(&self) -> Result<TemplatePayload, WizardError> {
        self.state.template_data()
    }

    fn emit(&mut self, event: WizardEvent) {
        self.listeners.emit(&event);
    }
}

impl Default for WizardStateManager {
    fn default() -> Self {
        Self::new()
    }
}
