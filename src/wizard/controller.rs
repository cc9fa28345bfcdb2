// ABOUTME: Wizard controller that drives navigation, step-view lifecycle and submission
// Translates user intent into state manager calls and keeps the navigation model current

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::data::{StepData, TemplatePayload};
use super::error::WizardError;
use super::events::{ListenerId, WizardEvent, WizardEventKind};
use super::state::{WizardState, WizardStateManager};
use super::step::LogicalStep;
use crate::api::{submit_with_timeout, SubmissionError, TemplateStore};

/// Per-step UI collaborator
pub trait StepView {
    /// Logical step this view captures
    fn step(&self) -> LogicalStep;

    /// Handle a key press; completion is reported through `ctx.complete()`
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut StepContext<'_>);

    fn render(&self, frame: &mut Frame, area: Rect, state: &WizardState);

    /// Release anything the view holds before it is swapped out
    fn destroy(&mut self) {}
}

/// Builds the step-view for a logical step
pub trait StepViewFactory {
    fn create(&mut self, step: LogicalStep, state: &WizardState) -> Option<Box<dyn StepView>>;
}

/// Scoped access a step-view gets to the wizard while handling input
pub struct StepContext<'a> {
    manager: &'a mut WizardStateManager,
    step: LogicalStep,
    step_number: usize,
    completed: bool,
}

impl<'a> StepContext<'a> {
    pub fn new(manager: &'a mut WizardStateManager, step: LogicalStep, step_number: usize) -> Self {
        Self {
            manager,
            step,
            step_number,
            completed: false,
        }
    }

    pub fn state(&self) -> &WizardState {
        self.manager.state()
    }

    pub fn step_number(&self) -> usize {
        self.step_number
    }

    /// Write this step's payload; data for any other step is rejected
    pub fn write(&mut self, data: StepData) -> bool {
        if data.step() != self.step {
            warn!(expected = %self.step, got = %data.step(), "Step view wrote data for another step");
            return false;
        }
        self.manager.update_step_data(data)
    }

    /// Report that the step is done
    pub fn complete(&mut self) {
        self.completed = true;
    }

    /// Record a validation or internal failure against this step
    pub fn fail(&mut self, message: impl Into<String>) {
        self.manager.set_step_error(self.step_number, message);
    }

    pub fn clear_error(&mut self) {
        self.manager.clear_step_error(self.step_number);
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

/// User answer to the cancel prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepIndicator {
    pub number: usize,
    pub step: LogicalStep,
    pub state: IndicatorState,
}

/// Everything the shell needs to draw progress and navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationModel {
    pub current_step: usize,
    pub total_steps: usize,
    pub indicators: Vec<StepIndicator>,
    pub progress_percent: u16,
    pub back_enabled: bool,
    pub next_enabled: bool,
    pub next_label: &'static str,
    pub submitting: bool,
    pub error: Option<String>,
}

impl NavigationModel {
    fn build(manager: &WizardStateManager, submitting: bool) -> Self {
        let state = manager.state();
        let current = state.current_step();
        let total = state.total_steps();

        let indicators = LogicalStep::sequence(total)
            .iter()
            .enumerate()
            .map(|(idx, step)| {
                let number = idx + 1;
                let indicator_state = if number == current && !state.is_terminal() {
                    IndicatorState::Current
                } else if state.is_step_completed(number) {
                    IndicatorState::Completed
                } else {
                    IndicatorState::Upcoming
                };
                StepIndicator {
                    number,
                    step: *step,
                    state: indicator_state,
                }
            })
            .collect();

        Self {
            current_step: current,
            total_steps: total,
            indicators,
            progress_percent: progress_percent(current, total),
            back_enabled: state.can_go_back() && !submitting,
            next_enabled: manager.can_proceed_to_next_step() && !submitting,
            next_label: if state.is_final_step() { "Complete" } else { "Next" },
            submitting,
            error: state.step_error(current).map(str::to_string),
        }
    }
}

/// `(current - 1) / (total - 1) * 100`, clamped to 0..=100
pub fn progress_percent(current_step: usize, total_steps: usize) -> u16 {
    if total_steps <= 1 {
        return 100;
    }
    let done = current_step.saturating_sub(1).min(total_steps - 1);
    u16::try_from(done * 100 / (total_steps - 1)).unwrap_or(100)
}

/// Payload handed out when the final step is submitted; consumed by exactly one finish
#[derive(Debug)]
pub struct SubmissionTicket {
    generation: u64,
    payload: TemplatePayload,
}

impl SubmissionTicket {
    pub fn payload(&self) -> &TemplatePayload {
        &self.payload
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of asking the controller to move forward
#[derive(Debug)]
pub enum NextOutcome {
    /// The view handled input without finishing its step
    Idle,
    Advanced,
    Blocked,
    /// Final step: the caller must submit the ticket and report back
    Submit(SubmissionTicket),
}

/// What a completed navigation or submission did to the wizard
#[derive(Debug, PartialEq, Eq)]
pub enum Transition {
    Advanced,
    Blocked,
    Completed(String),
    SubmissionFailed(SubmissionError),
    /// Response belonged to a session that was reset or closed meanwhile
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PendingRender {
    None,
    Navigation,
    Step,
}

/// Drives the wizard view for one session
pub struct WizardController<S, F> {
    manager: WizardStateManager,
    store: S,
    views: F,
    active_view: Option<Box<dyn StepView>>,
    navigation: NavigationModel,
    pending: Rc<Cell<PendingRender>>,
    listener_ids: Vec<ListenerId>,
    submitting: bool,
    generation: u64,
    submit_timeout: Duration,
}

impl<S, F> WizardController<S, F>
where
    F: StepViewFactory,
{
    pub fn new(store: S, views: F, submit_timeout: Duration) -> Self {
        let mut manager = WizardStateManager::new();
        let pending = Rc::new(Cell::new(PendingRender::None));

        let wiring = [
            (WizardEventKind::StepChanged, PendingRender::Step),
            (WizardEventKind::WizardCompleted, PendingRender::Step),
            (WizardEventKind::WizardCancelled, PendingRender::Step),
            (WizardEventKind::StepDataUpdated, PendingRender::Navigation),
        ];
        let listener_ids = wiring
            .into_iter()
            .map(|(kind, render)| {
                let pending = Rc::clone(&pending);
                manager.add_event_listener(kind, move |_| pending.set(pending.get().max(render)))
            })
            .collect();

        let navigation = NavigationModel::build(&manager, false);
        Self {
            manager,
            store,
            views,
            active_view: None,
            navigation,
            pending,
            listener_ids,
            submitting: false,
            generation: 0,
            submit_timeout,
        }
    }

    pub fn state(&self) -> &WizardState {
        self.manager.state()
    }

    pub fn navigation(&self) -> &NavigationModel {
        &self.navigation
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_timeout(&self) -> Duration {
        self.submit_timeout
    }

    pub fn active_step(&self) -> Option<LogicalStep> {
        self.active_view.as_ref().map(|v| v.step())
    }

    pub fn step_title(&self, step_number: usize) -> Option<&'static str> {
        self.manager.step_title(step_number)
    }

    pub fn step_description(&self, step_number: usize) -> Option<&'static str> {
        self.manager.step_description(step_number)
    }

    /// Subscribe the hosting page to wizard events
    pub fn subscribe(
        &mut self,
        kind: WizardEventKind,
        handler: impl FnMut(&WizardEvent) + 'static,
    ) -> ListenerId {
        self.manager.add_event_listener(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.manager.remove_event_listener(id)
    }

    /// Recompute navigation and swap in the view for the current step
    pub fn load_current_step(&mut self) -> Result<(), WizardError> {
        self.pending.set(PendingRender::None);
        self.refresh_navigation();

        if let Some(mut view) = self.active_view.take() {
            debug!(step = %view.step(), "Destroying step view");
            view.destroy();
        }

        let state = self.manager.state();
        if state.is_terminal() {
            return Ok(());
        }
        let Some(step) = state.current_logical_step() else {
            return Ok(());
        };

        let view = self
            .views
            .create(step, self.manager.state())
            .ok_or(WizardError::MissingStepView(step))?;
        debug!(step = %step, number = state.current_step(), "Loaded step view");
        self.active_view = Some(view);
        Ok(())
    }

    pub fn refresh_navigation(&mut self) {
        self.navigation = NavigationModel::build(&self.manager, self.submitting);
    }

    /// Apply re-renders requested by state events since the last call
    pub fn sync(&mut self) -> Result<(), WizardError> {
        match self.pending.replace(PendingRender::None) {
            PendingRender::None => Ok(()),
            PendingRender::Navigation => {
                self.refresh_navigation();
                Ok(())
            }
            PendingRender::Step => self.load_current_step(),
        }
    }

    /// Forward a key press to the active step-view
    pub fn dispatch_key(&mut self, key: KeyEvent) -> Result<NextOutcome, WizardError> {
        if self.submitting {
            debug!("Ignoring step input while submission is in flight");
            return Ok(NextOutcome::Blocked);
        }
        let completed = {
            let Some(view) = self.active_view.as_mut() else {
                return Ok(NextOutcome::Blocked);
            };
            let step_number = self.manager.current_step();
            let mut ctx = StepContext::new(&mut self.manager, view.step(), step_number);
            view.handle_key(key, &mut ctx);
            ctx.is_completed()
        };

        self.sync()?;
        self.refresh_navigation();
        if completed {
            self.request_next()
        } else {
            Ok(NextOutcome::Idle)
        }
    }

    /// Record step data without a step-view, as a headless driver would
    pub fn record_step_data(&mut self, data: StepData) -> Result<bool, WizardError> {
        if self.submitting {
            debug!(step = %data.step(), "Ignoring step data while submission is in flight");
            return Ok(false);
        }
        let applied = self.manager.update_step_data(data);
        self.sync()?;
        Ok(applied)
    }

    /// Advance, or start the submission flow on the final step
    pub fn request_next(&mut self) -> Result<NextOutcome, WizardError> {
        let state = self.manager.state();
        if state.is_terminal() {
            return Ok(NextOutcome::Blocked);
        }

        if state.is_final_step() {
            return Ok(self
                .begin_submission()?
                .map_or(NextOutcome::Blocked, NextOutcome::Submit));
        }

        if self.manager.next_step() {
            self.sync()?;
            Ok(NextOutcome::Advanced)
        } else {
            self.refresh_navigation();
            Ok(NextOutcome::Blocked)
        }
    }

    pub fn handle_back(&mut self) -> Result<bool, WizardError> {
        if self.submitting {
            return Ok(false);
        }
        let moved = self.manager.previous_step();
        self.sync()?;
        Ok(moved)
    }

    /// Discard the session once the user has confirmed
    pub fn handle_cancel(&mut self, confirmation: Confirmation) -> Result<bool, WizardError> {
        if confirmation == Confirmation::Declined {
            debug!("Cancel declined");
            return Ok(false);
        }

        let cancelled = self.manager.mark_cancelled();
        if cancelled {
            self.submitting = false;
        }
        self.sync()?;
        self.refresh_navigation();
        Ok(cancelled)
    }

    /// Flatten the state and lock the complete control
    ///
    /// Returns `None` while a submission is in flight or when not on a submittable final step.
    pub fn begin_submission(&mut self) -> Result<Option<SubmissionTicket>, WizardError> {
        if self.submitting {
            debug!("Submission already in flight");
            return Ok(None);
        }

        let state = self.manager.state();
        if state.is_terminal() || !state.is_final_step() || !self.manager.can_proceed_to_next_step() {
            return Ok(None);
        }

        let payload = self.manager.template_data()?;
        let step = state.current_step();
        self.manager.clear_step_error(step);
        self.submitting = true;
        self.refresh_navigation();

        info!(name = %payload.name, generation = self.generation, "Submitting template");
        Ok(Some(SubmissionTicket {
            generation: self.generation,
            payload,
        }))
    }

    /// Apply the outcome of a submission started by [`Self::begin_submission`]
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<String, SubmissionError>,
    ) -> Result<Transition, WizardError> {
        if !self.submitting
            || ticket.generation != self.generation
            || self.manager.state().is_terminal()
        {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale submission response"
            );
            return Ok(Transition::Stale);
        }

        self.submitting = false;
        let transition = match result {
            Ok(result_id) => {
                self.manager.mark_completed(result_id.clone());
                Transition::Completed(result_id)
            }
            Err(e) => {
                let step = self.manager.total_steps();
                warn!(retryable = e.is_retryable(), "Submission failed: {}", e);
                self.manager.set_step_error(step, e.to_string());
                Transition::SubmissionFailed(e)
            }
        };

        self.sync()?;
        self.refresh_navigation();
        Ok(transition)
    }

    /// Start over; responses still in flight become stale
    pub fn reset(&mut self) -> Result<(), WizardError> {
        self.generation += 1;
        self.submitting = false;
        self.manager.reset();
        self.load_current_step()
    }

    pub fn render_step(&self, frame: &mut Frame, area: Rect) {
        if let Some(view) = &self.active_view {
            view.render(frame, area, self.manager.state());
        }
    }
}

impl<S, F> WizardController<S, F>
where
    S: TemplateStore,
    F: StepViewFactory,
{
    /// Move forward, submitting inline when on the final step
    pub async fn handle_next(&mut self) -> Result<Transition, WizardError> {
        match self.request_next()? {
            NextOutcome::Advanced => Ok(Transition::Advanced),
            NextOutcome::Idle | NextOutcome::Blocked => Ok(Transition::Blocked),
            NextOutcome::Submit(ticket) => self.submit(ticket).await,
        }
    }

    /// Submit the flattened template and record the outcome
    pub async fn complete_wizard(&mut self) -> Result<Transition, WizardError> {
        match self.begin_submission()? {
            Some(ticket) => self.submit(ticket).await,
            None => Ok(Transition::Blocked),
        }
    }

    async fn submit(&mut self, ticket: SubmissionTicket) -> Result<Transition, WizardError> {
        let result =
            submit_with_timeout(&self.store, ticket.payload.clone(), self.submit_timeout).await;
        self.finish_submission(ticket, result)
    }
}

impl<S, F> Drop for WizardController<S, F> {
    fn drop(&mut self) {
        if let Some(mut view) = self.active_view.take() {
            view.destroy();
        }
        for id in self.listener_ids.drain(..) {
            self.manager.remove_event_listener(id);
        }
    }
}
