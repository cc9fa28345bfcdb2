// ABOUTME: Application state for the terminal wizard host
// Owns the controller, the cancel dialog and the channel that brings submission results back

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::events::AppEvent;
use crate::api::{submit_with_timeout, SubmissionError, TemplateApiClient};
use crate::components::{
    ConfirmationDialog, ConfirmationDialogComponent, TerminalStepViews, WizardShell,
};
use crate::config::AppConfig;
use crate::wizard::{
    NextOutcome, SubmissionTicket, Transition, WizardController, WizardEvent, WizardEventKind,
};

type SubmissionReport = (SubmissionTicket, Result<String, SubmissionError>);

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Open cancel prompt, if any
    pub confirmation_dialog: Option<ConfirmationDialog>,
    /// Ask before cancelling
    pub confirm_cancel: bool,
    /// Wizard reached a terminal status
    pub wizard_finished: bool,
    pub should_quit: bool,
    /// Last message from the wizard, shown after it finishes
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(confirm_cancel: bool) -> Self {
        Self {
            confirm_cancel,
            ..Self::default()
        }
    }
}

pub struct App {
    pub state: AppState,
    controller: WizardController<TemplateApiClient, TerminalStepViews>,
    shell: WizardShell,
    dialog_component: ConfirmationDialogComponent,
    outcomes: Rc<RefCell<Vec<WizardEvent>>>,
    results_tx: mpsc::UnboundedSender<SubmissionReport>,
    results_rx: mpsc::UnboundedReceiver<SubmissionReport>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = TemplateApiClient::new(&config.api)?;
        let views = TerminalStepViews::new(config.categories.clone());
        let mut controller = WizardController::new(store, views, config.api.submit_timeout());

        // The host only cares about how the session ended
        let outcomes = Rc::new(RefCell::new(Vec::new()));
        for kind in [WizardEventKind::WizardCompleted, WizardEventKind::WizardCancelled] {
            let outcomes = Rc::clone(&outcomes);
            controller.subscribe(kind, move |event| outcomes.borrow_mut().push(event.clone()));
        }

        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Ok(Self {
            state: AppState::new(config.ui.confirm_cancel),
            controller,
            shell: WizardShell::new(config.ui.show_descriptions),
            dialog_component: ConfirmationDialogComponent::new(),
            outcomes,
            results_tx,
            results_rx,
        })
    }

    /// Load the first step-view
    pub fn init(&mut self) -> Result<()> {
        self.controller.load_current_step()?;
        info!(
            total_steps = self.controller.state().total_steps(),
            "Template wizard started"
        );
        Ok(())
    }

    pub fn controller(&self) -> &WizardController<TemplateApiClient, TerminalStepViews> {
        &self.controller
    }

    pub fn handle_app_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Quit => self.state.should_quit = true,
            AppEvent::Next => {
                let outcome = self.controller.request_next()?;
                self.handle_outcome(outcome);
            }
            AppEvent::Back => {
                self.controller.handle_back()?;
            }
            AppEvent::RequestCancel => {
                if self.state.confirm_cancel {
                    self.state.confirmation_dialog = Some(ConfirmationDialog::cancel_wizard());
                } else {
                    self.controller.handle_cancel(true.into())?;
                }
            }
            AppEvent::CancelAnswered(confirmation) => {
                self.state.confirmation_dialog = None;
                self.controller.handle_cancel(confirmation)?;
            }
            AppEvent::Reset => {
                self.state.notice = None;
                self.controller.reset()?;
            }
            AppEvent::StepInput(key) => {
                let outcome = self.controller.dispatch_key(key)?;
                self.handle_outcome(outcome);
            }
        }
        self.drain_outcomes();
        Ok(())
    }

    fn handle_outcome(&mut self, outcome: NextOutcome) {
        if let NextOutcome::Submit(ticket) = outcome {
            self.start_submission(ticket);
        }
    }

    /// Run the save in the background; the result comes back through [`Self::poll_submissions`]
    fn start_submission(&self, ticket: SubmissionTicket) {
        let store = self.controller.store().clone();
        let timeout = self.controller.submit_timeout();
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let result = submit_with_timeout(&store, ticket.payload().clone(), timeout).await;
            if tx.send((ticket, result)).is_err() {
                warn!("Submission finished after the app closed");
            }
        });
    }

    /// Apply any submission results that arrived since the last tick
    pub fn poll_submissions(&mut self) -> Result<()> {
        while let Ok((ticket, result)) = self.results_rx.try_recv() {
            match self.controller.finish_submission(ticket, result)? {
                Transition::SubmissionFailed(e) => {
                    warn!(retryable = e.is_retryable(), "Template was not saved");
                }
                Transition::Stale => {}
                other => info!(?other, "Submission settled"),
            }
        }
        self.drain_outcomes();
        Ok(())
    }

    fn drain_outcomes(&mut self) {
        for event in self.outcomes.borrow_mut().drain(..) {
            self.state.notice = Some(match event {
                WizardEvent::WizardCompleted { result_id } => {
                    info!(%result_id, "Template saved");
                    format!("Template saved with id {result_id}")
                }
                _ => {
                    info!("Template wizard cancelled");
                    "Template wizard cancelled".to_string()
                }
            });
        }
        self.state.wizard_finished = self.controller.state().is_terminal();
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();
        let step_area = self.shell.render(
            frame,
            area,
            self.controller.navigation(),
            self.controller.state(),
        );
        self.controller.render_step(frame, step_area);

        if let Some(dialog) = &self.state.confirmation_dialog {
            self.dialog_component.render(frame, area, dialog);
        }
    }
}
