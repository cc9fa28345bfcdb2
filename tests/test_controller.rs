// ABOUTME: Tests for the wizard controller: step-view lifecycle, navigation model, cancel and submission

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::{layout::Rect, Frame};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use template_wizard::api::{parse_create_response, SubmissionError, TemplateStore};
use template_wizard::wizard::{
    CompletionData, ComponentDefinitionData, ComponentKind, ComponentRegion, Confirmation,
    LogicalStep,
    MetadataData, NextOutcome, StepContext, StepData, StepView, StepViewFactory,
    TemplatePayload, Transition, UploadData, WizardController, WizardError, WizardState,
    WizardStatus,
};

/// Store that answers every submission with the same canned result
#[derive(Clone)]
struct CannedStore {
    response: Result<String, SubmissionError>,
    delay: Duration,
    received: std::sync::Arc<std::sync::Mutex<Vec<TemplatePayload>>>,
}

impl CannedStore {
    fn new(response: Result<String, SubmissionError>) -> Self {
        Self {
            response,
            delay: Duration::ZERO,
            received: Default::default(),
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(Ok("tpl_slow".to_string()))
        }
    }

    fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl TemplateStore for CannedStore {
    async fn create_template(&self, payload: TemplatePayload) -> Result<String, SubmissionError> {
        self.received.lock().unwrap().push(payload);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.clone()
    }
}

type Journal = Rc<RefCell<Vec<String>>>;

/// View that writes a fixed payload and completes on Enter
struct FixtureView {
    step: LogicalStep,
    data: Option<StepData>,
    journal: Journal,
}

impl StepView for FixtureView {
    fn step(&self) -> LogicalStep {
        self.step
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut StepContext<'_>) {
        if key.code != KeyCode::Enter {
            return;
        }
        if let Some(data) = self.data.clone() {
            ctx.write(data);
        }
        ctx.complete();
    }

    fn render(&self, _frame: &mut Frame, _area: Rect, _state: &WizardState) {}

    fn destroy(&mut self) {
        self.journal.borrow_mut().push(format!("destroy {}", self.step));
    }
}

struct FixtureViews {
    journal: Journal,
    missing: Option<LogicalStep>,
}

impl FixtureViews {
    fn new() -> (Self, Journal) {
        let journal = Journal::default();
        (
            Self {
                journal: Rc::clone(&journal),
                missing: None,
            },
            journal,
        )
    }
}

impl StepViewFactory for FixtureViews {
    fn create(&mut self, step: LogicalStep, _state: &WizardState) -> Option<Box<dyn StepView>> {
        if self.missing == Some(step) {
            return None;
        }
        self.journal.borrow_mut().push(format!("create {step}"));
        let data = match step {
            LogicalStep::Upload => Some(upload("hero.png")),
            LogicalStep::ComponentDefinition => Some(regions()),
            LogicalStep::Metadata => Some(metadata()),
            LogicalStep::Summary | LogicalStep::Completion => None,
        };
        Some(Box::new(FixtureView {
            step,
            data,
            journal: Rc::clone(&self.journal),
        }))
    }
}

fn upload(file_name: &str) -> StepData {
    StepData::Upload(UploadData {
        file_name: file_name.to_string(),
        mime_type: String::new(),
        size_bytes: 512,
        preview_image_url: Some(format!("https://cdn.test/{file_name}")),
    })
}

fn regions() -> StepData {
    StepData::ComponentDefinition(ComponentDefinitionData {
        regions: vec![ComponentRegion::new(
            ComponentKind::Banner,
            "Hero",
            (0, 0, 800, 300),
        )],
    })
}

fn metadata() -> StepData {
    StepData::Metadata(MetadataData {
        name: "Launch".to_string(),
        description: String::new(),
        category_id: Some("product".to_string()),
        tags: Vec::new(),
    })
}

fn enter() -> KeyEvent {
    KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
}

fn controller(store: CannedStore) -> (WizardController<CannedStore, FixtureViews>, Journal) {
    let (views, journal) = FixtureViews::new();
    let mut controller = WizardController::new(store, views, Duration::from_secs(5));
    controller.load_current_step().unwrap();
    (controller, journal)
}

/// Drive a PNG session to the final step through the step-views
fn to_final_step(controller: &mut WizardController<CannedStore, FixtureViews>) {
    for _ in 0..4 {
        let outcome = controller.dispatch_key(enter()).unwrap();
        assert!(matches!(outcome, NextOutcome::Advanced), "got {outcome:?}");
    }
    assert_eq!(controller.state().current_step(), 5);
    assert_eq!(controller.active_step(), Some(LogicalStep::Completion));
}

#[test]
fn test_step_views_are_destroyed_before_replacement() {
    let (mut controller, journal) = controller(CannedStore::new(Ok("tpl".to_string())));
    controller.dispatch_key(enter()).unwrap();

    assert_eq!(
        *journal.borrow(),
        vec!["create upload", "destroy upload", "create componentDefinition"]
    );
    assert_eq!(controller.active_step(), Some(LogicalStep::ComponentDefinition));
}

#[test]
fn test_navigation_model_tracks_steps() {
    let (mut controller, _) = controller(CannedStore::new(Ok("tpl".to_string())));
    assert!(!controller.navigation().back_enabled);
    assert!(!controller.navigation().next_enabled);

    controller.dispatch_key(enter()).unwrap();
    let nav = controller.navigation();
    assert_eq!(nav.current_step, 2);
    assert_eq!(nav.total_steps, 5);
    assert_eq!(nav.progress_percent, 25);
    assert!(nav.back_enabled);
    assert!(!nav.next_enabled);
    assert_eq!(nav.next_label, "Next");

    to_final_step_from_two(&mut controller);
    let nav = controller.navigation();
    assert_eq!(nav.progress_percent, 100);
    assert_eq!(nav.next_label, "Complete");
    assert!(nav.next_enabled);
}

fn to_final_step_from_two(controller: &mut WizardController<CannedStore, FixtureViews>) {
    for _ in 0..3 {
        controller.dispatch_key(enter()).unwrap();
    }
}

#[test]
fn test_back_reloads_previous_view() {
    let (mut controller, _) = controller(CannedStore::new(Ok("tpl".to_string())));
    controller.dispatch_key(enter()).unwrap();

    assert!(controller.handle_back().unwrap());
    assert_eq!(controller.active_step(), Some(LogicalStep::Upload));
    assert!(controller.state().is_step_completed(1));
    assert!(!controller.handle_back().unwrap());
}

#[tokio::test]
async fn test_successful_submission_completes_wizard() {
    let store = CannedStore::new(Ok("tpl_42".to_string()));
    let (mut controller, _) = controller(store.clone());
    to_final_step(&mut controller);

    let transition = controller.handle_next().await.unwrap();

    assert_eq!(transition, Transition::Completed("tpl_42".to_string()));
    assert_eq!(controller.state().status(), WizardStatus::Completed);
    assert_eq!(controller.state().result_id(), Some("tpl_42"));
    assert_eq!(controller.active_step(), None);
    assert_eq!(store.calls(), 1);
    assert_eq!(store.received.lock().unwrap()[0].components.len(), 1);
}

#[tokio::test]
async fn test_server_error_is_recorded_on_final_step() {
    let failure = parse_create_response(500, r#"{"message":"DB unavailable"}"#);
    let (mut controller, _) = controller(CannedStore::new(failure));
    to_final_step(&mut controller);

    let transition = controller.complete_wizard().await.unwrap();

    assert!(matches!(
        transition,
        Transition::SubmissionFailed(SubmissionError::Server { status: 500, .. })
    ));
    let state = controller.state();
    assert_eq!(state.step_error(state.total_steps()), Some("DB unavailable"));
    assert_eq!(state.status(), WizardStatus::InProgress);
    assert_eq!(state.current_step(), 5);

    let nav = controller.navigation();
    assert!(nav.next_enabled);
    assert!(!nav.submitting);
    assert_eq!(nav.error.as_deref(), Some("DB unavailable"));
}

#[tokio::test]
async fn test_submission_timeout_is_retryable() {
    let (views, _) = FixtureViews::new();
    let store = CannedStore::slow(Duration::from_secs(30));
    let mut controller = WizardController::new(store, views, Duration::from_millis(20));
    controller.load_current_step().unwrap();
    to_final_step(&mut controller);

    let transition = controller.handle_next().await.unwrap();

    match transition {
        Transition::SubmissionFailed(e) => {
            assert!(matches!(e, SubmissionError::Timeout(_)));
            assert!(e.is_retryable());
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(controller.state().status(), WizardStatus::InProgress);
    assert!(!controller.is_submitting());
}

#[test]
fn test_second_submission_blocked_while_in_flight() {
    let (mut controller, _) = controller(CannedStore::new(Ok("tpl".to_string())));
    to_final_step(&mut controller);

    let first = controller.begin_submission().unwrap();
    assert!(first.is_some());
    assert!(controller.is_submitting());
    assert!(!controller.navigation().next_enabled);
    assert!(!controller.navigation().back_enabled);

    assert!(controller.begin_submission().unwrap().is_none());
    assert!(matches!(controller.request_next().unwrap(), NextOutcome::Blocked));
    assert!(!controller.handle_back().unwrap());
}

#[test]
fn test_step_data_frozen_while_submitting() {
    let (mut controller, _) = controller(CannedStore::new(Ok("tpl".to_string())));
    to_final_step(&mut controller);

    let ticket = controller.begin_submission().unwrap().unwrap();
    let sent_status = ticket.payload().status;
    let before = controller.state().clone();

    assert!(!controller
        .record_step_data(StepData::Completion(CompletionData { publish: true }))
        .unwrap());
    assert!(matches!(controller.dispatch_key(enter()).unwrap(), NextOutcome::Blocked));
    assert_eq!(controller.state(), &before);

    let transition = controller
        .finish_submission(ticket, Ok("tpl_7".to_string()))
        .unwrap();
    assert_eq!(transition, Transition::Completed("tpl_7".to_string()));
    assert_eq!(controller.state().template_data().unwrap().status, sent_status);
}

#[test]
fn test_failed_submission_reported_once_then_retried() {
    let (mut controller, _) = controller(CannedStore::new(Ok("tpl".to_string())));
    to_final_step(&mut controller);

    let first = controller.begin_submission().unwrap().unwrap();
    let failure = SubmissionError::Server {
        status: 503,
        message: "Try again".to_string(),
    };
    let transition = controller.finish_submission(first, Err(failure)).unwrap();
    assert!(matches!(transition, Transition::SubmissionFailed(_)));
    assert!(!controller.is_submitting());
    assert_eq!(controller.state().step_error(5), Some("Try again"));

    // Editing is allowed again once the failure is reported
    assert!(controller
        .record_step_data(StepData::Completion(CompletionData { publish: true }))
        .unwrap());

    let retry = controller.begin_submission().unwrap().unwrap();
    assert_eq!(controller.state().step_error(5), None);
    let transition = controller
        .finish_submission(retry, Ok("tpl_8".to_string()))
        .unwrap();
    assert_eq!(transition, Transition::Completed("tpl_8".to_string()));
    assert_eq!(controller.state().result_id(), Some("tpl_8"));
}

#[test]
fn test_declined_cancel_changes_nothing() {
    let (mut controller, _) = controller(CannedStore::new(Ok("tpl".to_string())));
    controller.dispatch_key(enter()).unwrap();
    let before = controller.state().clone();

    assert!(!controller.handle_cancel(Confirmation::Declined).unwrap());

    assert_eq!(controller.state(), &before);
    assert_eq!(controller.state().status(), WizardStatus::InProgress);
    assert_eq!(controller.active_step(), Some(LogicalStep::ComponentDefinition));
}

#[test]
fn test_confirmed_cancel_is_terminal() {
    let (mut controller, journal) = controller(CannedStore::new(Ok("tpl".to_string())));

    assert!(controller.handle_cancel(Confirmation::Confirmed).unwrap());

    assert_eq!(controller.state().status(), WizardStatus::Cancelled);
    assert_eq!(controller.active_step(), None);
    assert_eq!(journal.borrow().last().map(String::as_str), Some("destroy upload"));
    assert!(matches!(controller.request_next().unwrap(), NextOutcome::Blocked));
}

#[test]
fn test_response_after_reset_is_stale() {
    let (mut controller, _) = controller(CannedStore::new(Ok("tpl".to_string())));
    to_final_step(&mut controller);
    let ticket = controller.begin_submission().unwrap().unwrap();

    controller.reset().unwrap();
    let transition = controller
        .finish_submission(ticket, Ok("tpl_late".to_string()))
        .unwrap();

    assert_eq!(transition, Transition::Stale);
    assert_eq!(controller.state().status(), WizardStatus::InProgress);
    assert_eq!(controller.state().current_step(), 1);
    assert_eq!(controller.active_step(), Some(LogicalStep::Upload));
    assert!(!controller.is_submitting());
}

#[test]
fn test_response_after_cancel_is_stale() {
    let (mut controller, _) = controller(CannedStore::new(Ok("tpl".to_string())));
    to_final_step(&mut controller);
    let ticket = controller.begin_submission().unwrap().unwrap();

    controller.handle_cancel(Confirmation::Confirmed).unwrap();
    let transition = controller
        .finish_submission(ticket, Ok("tpl_late".to_string()))
        .unwrap();

    assert_eq!(transition, Transition::Stale);
    assert_eq!(controller.state().status(), WizardStatus::Cancelled);
    assert_eq!(controller.state().result_id(), None);
}

#[test]
fn test_missing_step_view_is_an_error() {
    let (mut views, _) = FixtureViews::new();
    views.missing = Some(LogicalStep::ComponentDefinition);
    let store = CannedStore::new(Ok("tpl".to_string()));
    let mut controller = WizardController::new(store, views, Duration::from_secs(1));
    controller.load_current_step().unwrap();

    let err = controller.dispatch_key(enter()).unwrap_err();

    assert!(matches!(
        err,
        WizardError::MissingStepView(LogicalStep::ComponentDefinition)
    ));
    assert_eq!(controller.active_step(), None);
}

#[test]
fn test_step_data_updates_refresh_navigation() {
    let (mut controller, _) = controller(CannedStore::new(Ok("tpl".to_string())));
    assert!(!controller.navigation().next_enabled);

    controller.record_step_data(upload("design.fig")).unwrap();

    let nav = controller.navigation();
    assert!(nav.next_enabled);
    assert_eq!(nav.total_steps, 4);
    assert_eq!(nav.indicators[1].step, LogicalStep::Metadata);
}

#[test]
fn test_subscribers_hear_completion() {
    let (mut controller, _) = controller(CannedStore::new(Ok("tpl".to_string())));
    let heard = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&heard);
    controller.subscribe(
        template_wizard::wizard::WizardEventKind::WizardCompleted,
        move |event| sink.borrow_mut().push(event.clone()),
    );
    to_final_step(&mut controller);

    let ticket = controller.begin_submission().unwrap().unwrap();
    controller
        .finish_submission(ticket, Ok("tpl_9".to_string()))
        .unwrap();

    assert_eq!(heard.borrow().len(), 1);
}
