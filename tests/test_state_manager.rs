// ABOUTME: Behavioural tests for the wizard state manager: gating, numbering, events and reset

use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

use template_wizard::wizard::{
    ComponentDefinitionData, ComponentKind, ComponentRegion, CompletionData, LogicalStep,
    MetadataData, StepData, SummaryData, UploadData, WizardEvent, WizardEventKind,
    WizardStateManager, WizardStatus,
};

fn upload(file_name: &str, mime_type: &str) -> StepData {
    StepData::Upload(UploadData {
        file_name: file_name.to_string(),
        mime_type: mime_type.to_string(),
        size_bytes: 4096,
        preview_image_url: Some(format!("https://cdn.test/uploads/{file_name}")),
    })
}

fn regions() -> StepData {
    StepData::ComponentDefinition(ComponentDefinitionData {
        regions: vec![
            ComponentRegion::new(ComponentKind::Banner, "Hero", (0, 0, 1200, 400)),
            ComponentRegion::new(ComponentKind::Card, "Offer", (0, 400, 600, 300)),
        ],
    })
}

fn metadata() -> StepData {
    StepData::Metadata(MetadataData {
        name: "Spring Sale".to_string(),
        description: "Seasonal landing page".to_string(),
        category_id: Some("landing".to_string()),
        tags: vec!["sale".to_string(), "spring".to_string()],
    })
}

/// Record every event of every kind, in order
fn record_all(manager: &mut WizardStateManager) -> Rc<RefCell<Vec<WizardEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        WizardEventKind::StepChanged,
        WizardEventKind::StepDataUpdated,
        WizardEventKind::WizardCompleted,
        WizardEventKind::WizardCancelled,
    ] {
        let log = Rc::clone(&log);
        manager.add_event_listener(kind, move |e| log.borrow_mut().push(e.clone()));
    }
    log
}

/// Walk a PNG session to the final step
fn png_session() -> (WizardStateManager, Vec<StepData>) {
    let script = vec![
        upload("hero.png", "image/png"),
        regions(),
        metadata(),
        StepData::Summary(SummaryData { reviewed: true }),
    ];
    let mut manager = WizardStateManager::new();
    for data in &script {
        assert!(manager.update_step_data(data.clone()));
        assert!(manager.next_step(), "could not leave {}", data.step());
    }
    (manager, script)
}

#[test]
fn test_next_step_marks_completion_for_every_step() {
    let (manager, _) = png_session();
    assert_eq!(manager.current_step(), 5);
    for k in 1..5 {
        assert!(manager.is_step_completed(k), "step {k} should be complete");
    }
    assert!(!manager.is_step_completed(5));
}

#[test]
fn test_previous_step_keeps_completion() {
    let (mut manager, _) = png_session();
    let before = manager.state().clone();

    while manager.previous_step() {}

    assert_eq!(manager.current_step(), 1);
    for k in 1..5 {
        assert_eq!(manager.is_step_completed(k), before.is_step_completed(k));
    }
}

#[test]
fn test_blocked_next_step_changes_nothing_and_emits_nothing() {
    let mut manager = WizardStateManager::new();
    manager.update_step_data(upload("design.fig", "application/x-figma"));
    assert!(manager.next_step());

    let log = record_all(&mut manager);
    let before = manager.state().clone();

    assert!(!manager.can_proceed_to_next_step());
    assert!(!manager.next_step());

    assert_eq!(manager.state(), &before);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_next_step_on_final_step_is_noop() {
    let (mut manager, _) = png_session();
    manager.update_step_data(StepData::Completion(CompletionData { publish: true }));
    assert!(manager.can_proceed_to_next_step());

    assert!(!manager.next_step());
    assert_eq!(manager.current_step(), 5);
}

#[test]
fn test_reset_and_replay_reproduces_payload() {
    let (mut manager, script) = png_session();
    let first = manager.template_data().unwrap();

    manager.reset();
    assert_eq!(manager.current_step(), 1);
    assert!(manager.template_data().is_err());

    for data in script {
        manager.update_step_data(data);
        manager.next_step();
    }
    assert_eq!(manager.template_data().unwrap(), first);
}

#[test]
fn test_png_upload_numbering() {
    let mut manager = WizardStateManager::new();
    manager.update_step_data(upload("hero.png", "image/png"));
    assert!(manager.next_step());

    assert_eq!(manager.total_steps(), 5);
    assert_eq!(manager.current_step(), 2);
    assert_eq!(
        manager.state().current_logical_step(),
        Some(LogicalStep::ComponentDefinition)
    );
    assert_eq!(manager.step_title(2), Some(LogicalStep::ComponentDefinition.title()));
    assert_eq!(manager.step_title(3), Some("Configure Template"));
}

#[test]
fn test_vector_upload_numbering() {
    let mut manager = WizardStateManager::new();
    manager.update_step_data(upload("design.fig", "application/x-figma"));
    assert!(manager.next_step());

    assert_eq!(manager.total_steps(), 4);
    assert_eq!(manager.current_step(), 2);
    assert_eq!(manager.state().current_logical_step(), Some(LogicalStep::Metadata));
    assert_eq!(manager.step_title(2), Some("Configure Template"));
    assert_eq!(manager.step_title(5), None);
}

#[test]
fn test_png_detected_from_extension_without_mime() {
    let mut manager = WizardStateManager::new();
    manager.update_step_data(upload("HERO.PNG", ""));
    assert!(manager.is_png_component_definition_required());
    assert_eq!(manager.total_steps(), 5);
}

#[test]
fn test_mark_completed_is_idempotent() {
    let (mut manager, _) = png_session();
    let log = record_all(&mut manager);

    assert!(manager.mark_completed("tpl_1"));
    assert!(!manager.mark_completed("tpl_2"));

    assert_eq!(manager.state().status(), WizardStatus::Completed);
    assert_eq!(manager.state().result_id(), Some("tpl_1"));
    let completed: Vec<_> = log
        .borrow()
        .iter()
        .filter(|e| e.kind() == WizardEventKind::WizardCompleted)
        .cloned()
        .collect();
    assert_eq!(
        completed,
        vec![WizardEvent::WizardCompleted {
            result_id: "tpl_1".to_string()
        }]
    );
}

#[test]
fn test_terminal_state_rejects_mutation() {
    let mut manager = WizardStateManager::new();
    manager.update_step_data(upload("design.fig", "application/x-figma"));
    assert!(manager.mark_cancelled());

    let before = manager.state().clone();
    assert!(!manager.update_step_data(metadata()));
    assert!(!manager.next_step());
    assert!(!manager.mark_completed("late"));
    assert!(!manager.mark_cancelled());
    assert_eq!(manager.state(), &before);

    manager.reset();
    assert_eq!(manager.state().status(), WizardStatus::InProgress);
}

#[test]
fn test_listeners_run_in_subscription_order_and_survive_reset() {
    let mut manager = WizardStateManager::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second"] {
        let order = Rc::clone(&order);
        manager.add_event_listener(WizardEventKind::StepChanged, move |_| {
            order.borrow_mut().push(tag);
        });
    }

    manager.reset();
    assert_eq!(*order.borrow(), vec!["first", "second"]);

    manager.update_step_data(upload("design.fig", ""));
    manager.next_step();
    assert_eq!(*order.borrow(), vec!["first", "second", "first", "second"]);
}

#[test]
fn test_removed_listener_is_not_called() {
    let mut manager = WizardStateManager::new();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let id = manager.add_event_listener(WizardEventKind::StepDataUpdated, move |_| {
        *counter.borrow_mut() += 1;
    });

    manager.update_step_data(metadata());
    assert!(manager.remove_event_listener(id));
    assert!(!manager.remove_event_listener(id));
    manager.update_step_data(metadata());

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_step_errors_cleared_on_recompletion() {
    let mut manager = WizardStateManager::new();
    manager.set_step_error(1, "Upload failed");
    assert_eq!(manager.step_error(1), Some("Upload failed"));

    manager.update_step_data(upload("design.fig", ""));
    assert!(manager.next_step());
    assert_eq!(manager.step_error(1), None);
}

#[test]
fn test_mid_flow_reupload_keeps_branch_and_progress() {
    let mut manager = WizardStateManager::new();
    manager.update_step_data(upload("hero.png", "image/png"));
    assert!(manager.next_step());
    manager.update_step_data(regions());
    assert!(manager.next_step());
    assert_eq!(manager.current_step(), 3);

    assert!(!manager.update_step_data(upload("design.fig", "application/x-figma")));

    assert_eq!(manager.total_steps(), 5);
    assert_eq!(manager.current_step(), 3);
    assert_eq!(manager.state().current_logical_step(), Some(LogicalStep::Metadata));
    assert!((1..manager.current_step()).all(|n| manager.is_step_completed(n)));
    assert!(manager.step_data(LogicalStep::ComponentDefinition).is_some());
}

#[test]
fn test_branch_switch_on_first_step_reopens_upload() {
    let mut manager = WizardStateManager::new();
    manager.update_step_data(upload("hero.png", "image/png"));
    assert!(manager.next_step());
    manager.update_step_data(regions());
    assert!(manager.previous_step());

    assert!(manager.update_step_data(upload("design.fig", "application/x-figma")));

    assert_eq!(manager.total_steps(), 4);
    assert!(!manager.is_step_completed(1));
    assert!(manager.step_data(LogicalStep::ComponentDefinition).is_none());
}
