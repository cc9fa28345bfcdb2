// ABOUTME: CLI replay command: drives the wizard headlessly from a JSON script of step data
//
// The script is a JSON array of step data entries, e.g.
//   [{"step": "upload", "data": {...}}, {"step": "metadata", "data": {...}}]
// Entries are recorded in order; the wizard advances after each entry for the current step,
// then keeps advancing through the remaining steps and submits on the last one.

use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use super::{OutputFormat, ReplayArgs};
use crate::api::{SubmissionError, TemplateApiClient, TemplateStore};
use crate::config::AppConfig;
use crate::wizard::{
    LogicalStep, StepContext, StepData, StepView, StepViewFactory, TemplatePayload, Transition,
    WizardController, WizardError, WizardState, WizardStatus,
};

/// Step-view with no UI; all data comes from the script
struct ScriptedStep(LogicalStep);

impl StepView for ScriptedStep {
    fn step(&self) -> LogicalStep {
        self.0
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut StepContext<'_>) {}

    fn render(&self, _frame: &mut Frame, _area: Rect, _state: &WizardState) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessViews;

impl StepViewFactory for HeadlessViews {
    fn create(&mut self, step: LogicalStep, _state: &WizardState) -> Option<Box<dyn StepView>> {
        Some(Box::new(ScriptedStep(step)))
    }
}

/// Accepts every payload without persisting it
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunStore;

impl TemplateStore for DryRunStore {
    async fn create_template(&self, payload: TemplatePayload) -> Result<String, SubmissionError> {
        info!(name = %payload.name, "Dry run: template not sent");
        Ok(format!("dry-run-{}", Uuid::new_v4()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub status: WizardStatus,
    pub current_step: usize,
    pub total_steps: usize,
    pub result_id: Option<String>,
    pub error: Option<String>,
    pub payload: Option<TemplatePayload>,
    #[serde(skip)]
    pub failure: Option<SubmissionError>,
}

pub fn load_script(path: &Path) -> Result<Vec<StepData>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read replay script {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse replay script {}", path.display()))
}

/// Feed `script` through a controller backed by `store`
pub async fn replay<S: TemplateStore>(
    store: S,
    script: Vec<StepData>,
    submit_timeout: Duration,
) -> Result<ReplayReport> {
    let mut controller = WizardController::new(store, HeadlessViews, submit_timeout);
    controller.load_current_step()?;

    let mut failure = None;
    for data in script {
        let step = data.step();
        if !controller.record_step_data(data)? {
            warn!(%step, "Replay entry was not applied");
            continue;
        }
        if controller.state().current_logical_step() == Some(step) {
            if let Transition::SubmissionFailed(e) = controller.handle_next().await? {
                failure = Some(e);
                break;
            }
        }
    }

    // Steps without entries of their own (review, completion) advance on their defaults
    while failure.is_none() && !controller.state().is_terminal() {
        match controller.handle_next().await? {
            Transition::Advanced => {}
            Transition::SubmissionFailed(e) => {
                failure = Some(e);
                break;
            }
            Transition::Blocked | Transition::Completed(_) | Transition::Stale => break,
        }
    }

    let state = controller.state();
    let current_step = state.current_step();
    Ok(ReplayReport {
        status: state.status(),
        current_step,
        total_steps: state.total_steps(),
        result_id: state.result_id().map(str::to_string),
        error: state.step_error(current_step).map(str::to_string),
        payload: state.template_data().ok(),
        failure,
    })
}

/// Execute the replay command
pub async fn execute(args: &ReplayArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let script = load_script(&args.script)?;
    let timeout = config.api.submit_timeout();

    let report = if args.dry_run {
        replay(DryRunStore, script, timeout).await?
    } else {
        replay(TemplateApiClient::new(&config.api)?, script, timeout).await?
    };

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize replay report")?
        ),
        OutputFormat::Text => {
            println!(
                "Status: {:?} (step {}/{})",
                report.status, report.current_step, report.total_steps
            );
            if let Some(id) = &report.result_id {
                println!("Template id: {id}");
            }
            if let Some(error) = &report.error {
                println!("Error: {error}");
            }
            if args.dry_run {
                if let Some(payload) = &report.payload {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(payload)
                            .context("Failed to serialize payload")?
                    );
                }
            }
        }
    }

    match report.failure {
        Some(e) => Err(WizardError::from(e).into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{MetadataData, UploadData};

    fn upload(name: &str, mime: &str) -> StepData {
        StepData::Upload(UploadData {
            file_name: name.to_string(),
            mime_type: mime.to_string(),
            size_bytes: 42,
            preview_image_url: Some(format!("file:///tmp/{name}")),
        })
    }

    fn metadata() -> StepData {
        StepData::Metadata(MetadataData {
            name: "Spring Sale".to_string(),
            description: "Seasonal landing page".to_string(),
            category_id: Some("landing".to_string()),
            tags: vec!["sale".to_string()],
        })
    }

    #[tokio::test]
    async fn test_replay_fig_completes() {
        let script = vec![upload("home.fig", "application/x-figma"), metadata()];
        let report = replay(DryRunStore, script, Duration::from_secs(5)).await.unwrap();

        assert_eq!(report.status, WizardStatus::Completed);
        assert_eq!(report.total_steps, 4);
        assert!(report.result_id.unwrap().starts_with("dry-run-"));
        assert_eq!(report.payload.unwrap().name, "Spring Sale");
    }

    #[tokio::test]
    async fn test_replay_png_without_regions_stops_at_component_step() {
        let script = vec![upload("home.png", "image/png"), metadata()];
        let report = replay(DryRunStore, script, Duration::from_secs(5)).await.unwrap();

        assert_eq!(report.status, WizardStatus::InProgress);
        assert_eq!(report.total_steps, 5);
        assert_eq!(report.current_step, 2);
        assert!(report.result_id.is_none());
    }

    #[tokio::test]
    async fn test_replay_ignores_late_branch_switch() {
        let regions = StepData::ComponentDefinition(crate::wizard::ComponentDefinitionData {
            regions: vec![crate::wizard::ComponentRegion::new(
                crate::wizard::ComponentKind::Banner,
                "Hero",
                (0, 0, 800, 200),
            )],
        });
        let script = vec![
            upload("home.png", "image/png"),
            regions,
            upload("home.fig", "application/x-figma"),
            metadata(),
        ];
        let report = replay(DryRunStore, script, Duration::from_secs(5)).await.unwrap();

        assert_eq!(report.status, WizardStatus::Completed);
        assert_eq!(report.total_steps, 5);
        let payload = report.payload.unwrap();
        assert_eq!(payload.source_file_name, "home.png");
        assert_eq!(payload.components.len(), 1);
    }

    #[test]
    fn test_script_parses_tagged_entries() {
        let json = r#"[
            {"step": "upload", "data": {"fileName": "a.png", "mimeType": "image/png", "previewImageUrl": "file:///a.png"}},
            {"step": "componentDefinition", "data": {"regions": [
                {"type": "banner", "label": "Hero", "x": 0, "y": 0, "width": 800, "height": 200}
            ]}}
        ]"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        fs::write(&path, json).unwrap();

        let script = load_script(&path).unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script[1].step(), LogicalStep::ComponentDefinition);
    }
}
