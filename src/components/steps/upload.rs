// ABOUTME: Upload step: picks the design file and stages it as the template preview
// A staged local file counts as the upload acknowledgment; its file:// URL is the preview

use anyhow::{anyhow, bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use super::{field_line, hint_line, step_block};
use crate::components::text_input::TextInput;
use crate::wizard::{LogicalStep, StepContext, StepData, StepView, UploadData, WizardState};

const MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("apng", "image/apng"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("pdf", "application/pdf"),
    ("fig", "application/x-figma"),
    ("sketch", "application/x-sketch"),
    ("xd", "application/vnd.adobe.xd"),
];

/// Best-effort MIME type from the file extension
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or("application/octet-stream", |(_, mime)| *mime)
}

/// Expand `~` and check the path is a readable, non-empty file
pub fn stage_local_file(input: &str) -> Result<UploadData> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("Enter the path of the design file");
    }

    let path = expand_home(trimmed);
    let metadata = fs::metadata(&path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a file", path.display());
    }
    if metadata.len() == 0 {
        bail!("{} is empty", path.display());
    }

    let absolute = path
        .canonicalize()
        .with_context(|| format!("Cannot resolve {}", path.display()))?;
    let preview = Url::from_file_path(&absolute)
        .map_err(|()| anyhow!("Cannot build a preview URL for {}", absolute.display()))?;
    let file_name = absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| trimmed.to_string());

    Ok(UploadData {
        file_name,
        mime_type: guess_mime_type(&absolute).to_string(),
        size_bytes: metadata.len(),
        preview_image_url: Some(preview.to_string()),
    })
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

pub struct UploadStepView {
    path: TextInput,
    staged: Option<UploadData>,
}

impl UploadStepView {
    pub fn new(state: &WizardState) -> Self {
        let staged = state.upload().cloned();
        let path = staged
            .as_ref()
            .and_then(|u| u.preview_image_url.as_deref())
            .and_then(|url| Url::parse(url).ok())
            .and_then(|url| url.to_file_path().ok())
            .map(|p| TextInput::with_value(p.display().to_string()))
            .unwrap_or_default();
        Self { path, staged }
    }
}

impl StepView for UploadStepView {
    fn step(&self) -> LogicalStep {
        LogicalStep::Upload
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut StepContext<'_>) {
        if key.code != KeyCode::Enter {
            self.path.handle_key(key);
            return;
        }

        match stage_local_file(self.path.value()) {
            Ok(upload) => {
                debug!(file = %upload.file_name, mime = %upload.mime_type, "Staged upload");
                ctx.clear_error();
                self.staged = Some(upload.clone());
                if ctx.write(StepData::Upload(upload)) {
                    ctx.complete();
                }
            }
            Err(e) => ctx.fail(format!("{e:#}")),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _state: &WizardState) {
        let mut lines = vec![
            hint_line("Path to the design file (PNG images get a component definition step)"),
            field_line("File", &self.path, true),
        ];

        if let Some(upload) = &self.staged {
            let branch = if upload.requires_component_definition() {
                "raster image: regions will be defined next"
            } else {
                "regions are not needed for this format"
            };
            lines.push(hint_line(""));
            lines.push(hint_line(&format!(
                "  Staged {} ({}, {} bytes), {}",
                upload.file_name, upload.mime_type, upload.size_bytes, branch
            )));
        }

        lines.push(hint_line(""));
        lines.push(hint_line("  Enter: stage file and continue"));
        frame.render_widget(Paragraph::new(lines).block(step_block(self.step())), area);
    }

    fn destroy(&mut self) {
        self.staged = None;
    }
}
