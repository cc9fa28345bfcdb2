// ABOUTME: Typed payloads written by each step-view and the flattened template payload
// The flattener matches every StepData variant, so a new step cannot be added without updating it

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::error::WizardError;
use super::step::{is_png_like, LogicalStep};

/// Content block types a template region can become
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Text,
    Banner,
    Image,
    Card,
    Accordion,
}

impl ComponentKind {
    pub fn all() -> &'static [ComponentKind] {
        &[
            Self::Text,
            Self::Banner,
            Self::Image,
            Self::Card,
            Self::Accordion,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Banner => "Banner",
            Self::Image => "Image",
            Self::Card => "Card",
            Self::Accordion => "Accordion",
        }
    }
}

/// A rectangle over the uploaded image that maps to one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRegion {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default)]
    pub label: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ComponentRegion {
    pub fn new(kind: ComponentKind, label: impl Into<String>, bounds: (u32, u32, u32, u32)) -> Self {
        let (x, y, width, height) = bounds;
        Self {
            id: Uuid::new_v4(),
            kind,
            label: label.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Step 1: the chosen design file and its upload acknowledgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    pub file_name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub size_bytes: u64,
    /// Set once the upload has been acknowledged
    #[serde(default)]
    pub preview_image_url: Option<String>,
}

impl UploadData {
    pub fn is_acknowledged(&self) -> bool {
        !self.file_name.trim().is_empty()
            && self
                .preview_image_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty())
    }

    /// PNG-family uploads get an extra step for drawing component regions
    pub fn requires_component_definition(&self) -> bool {
        is_png_like(&self.mime_type) || is_png_like(&self.file_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinitionData {
    #[serde(default)]
    pub regions: Vec<ComponentRegion>,
}

impl ComponentDefinitionData {
    pub fn is_valid(&self) -> bool {
        !self.regions.is_empty() && self.regions.iter().all(ComponentRegion::has_area)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MetadataData {
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && self
                .category_id
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryData {
    #[serde(default)]
    pub reviewed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionData {
    #[serde(default)]
    pub publish: bool,
}

/// Data written by one step-view, tagged by its logical step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", content = "data", rename_all = "camelCase")]
pub enum StepData {
    Upload(UploadData),
    ComponentDefinition(ComponentDefinitionData),
    Metadata(MetadataData),
    Summary(SummaryData),
    Completion(CompletionData),
}

impl StepData {
    pub fn step(&self) -> LogicalStep {
        match self {
            Self::Upload(_) => LogicalStep::Upload,
            Self::ComponentDefinition(_) => LogicalStep::ComponentDefinition,
            Self::Metadata(_) => LogicalStep::Metadata,
            Self::Summary(_) => LogicalStep::Summary,
            Self::Completion(_) => LogicalStep::Completion,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    #[default]
    Draft,
    Published,
}

/// Body sent to the template API on completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload {
    pub name: String,
    pub description: String,
    pub category_id: String,
    pub preview_image_url: String,
    pub components: Vec<ComponentRegion>,
    pub source_file_name: String,
    pub source_mime_type: String,
    pub tags: Vec<String>,
    pub status: TemplateStatus,
}

/// Flatten per-step data into a single payload
pub fn flatten(
    step_data: &BTreeMap<LogicalStep, StepData>,
    component_definition_required: bool,
) -> Result<TemplatePayload, WizardError> {
    let mut upload = None;
    let mut definition = None;
    let mut metadata = None;
    let mut completion = None;

    for data in step_data.values() {
        match data {
            StepData::Upload(d) => upload = Some(d),
            StepData::ComponentDefinition(d) => definition = Some(d),
            StepData::Metadata(d) => metadata = Some(d),
            // Review only gates navigation
            StepData::Summary(_) => {}
            StepData::Completion(d) => completion = Some(d),
        }
    }

    let upload = upload.ok_or(WizardError::MissingStepData(LogicalStep::Upload))?;
    let components = match (component_definition_required, definition) {
        (true, None) => {
            return Err(WizardError::MissingStepData(
                LogicalStep::ComponentDefinition,
            ))
        }
        (true, Some(d)) => d.regions.clone(),
        (false, _) => Vec::new(),
    };
    let metadata = metadata.ok_or(WizardError::MissingStepData(LogicalStep::Metadata))?;

    let status = if completion.is_some_and(|c| c.publish) {
        TemplateStatus::Published
    } else {
        TemplateStatus::Draft
    };

    Ok(TemplatePayload {
        name: metadata.name.trim().to_string(),
        description: metadata.description.trim().to_string(),
        category_id: metadata.category_id.clone().unwrap_or_default(),
        preview_image_url: upload.preview_image_url.clone().unwrap_or_default(),
        components,
        source_file_name: upload.file_name.clone(),
        source_mime_type: upload.mime_type.clone(),
        tags: metadata.tags.clone(),
        status,
    })
}
