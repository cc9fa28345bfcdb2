// ABOUTME: Logical wizard steps and the conditional step-numbering rules
// Every mapping between a literal step number and a logical step goes through this module

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Total steps when the upload needs component regions drawn over it
pub const STEPS_WITH_COMPONENT_DEFINITION: usize = 5;
/// Total steps when the component definition step is skipped
pub const STEPS_WITHOUT_COMPONENT_DEFINITION: usize = 4;

const WITH_COMPONENT_DEFINITION: [LogicalStep; STEPS_WITH_COMPONENT_DEFINITION] = [
    LogicalStep::Upload,
    LogicalStep::ComponentDefinition,
    LogicalStep::Metadata,
    LogicalStep::Summary,
    LogicalStep::Completion,
];

const WITHOUT_COMPONENT_DEFINITION: [LogicalStep; STEPS_WITHOUT_COMPONENT_DEFINITION] = [
    LogicalStep::Upload,
    LogicalStep::Metadata,
    LogicalStep::Summary,
    LogicalStep::Completion,
];

const PNG_MIME_TYPES: &[&str] = &["image/png", "image/apng", "image/x-png"];
const PNG_EXTENSIONS: &[&str] = &["png", "apng"];

/// A named phase of the wizard, independent of its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalStep {
    Upload,
    ComponentDefinition,
    Metadata,
    Summary,
    Completion,
}

impl LogicalStep {
    /// Ordered steps for a wizard of the given length
    pub fn sequence(total_steps: usize) -> &'static [LogicalStep] {
        match total_steps {
            STEPS_WITH_COMPONENT_DEFINITION => &WITH_COMPONENT_DEFINITION,
            STEPS_WITHOUT_COMPONENT_DEFINITION => &WITHOUT_COMPONENT_DEFINITION,
            _ => &[],
        }
    }

    /// Display title for this step
    pub fn title(&self) -> &'static str {
        match self {
            Self::Upload => "Upload Template",
            Self::ComponentDefinition => "Define Components",
            Self::Metadata => "Configure Template",
            Self::Summary => "Review Template",
            Self::Completion => "Complete",
        }
    }

    /// Short description shown under the title
    pub fn description(&self) -> &'static str {
        match self {
            Self::Upload => "Choose the design file this template is built from",
            Self::ComponentDefinition => "Mark the regions of the image that become components",
            Self::Metadata => "Name the template and pick a category",
            Self::Summary => "Check everything before saving",
            Self::Completion => "Save the template to the library",
        }
    }

    /// Key used for this step in serialized step data
    pub fn key(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::ComponentDefinition => "componentDefinition",
            Self::Metadata => "metadata",
            Self::Summary => "summary",
            Self::Completion => "completion",
        }
    }
}

impl fmt::Display for LogicalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Number of steps for the given branch
pub const fn total_steps_for(component_definition_required: bool) -> usize {
    if component_definition_required {
        STEPS_WITH_COMPONENT_DEFINITION
    } else {
        STEPS_WITHOUT_COMPONENT_DEFINITION
    }
}

/// Resolve a 1-indexed step number into its logical step
pub fn resolve_logical_step(step_number: usize, total_steps: usize) -> Option<LogicalStep> {
    step_number
        .checked_sub(1)
        .and_then(|idx| LogicalStep::sequence(total_steps).get(idx))
        .copied()
}

/// Literal step number of a logical step, `None` when the branch skips it
pub fn step_number_of(step: LogicalStep, total_steps: usize) -> Option<usize> {
    LogicalStep::sequence(total_steps)
        .iter()
        .position(|s| *s == step)
        .map(|idx| idx + 1)
}

/// Whether a file name or MIME type names a PNG-family raster image
pub fn is_png_like(file_name_or_mime_type: &str) -> bool {
    let value = file_name_or_mime_type.trim().to_ascii_lowercase();
    if value.is_empty() {
        return false;
    }

    if PNG_MIME_TYPES.contains(&value.as_str()) {
        return true;
    }

    Path::new(&value)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PNG_EXTENSIONS.contains(&ext))
}
