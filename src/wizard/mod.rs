// ABOUTME: Template upload wizard core: step numbering, typed step data, state manager and controller
// The controller owns one state manager per session; nothing here is global

pub mod controller;
pub mod data;
pub mod error;
pub mod events;
pub mod state;
pub mod step;

pub use controller::{
    progress_percent, Confirmation, IndicatorState, NavigationModel, NextOutcome, StepContext,
    StepIndicator, StepView, StepViewFactory, SubmissionTicket, Transition, WizardController,
};
pub use data::{
    ComponentDefinitionData, ComponentKind, ComponentRegion, CompletionData, MetadataData,
    StepData, SummaryData, TemplatePayload, TemplateStatus, UploadData,
};
pub use error::WizardError;
pub use events::{ListenerId, WizardEvent, WizardEventKind};
pub use state::{WizardState, WizardStateManager, WizardStatus};
pub use step::{is_png_like, resolve_logical_step, step_number_of, total_steps_for, LogicalStep};
