// ABOUTME: Terminal UI components for the template wizard

pub mod confirmation_dialog;
pub mod steps;
pub mod text_input;
pub mod theme;
pub mod wizard_shell;

pub use confirmation_dialog::{ConfirmationDialog, ConfirmationDialogComponent};
pub use steps::TerminalStepViews;
pub use text_input::TextInput;
pub use wizard_shell::WizardShell;
