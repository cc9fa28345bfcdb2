// ABOUTME: Terminal step-views for each logical wizard step and the factory that builds them

pub mod completion;
pub mod component_definition;
pub mod metadata;
pub mod summary;
pub mod upload;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders},
};

use super::text_input::TextInput;
use super::theme::{CORNFLOWER_BLUE, GOLD, MUTED_GRAY, PANEL_BG, SOFT_WHITE};
use crate::config::CategoryOption;
use crate::wizard::{LogicalStep, StepView, StepViewFactory, WizardState};

pub use completion::CompletionStepView;
pub use component_definition::ComponentDefinitionStepView;
pub use metadata::MetadataStepView;
pub use summary::SummaryStepView;
pub use upload::UploadStepView;

/// Builds the terminal form for each step
#[derive(Debug, Clone)]
pub struct TerminalStepViews {
    categories: Vec<CategoryOption>,
}

impl TerminalStepViews {
    pub fn new(categories: Vec<CategoryOption>) -> Self {
        Self { categories }
    }
}

impl StepViewFactory for TerminalStepViews {
    fn create(&mut self, step: LogicalStep, state: &WizardState) -> Option<Box<dyn StepView>> {
        let view: Box<dyn StepView> = match step {
            LogicalStep::Upload => Box::new(UploadStepView::new(state)),
            LogicalStep::ComponentDefinition => Box::new(ComponentDefinitionStepView::new(state)),
            LogicalStep::Metadata => {
                Box::new(MetadataStepView::new(state, self.categories.clone()))
            }
            LogicalStep::Summary => Box::new(SummaryStepView::new(self.categories.clone())),
            LogicalStep::Completion => Box::new(CompletionStepView::new(state)),
        };
        Some(view)
    }
}

fn step_block(step: LogicalStep) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(CORNFLOWER_BLUE))
        .style(Style::default().bg(PANEL_BG))
        .title(format!(" {} ", step.title()))
        .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
}

fn field_line(label: &str, input: &TextInput, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(GOLD)),
        Span::styled(format!("{label:<12}"), Style::default().fg(MUTED_GRAY)),
        Span::styled(input.display(focused), Style::default().fg(SOFT_WHITE)),
    ])
}

fn hint_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(MUTED_GRAY)))
}
