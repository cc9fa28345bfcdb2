// ABOUTME: Metadata step: template name, description, category and tags

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{field_line, hint_line, step_block};
use crate::components::text_input::TextInput;
use crate::components::theme::{GOLD, MUTED_GRAY, SOFT_WHITE};
use crate::config::CategoryOption;
use crate::wizard::{LogicalStep, MetadataData, StepContext, StepData, StepView, WizardState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Description,
    Category,
    Tags,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Self::Name => Self::Description,
            Self::Description => Self::Category,
            Self::Category => Self::Tags,
            Self::Tags => Self::Name,
        }
    }
}

/// Split a comma-separated tag list, dropping blanks and duplicates
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            tags.push(tag.to_string());
        }
    }
    tags
}

pub struct MetadataStepView {
    categories: Vec<CategoryOption>,
    name: TextInput,
    description: TextInput,
    tags: TextInput,
    category_index: Option<usize>,
    field: Field,
}

impl MetadataStepView {
    pub fn new(state: &WizardState, categories: Vec<CategoryOption>) -> Self {
        let existing = match state.step_data(LogicalStep::Metadata) {
            Some(StepData::Metadata(data)) => Some(data.clone()),
            _ => None,
        };

        let mut view = Self {
            categories,
            name: TextInput::new(),
            description: TextInput::new(),
            tags: TextInput::new(),
            category_index: None,
            field: Field::Name,
        };

        if let Some(data) = existing {
            view.name = TextInput::with_value(data.name);
            view.description = TextInput::with_value(data.description);
            view.tags = TextInput::with_value(data.tags.join(", "));
            view.category_index = data
                .category_id
                .and_then(|id| view.categories.iter().position(|c| c.id == id));
        }
        view
    }

    fn cycle_category(&mut self, forward: bool) {
        let len = self.categories.len();
        if len == 0 {
            return;
        }
        self.category_index = Some(match (self.category_index, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(idx), true) => (idx + 1) % len,
            (Some(idx), false) => (idx + len - 1) % len,
        });
    }

    fn collect(&self) -> MetadataData {
        MetadataData {
            name: self.name.value().trim().to_string(),
            description: self.description.value().trim().to_string(),
            category_id: self
                .category_index
                .and_then(|idx| self.categories.get(idx))
                .map(|c| c.id.clone()),
            tags: parse_tags(self.tags.value()),
        }
    }

    fn submit(&mut self, ctx: &mut StepContext<'_>) {
        let data = self.collect();
        let problem = if data.name.is_empty() {
            Some("Template name is required")
        } else if data.category_id.is_none() {
            Some("Choose a category")
        } else {
            None
        };

        // Keep partial input so the form survives going back and forth
        ctx.write(StepData::Metadata(data));
        match problem {
            Some(message) => ctx.fail(message),
            None => {
                ctx.clear_error();
                ctx.complete();
            }
        }
    }

    fn active_input(&mut self) -> Option<&mut TextInput> {
        match self.field {
            Field::Name => Some(&mut self.name),
            Field::Description => Some(&mut self.description),
            Field::Tags => Some(&mut self.tags),
            Field::Category => None,
        }
    }
}

impl StepView for MetadataStepView {
    fn step(&self) -> LogicalStep {
        LogicalStep::Metadata
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut StepContext<'_>) {
        match (key.code, self.field) {
            (KeyCode::Tab | KeyCode::Down, _) => self.field = self.field.next(),
            (KeyCode::Enter, _) => self.submit(ctx),
            (KeyCode::Left, Field::Category) => self.cycle_category(false),
            (KeyCode::Right | KeyCode::Char(' '), Field::Category) => self.cycle_category(true),
            _ => {
                if let Some(input) = self.active_input() {
                    input.handle_key(key);
                }
            }
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _state: &WizardState) {
        let category = self
            .category_index
            .and_then(|idx| self.categories.get(idx))
            .map_or("(none)", |c| c.name.as_str());
        let category_marker = if self.field == Field::Category { "▸ " } else { "  " };

        let lines = vec![
            hint_line("Describe the template as it should appear in the library"),
            field_line("Name", &self.name, self.field == Field::Name),
            field_line("Description", &self.description, self.field == Field::Description),
            Line::from(vec![
                Span::styled(category_marker, Style::default().fg(GOLD)),
                Span::styled(format!("{:<12}", "Category"), Style::default().fg(MUTED_GRAY)),
                Span::styled(format!("◂ {category} ▸"), Style::default().fg(SOFT_WHITE)),
            ]),
            field_line("Tags", &self.tags, self.field == Field::Tags),
            hint_line(""),
            hint_line("  Tab: next field  ←/→: category  Enter: save and continue"),
        ];
        frame.render_widget(Paragraph::new(lines).block(step_block(self.step())), area);
    }
}
