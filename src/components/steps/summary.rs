// ABOUTME: Summary step: read-only review of the payload that will be saved

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{hint_line, step_block};
use crate::components::theme::{ERROR_RED, MUTED_GRAY, SOFT_WHITE};
use crate::config::CategoryOption;
use crate::wizard::{LogicalStep, StepContext, StepData, StepView, SummaryData, WizardState};

pub struct SummaryStepView {
    categories: Vec<CategoryOption>,
}

impl SummaryStepView {
    pub fn new(categories: Vec<CategoryOption>) -> Self {
        Self { categories }
    }

    fn category_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map_or(id, |c| c.name.as_str())
    }
}

fn row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<14}"), Style::default().fg(MUTED_GRAY)),
        Span::styled(value, Style::default().fg(SOFT_WHITE)),
    ])
}

impl StepView for SummaryStepView {
    fn step(&self) -> LogicalStep {
        LogicalStep::Summary
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut StepContext<'_>) {
        if key.code != KeyCode::Enter {
            return;
        }
        if let Err(e) = ctx.state().template_data() {
            ctx.fail(e.to_string());
            return;
        }
        ctx.clear_error();
        if ctx.write(StepData::Summary(SummaryData { reviewed: true })) {
            ctx.complete();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let lines = match state.template_data() {
            Ok(payload) => {
                let mut lines = vec![
                    row("Name", payload.name.clone()),
                    row("Description", payload.description.clone()),
                    row("Category", self.category_name(&payload.category_id).to_string()),
                    row("Tags", payload.tags.join(", ")),
                    row(
                        "Source file",
                        format!("{} ({})", payload.source_file_name, payload.source_mime_type),
                    ),
                    row("Preview", payload.preview_image_url.clone()),
                ];
                if state.is_png_component_definition_required() {
                    lines.push(row("Components", payload.components.len().to_string()));
                    for region in &payload.components {
                        lines.push(hint_line(&format!(
                            "      {} {} ({}x{})",
                            region.kind.label(),
                            region.label,
                            region.width,
                            region.height
                        )));
                    }
                }
                lines.push(hint_line(""));
                lines.push(hint_line("  Enter: looks good, continue"));
                lines
            }
            Err(e) => vec![
                Line::from(Span::styled(e.to_string(), Style::default().fg(ERROR_RED))),
                hint_line("  Go back (PgUp) and fill in the missing step"),
            ],
        };

        let paragraph = Paragraph::new(lines)
            .block(step_block(self.step()))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
