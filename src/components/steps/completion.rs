// ABOUTME: Completion step: choose draft or published, then save the template

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{hint_line, step_block};
use crate::components::theme::{GOLD, SELECTION_GREEN, SOFT_WHITE};
use crate::wizard::{CompletionData, LogicalStep, StepContext, StepData, StepView, WizardState};

pub struct CompletionStepView {
    publish: bool,
}

impl CompletionStepView {
    pub fn new(state: &WizardState) -> Self {
        let publish = matches!(
            state.step_data(LogicalStep::Completion),
            Some(StepData::Completion(CompletionData { publish: true }))
        );
        Self { publish }
    }
}

impl StepView for CompletionStepView {
    fn step(&self) -> LogicalStep {
        LogicalStep::Completion
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut StepContext<'_>) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                self.publish = !self.publish;
                ctx.write(StepData::Completion(CompletionData {
                    publish: self.publish,
                }));
            }
            KeyCode::Enter => {
                if ctx.write(StepData::Completion(CompletionData {
                    publish: self.publish,
                })) {
                    ctx.complete();
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _state: &WizardState) {
        let option = |label: &'static str, selected: bool| {
            let (icon, style) = if selected {
                ("◉", Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
            } else {
                ("○", Style::default().fg(SOFT_WHITE))
            };
            Line::from(vec![Span::styled(format!("  {icon} "), style), Span::styled(label, style)])
        };

        let lines = vec![
            hint_line("How should the template be saved?"),
            hint_line(""),
            option("Save as draft", !self.publish),
            option("Publish to the template library", self.publish),
            hint_line(""),
            Line::from(Span::styled(
                "  Enter: save template",
                Style::default().fg(SELECTION_GREEN),
            )),
            hint_line("  Space: toggle draft/published"),
        ];
        frame.render_widget(Paragraph::new(lines).block(step_block(self.step())), area);
    }
}
