// ABOUTME: Component definition step: marks rectangles over a PNG upload as typed components

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
use crate::wizard::{
    ComponentDefinitionData, ComponentKind, ComponentRegion, LogicalStep, StepContext, StepData,
    StepView, WizardState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Kind,
    Label,
    Bounds,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Kind => Self::Label,
            Self::Label => Self::Bounds,
            Self::Bounds => Self::Kind,
        }
    }
}

/// Parse `x,y,width,height` (commas or spaces); width and height must be positive
pub fn parse_bounds(input: &str) -> Result<(u32, u32, u32, u32), String> {
    let parts: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    let [x, y, width, height] = parts.as_slice() else {
        return Err("Bounds need four numbers: x, y, width, height".to_string());
    };

    let parse = |name: &str, value: &str| {
        value
            .parse::<u32>()
            .map_err(|_| format!("{name} must be a whole number, got '{value}'"))
    };
    let bounds = (
        parse("x", x)?,
        parse("y", y)?,
        parse("width", width)?,
        parse("height", height)?,
    );
    if bounds.2 == 0 || bounds.3 == 0 {
        return Err("Width and height must be greater than zero".to_string());
    }
    Ok(bounds)
}

pub struct ComponentDefinitionStepView {
    regions: Vec<ComponentRegion>,
    kind_index: usize,
    label: TextInput,
    bounds: TextInput,
    focus: Focus,
}

impl ComponentDefinitionStepView {
    pub fn new(state: &WizardState) -> Self {
        let regions = match state.step_data(LogicalStep::ComponentDefinition) {
            Some(StepData::ComponentDefinition(data)) => data.regions.clone(),
            _ => Vec::new(),
        };
        Self {
            regions,
            kind_index: 0,
            label: TextInput::new(),
            bounds: TextInput::new(),
            focus: Focus::Kind,
        }
    }

    fn kind(&self) -> ComponentKind {
        let kinds = ComponentKind::all();
        kinds[self.kind_index % kinds.len()]
    }

    fn cycle_kind(&mut self, forward: bool) {
        let len = ComponentKind::all().len();
        self.kind_index = if forward {
            (self.kind_index + 1) % len
        } else {
            (self.kind_index + len - 1) % len
        };
    }

    fn write_regions(&self, ctx: &mut StepContext<'_>) -> bool {
        ctx.write(StepData::ComponentDefinition(ComponentDefinitionData {
            regions: self.regions.clone(),
        }))
    }

    fn add_region(&mut self, ctx: &mut StepContext<'_>) {
        match parse_bounds(self.bounds.value()) {
            Ok(bounds) => {
                let label = self.label.value().trim().to_string();
                self.regions.push(ComponentRegion::new(self.kind(), label, bounds));
                self.label.clear();
                self.bounds.clear();
                self.focus = Focus::Kind;
                ctx.clear_error();
                self.write_regions(ctx);
            }
            Err(message) => ctx.fail(message),
        }
    }

    fn finish(&mut self, ctx: &mut StepContext<'_>) {
        if self.regions.is_empty() {
            ctx.fail("Define at least one component region");
            return;
        }
        ctx.clear_error();
        if self.write_regions(ctx) {
            ctx.complete();
        }
    }
}

impl StepView for ComponentDefinitionStepView {
    fn step(&self) -> LogicalStep {
        LogicalStep::ComponentDefinition
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut StepContext<'_>) {
        match (key.code, self.focus) {
            (KeyCode::Tab, _) => self.focus = self.focus.next(),
            (KeyCode::Left, Focus::Kind) => self.cycle_kind(false),
            (KeyCode::Right, Focus::Kind) => self.cycle_kind(true),
            (KeyCode::Backspace, Focus::Kind) => {
                if self.regions.pop().is_some() {
                    self.write_regions(ctx);
                }
            }
            (KeyCode::Enter, _) if self.bounds.is_blank() => self.finish(ctx),
            (KeyCode::Enter, _) => self.add_region(ctx),
            (_, Focus::Label) => {
                self.label.handle_key(key);
            }
            (_, Focus::Bounds) => {
                self.bounds.handle_key(key);
            }
            (_, Focus::Kind) => {}
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _state: &WizardState) {
        let kind_marker = if self.focus == Focus::Kind { "▸ " } else { "  " };
        let mut lines = vec![
            hint_line("Describe each region of the image that becomes a component"),
            Line::from(vec![
                Span::styled(kind_marker, Style::default().fg(GOLD)),
                Span::styled(format!("{:<12}", "Type"), Style::default().fg(MUTED_GRAY)),
                Span::styled(format!("◂ {} ▸", self.kind().label()), Style::default().fg(SOFT_WHITE)),
            ]),
            field_line("Label", &self.label, self.focus == Focus::Label),
            field_line("x,y,w,h", &self.bounds, self.focus == Focus::Bounds),
            hint_line(""),
        ];

        if self.regions.is_empty() {
            lines.push(hint_line("  No regions yet"));
        }
        for (idx, region) in self.regions.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!(
                    "  {}. {:<10} {:<20} at ({}, {}) {}x{}",
                    idx + 1,
                    region.kind.label(),
                    region.label,
                    region.x,
                    region.y,
                    region.width,
                    region.height
                ),
                Style::default().fg(SOFT_WHITE),
            )));
        }

        lines.push(hint_line(""));
        lines.push(hint_line(
            "  Tab: next field  ←/→: type  Enter: add region (empty bounds: continue)  Backspace on type: remove last",
        ));
        frame.render_widget(Paragraph::new(lines).block(step_block(self.step())), area);
    }

    fn destroy(&mut self) {
        self.regions.clear();
    }
}
