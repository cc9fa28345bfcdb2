// ABOUTME: Wizard shell component: header with step progress, step region, and navigation footer
// Only the step region changes between steps; the shell is drawn from the navigation model

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use super::theme::{
    CORNFLOWER_BLUE, DARK_BG, ERROR_RED, GOLD, MUTED_GRAY, PANEL_BG, SELECTION_GREEN, SOFT_WHITE,
    SUBDUED_BORDER, WARNING_YELLOW,
};
use crate::wizard::{IndicatorState, NavigationModel, WizardState, WizardStatus};

/// The main wizard frame around the active step-view
pub struct WizardShell {
    show_descriptions: bool,
}

impl WizardShell {
    pub fn new(show_descriptions: bool) -> Self {
        Self { show_descriptions }
    }

    /// Lay out the shell and return the area reserved for the step-view
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        nav: &NavigationModel,
        state: &WizardState,
    ) -> Rect {
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(DARK_BG)), area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // Header with progress
                Constraint::Min(10),   // Step content
                Constraint::Length(1), // Error line
                Constraint::Length(3), // Navigation footer
            ])
            .split(area);

        self.render_header(frame, layout[0], nav);
        self.render_error(frame, layout[2], nav);
        self.render_navigation(frame, layout[3], nav, state);

        if state.is_terminal() {
            self.render_finished(frame, layout[1], state);
        }
        layout[1]
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, nav: &NavigationModel) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(1), // Indicators
                Constraint::Length(1), // Gauge
                Constraint::Length(1), // Description
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "Template Upload Wizard",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  Step {} of {}", nav.current_step, nav.total_steps),
                Style::default().fg(MUTED_GRAY),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(title, rows[0]);

        frame.render_widget(
            Paragraph::new(indicator_line(nav)).alignment(Alignment::Center),
            rows[1],
        );

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(SELECTION_GREEN).bg(DARK_BG))
            .percent(nav.progress_percent);
        frame.render_widget(gauge, rows[2]);

        if self.show_descriptions {
            if let Some(current) = nav.indicators.get(nav.current_step.saturating_sub(1)) {
                let description = Paragraph::new(current.step.description())
                    .style(Style::default().fg(MUTED_GRAY))
                    .alignment(Alignment::Center);
                frame.render_widget(description, rows[3]);
            }
        }
    }

    fn render_error(&self, frame: &mut Frame, area: Rect, nav: &NavigationModel) {
        let line = if nav.submitting {
            Line::from(Span::styled(
                "  Saving template...",
                Style::default().fg(WARNING_YELLOW),
            ))
        } else if let Some(error) = &nav.error {
            Line::from(vec![
                Span::styled("  ✗ ", Style::default().fg(ERROR_RED)),
                Span::styled(error.clone(), Style::default().fg(ERROR_RED)),
            ])
        } else {
            Line::default()
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_finished(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let (title, lines) = match state.status() {
            WizardStatus::Completed => (
                " Template Saved ",
                vec![
                    Line::from(Span::styled(
                        "✓ Your template was created.",
                        Style::default().fg(SELECTION_GREEN).add_modifier(Modifier::BOLD),
                    )),
                    Line::default(),
                    Line::from(vec![
                        Span::styled("Template id: ", Style::default().fg(MUTED_GRAY)),
                        Span::styled(
                            state.result_id().unwrap_or_default().to_string(),
                            Style::default().fg(SOFT_WHITE),
                        ),
                    ]),
                ],
            ),
            _ => (
                " Wizard Cancelled ",
                vec![Line::from(Span::styled(
                    "Nothing was saved.",
                    Style::default().fg(WARNING_YELLOW),
                ))],
            ),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG))
            .title(title)
            .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_navigation(
        &self,
        frame: &mut Frame,
        area: Rect,
        nav: &NavigationModel,
        state: &WizardState,
    ) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(SUBDUED_BORDER))
            .style(Style::default().bg(DARK_BG));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut spans = vec![Span::styled("  ", Style::default())];
        if state.is_terminal() {
            push_key_hint(&mut spans, "r", "Start over", true);
            push_separator(&mut spans);
            push_key_hint(&mut spans, "q", "Quit", true);
        } else {
            push_key_hint(&mut spans, "PgUp", "Back", nav.back_enabled);
            push_separator(&mut spans);
            push_key_hint(&mut spans, "PgDn", nav.next_label, nav.next_enabled);
            push_separator(&mut spans);
            push_key_hint(&mut spans, "Esc", "Cancel", true);
        }

        let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(footer, inner);
    }
}

/// Step dots with titles, e.g. `● Upload → ◉ Configure → ○ Review`
pub fn indicator_line(nav: &NavigationModel) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, indicator) in nav.indicators.iter().enumerate() {
        let (icon, style) = match indicator.state {
            IndicatorState::Completed => ("●", Style::default().fg(SELECTION_GREEN)),
            IndicatorState::Current => ("◉", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            IndicatorState::Upcoming => ("○", Style::default().fg(MUTED_GRAY)),
        };

        spans.push(Span::styled(icon, style));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            indicator.step.title(),
            if indicator.state == IndicatorState::Current {
                Style::default().fg(SOFT_WHITE)
            } else {
                Style::default().fg(MUTED_GRAY)
            },
        ));

        if idx + 1 < nav.indicators.len() {
            spans.push(Span::styled(" → ", Style::default().fg(SUBDUED_BORDER)));
        }
    }
    Line::from(spans)
}

fn push_key_hint(spans: &mut Vec<Span<'static>>, key: &'static str, label: &'static str, enabled: bool) {
    let (key_style, label_style) = if enabled {
        (Style::default().fg(GOLD), Style::default().fg(SOFT_WHITE))
    } else {
        (Style::default().fg(MUTED_GRAY), Style::default().fg(MUTED_GRAY))
    };
    spans.push(Span::styled("[", Style::default().fg(SUBDUED_BORDER)));
    spans.push(Span::styled(key, key_style));
    spans.push(Span::styled("]", Style::default().fg(SUBDUED_BORDER)));
    spans.push(Span::styled(format!(" {label}"), label_style));
}

fn push_separator(spans: &mut Vec<Span<'static>>) {
    spans.push(Span::styled("  |  ", Style::default().fg(SUBDUED_BORDER)));
}
