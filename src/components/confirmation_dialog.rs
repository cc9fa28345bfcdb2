// ABOUTME: Confirmation dialog for yes/no prompts with keyboard navigation
// Produces a Confirmation value instead of acting on the wizard itself

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::wizard::Confirmation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationDialog {
    pub title: String,
    pub message: String,
    pub warning: Option<String>,
    pub selected_option: bool, // true = Yes, false = No
}

impl ConfirmationDialog {
    /// Prompt shown before discarding an in-progress wizard
    pub fn cancel_wizard() -> Self {
        Self {
            title: " Cancel Template Upload ".to_string(),
            message: "Leave the wizard? Everything entered so far will be lost.".to_string(),
            warning: Some("This discards all step data".to_string()),
            selected_option: false,
        }
    }

    pub fn toggle(&mut self) {
        self.selected_option = !self.selected_option;
    }

    /// Returns the answer once the user has made one
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Confirmation> {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h' | 'l') => {
                self.toggle();
                None
            }
            KeyCode::Char('y' | 'Y') => Some(Confirmation::Confirmed),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Confirmation::Declined),
            KeyCode::Enter => Some(Confirmation::from(self.selected_option)),
            _ => None,
        }
    }
}

pub struct ConfirmationDialogComponent;

impl ConfirmationDialogComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, dialog: &ConfirmationDialog) {
        // Calculate dialog size (center it)
        let dialog_width = 60.min(area.width.saturating_sub(4));
        let dialog_height = if dialog.warning.is_some() { 11 } else { 8 };
        let dialog_height = dialog_height.min(area.height);

        let dialog_area = Rect {
            x: area.x + (area.width - dialog_width) / 2,
            y: area.y + (area.height - dialog_height) / 2,
            width: dialog_width,
            height: dialog_height,
        };

        // Clear ONLY the dialog area, not the entire screen
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(dialog.title.clone())
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Black));
        let inner_area = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let constraints = if dialog.warning.is_some() {
            vec![
                Constraint::Length(3), // Warning
                Constraint::Min(1),    // Message
                Constraint::Length(2), // Buttons
            ]
        } else {
            vec![
                Constraint::Min(1),    // Message
                Constraint::Length(2), // Buttons
            ]
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner_area);

        let (message_chunk, button_chunk) = if let Some(warning_text) = &dialog.warning {
            let warning = Paragraph::new(warning_text.as_str())
                .style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });

            frame.render_widget(warning, chunks[0]);
            (1, 2)
        } else {
            (0, 1)
        };

        let message = Paragraph::new(dialog.message.clone())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White));
        frame.render_widget(message, chunks[message_chunk]);

        let button_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[button_chunk]);

        let selected = Style::default().fg(Color::Black).bg(Color::White);
        let unselected = Style::default().fg(Color::White);

        let yes_button = Paragraph::new("Yes")
            .style(if dialog.selected_option { selected } else { unselected })
            .alignment(Alignment::Center);
        frame.render_widget(yes_button, button_chunks[0]);

        let no_button = Paragraph::new("No")
            .style(if dialog.selected_option { unselected } else { selected })
            .alignment(Alignment::Center);
        frame.render_widget(no_button, button_chunks[1]);
    }
}

impl Default for ConfirmationDialogComponent {
    fn default() -> Self {
        Self::new()
    }
}
