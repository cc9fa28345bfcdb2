// ABOUTME: Event handling for keyboard input and the wizard actions it maps to

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::AppState;
use crate::wizard::Confirmation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    Next,
    Back,
    RequestCancel,
    CancelAnswered(Confirmation),
    Reset,
    /// Key forwarded to the active step-view
    StepInput(KeyEvent),
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            return Some(AppEvent::Quit);
        }

        // The dialog is modal
        if let Some(dialog) = state.confirmation_dialog.as_mut() {
            return dialog.handle_key(key).map(AppEvent::CancelAnswered);
        }

        if state.wizard_finished {
            return match key.code {
                KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => Some(AppEvent::Quit),
                KeyCode::Char('r') => Some(AppEvent::Reset),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc => Some(AppEvent::RequestCancel),
            KeyCode::PageDown => Some(AppEvent::Next),
            KeyCode::PageUp => Some(AppEvent::Back),
            KeyCode::Char('n') if ctrl => Some(AppEvent::Next),
            KeyCode::Char('b') if ctrl => Some(AppEvent::Back),
            _ => Some(AppEvent::StepInput(key)),
        }
    }
}
