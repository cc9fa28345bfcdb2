// ABOUTME: Terminal host for the template wizard: app state and key handling

pub mod events;
pub mod state;

pub use events::{AppEvent, EventHandler};
pub use state::{App, AppState};
