pub mod grid;
pub mod help;
pub mod log;
pub mod plot;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::widgets::WidgetRef;

pub use self::{grid::GridView, log::Logs, plot::Plots};

/// A tab of the view that can react to key presses
pub trait Component: WidgetRef {
    /// **Returns** whether the event was consumed
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}

/// The key of a press event, ignoring releases and repeats
pub(super) fn pressed_key(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key.code),
        _ => None,
    }
}
