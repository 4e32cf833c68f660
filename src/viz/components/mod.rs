pub mod help;
pub mod logs;
pub mod plot;
pub mod policy;

use crossterm::event::{Event, KeyCode, KeyEventKind};
pub use logs::Logs;
pub use plot::Plots;
pub use policy::Policy;
use ratatui::widgets::WidgetRef;

pub trait Component: WidgetRef {
    /// **Returns** whether the event was consumed
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}

/// Key code of a key press event
pub(super) fn event_keycode(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key.code),
        _ => None,
    }
}
