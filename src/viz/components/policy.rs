use crossterm::event::Event;
use ratatui::{prelude::*, widgets::*};

use super::Component;

/// Latest greedy policy, one arrow per tile
#[derive(Default)]
pub struct Policy {
    grid: Option<String>,
    episode: u32,
}

impl Policy {
    pub fn update(&mut self, grid: String, episode: u32) {
        self.grid = Some(grid);
        self.episode = episode;
    }
}

impl WidgetRef for Policy {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(format!("Greedy policy after episode {}", self.episode))
            .padding(Padding::uniform(1));

        let text = match &self.grid {
            Some(grid) => Text::styled(
                grid.as_str(),
                Style::new().light_green().add_modifier(Modifier::BOLD),
            ),
            None => Text::styled(
                "Waiting for the first episode to finish...",
                Style::new().dark_gray(),
            ),
        };

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}

impl Component for Policy {
    fn handle_ui_event(&mut self, _event: &Event) -> bool {
        false
    }
}
