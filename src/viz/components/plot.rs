use crossterm::event::{Event, KeyCode};
use ratatui::{prelude::*, style::Stylize, widgets::*};

use super::{event_keycode, Component};

/// Scatter plot of one metric against episode number
pub struct Plot {
    title: &'static str,
    x_bounds: [f64; 2],
    y_bounds: Option<[f64; 2]>,
    data: Vec<(f64, f64)>,
}

impl Plot {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            x_bounds: [0.0, 1.0],
            y_bounds: None,
            data: Vec::new(),
        }
    }

    pub fn push(&mut self, point: (f64, f64)) {
        let (x, y) = point;
        self.x_bounds[1] = self.x_bounds[1].max(x);
        self.y_bounds = Some(match self.y_bounds {
            Some([lo, hi]) => [lo.min(y), hi.max(y)],
            None => [y - 1.0, y + 1.0],
        });
        self.data.push(point);
    }

    fn labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
        bounds.iter().map(|b| format!("{b:.1}").bold()).collect()
    }
}

impl WidgetRef for Plot {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let y_bounds = self.y_bounds.unwrap_or([-1.0, 1.0]);

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Scatter)
            .cyan()
            .data(&self.data);

        let x_axis = Axis::default()
            .title("Episode")
            .dark_gray()
            .labels(Self::labels(self.x_bounds))
            .bounds(self.x_bounds);

        let y_axis = Axis::default()
            .title(self.title)
            .dark_gray()
            .labels(Self::labels(y_bounds))
            .bounds(y_bounds);

        Chart::new(vec![dataset])
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .padding(Padding::uniform(2)),
            )
            .x_axis(x_axis)
            .y_axis(y_axis)
            .render(area, buf);
    }
}

/// One [`Plot`] per metric, browsed with the arrow keys
pub struct Plots {
    plots: Vec<Plot>,
    selected: usize,
}

impl Plots {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            plots: names.iter().copied().map(Plot::new).collect(),
            selected: 0,
        }
    }

    /// Add one point per plot at `episode`
    pub fn update(&mut self, episode: u32, data: &[f64]) {
        for (plot, &value) in self.plots.iter_mut().zip(data) {
            plot.push((f64::from(episode), value));
        }
    }
}

impl WidgetRef for Plots {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let [tabs_area, plot_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

        Tabs::new(self.plots.iter().map(|p| p.title))
            .white()
            .highlight_style(Style::default().light_green())
            .select(self.selected)
            .render(tabs_area, buf);

        if let Some(plot) = self.plots.get(self.selected) {
            plot.render_ref(plot_area, buf);
        }
    }
}

impl Component for Plots {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        let len = self.plots.len();
        if len == 0 {
            return false;
        }
        match event_keycode(event) {
            Some(KeyCode::Right) => self.selected = (self.selected + 1) % len,
            Some(KeyCode::Left) => self.selected = (self.selected + len - 1) % len,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_grow_with_data() {
        let mut plot = Plot::new("reward");
        plot.push((0.0, 5.0));
        assert_eq!(plot.y_bounds, Some([4.0, 6.0]));
        plot.push((10.0, -3.0));
        plot.push((4.0, 12.0));
        assert_eq!(plot.x_bounds, [0.0, 10.0]);
        assert_eq!(plot.y_bounds, Some([-3.0, 12.0]));
        assert_eq!(plot.data.len(), 3);
    }

    #[test]
    fn plots_cycle() {
        use crossterm::event::{KeyEvent, KeyModifiers};

        let mut plots = Plots::new(&["reward", "steps"]);
        let right = Event::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        let left = Event::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        assert!(plots.handle_ui_event(&right));
        assert_eq!(plots.selected, 1);
        assert!(plots.handle_ui_event(&right));
        assert_eq!(plots.selected, 0);
        assert!(plots.handle_ui_event(&left));
        assert_eq!(plots.selected, 1);

        plots.update(3, &[1.0, 2.0]);
        assert_eq!(plots.plots[1].data, [(3.0, 2.0)]);
    }
}
