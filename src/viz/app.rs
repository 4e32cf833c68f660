use std::{
    io,
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use crossterm::event::{self, Event, KeyCode};
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{event_keycode, help::render_help, Component, Logs, Plots, Policy},
    tui::Tui,
    Update,
};

const TABS: [&str; 3] = ["Plots", "Policy", "Logs"];

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    #[default]
    Train,
    /// Training dropped its sender; keep showing the results
    Done,
    Quit,
}

/// The root TUI component which holds the dashboard state and runs the render loop
pub struct App {
    state: State,
    iteration: u32,
    total_iterations: u32,
    selected_tab: usize,
    show_help: bool,
    plots: Plots,
    policy: Policy,
    logs: Logs,
}

impl App {
    pub fn new(plots: &[&'static str], iterations: u32) -> Self {
        Self {
            state: State::default(),
            iteration: 0,
            total_iterations: iterations,
            selected_tab: 0,
            show_help: false,
            plots: Plots::new(plots),
            policy: Policy::default(),
            logs: Logs::new(),
        }
    }

    /// Initialize the terminal and run the main loop until `q` is pressed
    ///
    /// Restores the terminal on exit
    pub fn run(&mut self, rx: Receiver<Update>) -> io::Result<()> {
        let mut tui = Tui::enter()?;

        while self.state != State::Quit {
            if self.state == State::Train {
                self.drain(&rx);
            }

            tui.terminal
                .draw(|frame| frame.render_widget(&*self, frame.size()))?;

            if event::poll(Duration::from_millis(16))? {
                let event = event::read()?;
                self.handle_event(&event);
            }
        }

        Ok(())
    }

    fn drain(&mut self, rx: &Receiver<Update>) {
        loop {
            match rx.try_recv() {
                Ok(update) => self.apply(update),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::info!("training finished, press q to exit");
                    self.state = State::Done;
                    self.iteration = self.total_iterations;
                    break;
                }
            }
        }
    }

    fn apply(&mut self, update: Update) {
        let Update {
            iteration,
            episode,
            data,
            policy,
        } = update;
        self.iteration = iteration;
        self.plots.update(episode, &data);
        if let Some(grid) = policy {
            self.policy.update(grid, episode);
        }
    }

    fn handle_event(&mut self, event: &Event) {
        match event_keycode(event) {
            Some(KeyCode::Char('q')) => self.state = State::Quit,
            Some(KeyCode::Char('h')) => self.show_help = !self.show_help,
            Some(KeyCode::Tab) => self.selected_tab = (self.selected_tab + 1) % TABS.len(),
            _ => {
                let component: &mut dyn Component = match self.selected_tab {
                    0 => &mut self.plots,
                    1 => &mut self.policy,
                    _ => &mut self.logs,
                };
                component.handle_ui_event(event);
            }
        }
    }

    fn progress(&self) -> f64 {
        if self.total_iterations == 0 {
            return 1.0;
        }
        (f64::from(self.iteration) / f64::from(self.total_iterations)).clamp(0.0, 1.0)
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [menu_area, main_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        match self.selected_tab {
            0 => self.plots.render_ref(main_area, buf),
            1 => self.policy.render_ref(main_area, buf),
            _ => self.logs.render_ref(main_area, buf),
        }

        let title = match self.state {
            State::Train => "Training",
            State::Done | State::Quit => "Done (q to exit)",
        };
        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(title),
            )
            .gauge_style(Color::Cyan)
            .ratio(self.progress())
            .render(progress_area, buf);

        if self.show_help {
            render_help(area, buf, self.selected_tab);
        }
    }
}
