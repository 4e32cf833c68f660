//! Live view of a training run: per-episode plots, the current greedy policy and
//! captured log output.
//!
//! [`init`] installs `tui-logger` as the `log` backend and starts the dashboard on
//! its own thread. Feed it [`Update`]s from the training observer; dropping the
//! sender marks training as finished, and the dashboard stays up until `q` is pressed.

use std::{
    io,
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use log::LevelFilter;

pub use app::App;

mod app;
mod components;
mod tui;

/// Progress report sent to the dashboard
#[derive(Debug, Clone, Default)]
pub struct Update {
    /// Iterations completed so far in the run
    pub iteration: u32,
    /// Episode the data belongs to
    pub episode: u32,
    /// One value per plot, in the order the plots were named in [`init`]
    pub data: Vec<f64>,
    /// Greedy policy as drawn by [`QTable::policy_grid`](crate::QTable::policy_grid)
    pub policy: Option<String>,
}

/// Start the dashboard with one plot per name, tracking progress over `iterations`
///
/// **Returns** the dashboard thread and the channel to send updates on
pub fn init(
    plots: &[&'static str],
    iterations: u32,
) -> (JoinHandle<io::Result<()>>, Sender<Update>) {
    // Fails only if another logger is already installed, which then keeps receiving records
    let _ = tui_logger::init_logger(LevelFilter::Trace);
    tui_logger::set_default_level(LevelFilter::Debug);

    let (tx, rx) = mpsc::channel();
    let mut app = App::new(plots, iterations);
    let handle = thread::spawn(move || app.run(rx));
    (handle, tx)
}
