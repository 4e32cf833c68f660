//! The knight learns to reach the princess on a 5x5 board while avoiding enemies,
//! then walks the learned route.
//!
//! Run with `cargo run --example princess --features viz`. Press `q` once training
//! is done to leave the dashboard and start the walk.

use std::{collections::HashMap, error::Error, io};

use knight::{play, viz, Board, PlayConfig, QTable, TrainConfig, Trainer};
use rand::thread_rng;

const ITERATIONS: u32 = 500;

fn main() -> Result<(), Box<dyn Error>> {
    // O: nothing, E: enemy, P: princess
    let tiles: Vec<Vec<char>> = [
        "OOOOO", //
        "OEOEO", //
        "OOOOO", //
        "EEOOO", //
        "OOPOO", //
    ]
    .iter()
    .map(|row| row.chars().collect())
    .collect();
    let costs = HashMap::from([('O', -1), ('E', -100), ('P', 100)]);

    let mut board = Board::new(tiles, &costs, 'K')?;
    let mut table = QTable::for_board(&board);
    let mut trainer = Trainer::new(
        TrainConfig::new(ITERATIONS)
            .learn_rate(0.1)
            .discount(0.9)
            .epsilon(1.0),
    );

    let (handle, tx) = viz::init(&["estimate", "reward", "steps"], ITERATIONS);

    let mut iteration = 0;
    trainer.train_with(&mut table, &board, &mut thread_rng(), |summary, table| {
        iteration += summary.steps;
        let update = viz::Update {
            iteration,
            episode: summary.index,
            data: vec![summary.estimate, summary.reward, f64::from(summary.steps)],
            policy: Some(table.policy_grid()),
        };
        let _ = tx.send(update);
    });
    drop(tx);

    handle.join().map_err(|_| "dashboard thread panicked")??;

    play(&table, &mut board, &PlayConfig::default(), &mut io::stdout())?;
    Ok(())
}
