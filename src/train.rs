use log::{debug, info, trace};
use rand::{seq::SliceRandom, thread_rng, Rng};

use crate::{
    assert_interval,
    board::Board,
    coord::{successor, to_2d, Direction},
    decay::{Constant, Decay, Linear},
    exploration::{Choice, EpsilonGreedy},
    q_table::QTable,
};

/// Configuration for a [`Trainer`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Number of transitions per call to [`Trainer::train`]
    ///
    /// **Default**: `500`
    pub iterations: u32,
    /// Learning rate α, in `[0, 1]`
    ///
    /// **Default**: `0.1`
    pub learn_rate: f64,
    /// Discount factor γ, in `[0, 1]`
    ///
    /// **Default**: `0.9`
    pub discount: f64,
    /// Exploration probability at the first iteration, in `[0, 1]`
    ///
    /// **Default**: `1.0`
    pub epsilon: f64,
    /// Decay epsilon linearly to zero over `iterations`
    ///
    /// **Default**: `true`
    pub decay: bool,
    /// State every episode starts from
    ///
    /// **Default**: `0`
    pub start: usize,
    /// The episode is lost once its accumulated value drops below this
    ///
    /// **Default**: `-100.0`
    pub lower: f64,
    /// The episode is won once its accumulated value rises above this
    ///
    /// **Default**: `90.0`
    pub upper: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            learn_rate: 0.1,
            discount: 0.9,
            epsilon: 1.0,
            decay: true,
            start: 0,
            lower: -100.0,
            upper: 90.0,
        }
    }
}

impl TrainConfig {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    pub fn learn_rate(mut self, learn_rate: f64) -> Self {
        self.learn_rate = learn_rate;
        self
    }

    pub fn discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn decay(mut self, decay: bool) -> Self {
        self.decay = decay;
        self
    }

    /// Epsilon greedy policy described by `epsilon` and `decay`
    pub fn exploration(&self) -> EpsilonGreedy<Box<dyn Decay>> {
        let schedule: Box<dyn Decay> = match Linear::over(self.iterations, self.epsilon, 0.0) {
            Ok(linear) if self.decay => Box::new(linear),
            _ => Box::new(Constant::new(self.epsilon)),
        };
        EpsilonGreedy::new(schedule)
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// Accumulated value rose above the upper threshold
    Won,
    /// Accumulated value fell below the lower threshold
    Lost,
}

/// Record of a finished episode, handed to the observer of [`Trainer::train_with`]
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    /// Episodes finished before this one by the same trainer
    pub index: u32,
    pub steps: u32,
    /// Sum of the Q-values of the pairs taken, read before each update.
    /// This is what the thresholds are checked against.
    pub estimate: f64,
    /// Sum of the board rewards actually collected
    pub reward: f64,
    pub outcome: EpisodeOutcome,
}

/// Totals for one call to [`Trainer::train`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainReport {
    pub iterations: u32,
    pub episodes: u32,
    pub wins: u32,
    pub losses: u32,
}

#[derive(Debug, Clone, Default)]
struct Episode {
    steps: u32,
    estimate: f64,
    reward: f64,
}

/// Episodic Q-learning driver for a knight on a [`Board`]
///
/// The trainer owns the position of the current episode, so successive calls to
/// [`train`](Trainer::train) pick up where the previous one stopped. The table is
/// passed in by reference and is the only thing training writes to.
pub struct Trainer<D: Decay = Box<dyn Decay>> {
    config: TrainConfig,
    exploration: EpsilonGreedy<D>,
    state: usize,
    episode: Episode,
    episodes: u32,
}

impl Trainer {
    /// Initialize a trainer from a config
    ///
    /// **Panics** if `learn_rate`, `discount` or `epsilon` is not in the interval `[0,1]`
    pub fn new(config: TrainConfig) -> Self {
        let exploration = config.exploration();
        Self::with_exploration(config, exploration)
    }
}

impl<D: Decay> Trainer<D> {
    /// Initialize a trainer with a custom exploration schedule
    ///
    /// `config.epsilon` and `config.decay` are ignored.
    ///
    /// **Panics** if `learn_rate`, `discount` or `epsilon` is not in the interval `[0,1]`
    pub fn with_exploration(config: TrainConfig, exploration: EpsilonGreedy<D>) -> Self {
        assert_interval!(config.learn_rate, 0.0, 1.0);
        assert_interval!(config.discount, 0.0, 1.0);
        assert_interval!(config.epsilon, 0.0, 1.0);
        Self {
            state: config.start,
            config,
            exploration,
            episode: Episode::default(),
            episodes: 0,
        }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// State the knight is currently in
    pub fn state(&self) -> usize {
        self.state
    }

    /// Accumulated value of the current episode
    pub fn accumulated(&self) -> f64 {
        self.episode.estimate
    }

    /// Episodes finished so far, across all calls
    pub fn episodes(&self) -> u32 {
        self.episodes
    }

    /// Pick a direction from `state` at iteration `t`
    ///
    /// Explores uniformly over the legal directions, or exploits the best one.
    pub fn select_action<R: Rng + ?Sized>(
        &self,
        table: &QTable,
        state: usize,
        t: u32,
        rng: &mut R,
    ) -> Direction {
        match self.exploration.choose(t, rng) {
            Choice::Explore => *table
                .legal_directions(state)
                .choose(rng)
                .expect("every state has a legal direction"),
            Choice::Exploit => table.best_direction(state),
        }
    }

    /// Train `table` on `board` for `config.iterations` transitions
    pub fn train<T>(&mut self, table: &mut QTable, board: &Board<T>) -> TrainReport {
        self.train_with(table, board, &mut thread_rng(), |_, _| {})
    }

    /// Train with a caller-provided rng, calling `on_episode` each time an episode ends
    ///
    /// The observer also sees the table as updated by the episode's last step.
    ///
    /// **Panics** if `table` was not built for a board the size of `board`, or if the
    /// start state is off the board.
    pub fn train_with<T, R, F>(
        &mut self,
        table: &mut QTable,
        board: &Board<T>,
        rng: &mut R,
        mut on_episode: F,
    ) -> TrainReport
    where
        R: Rng + ?Sized,
        F: FnMut(&EpisodeSummary, &QTable),
    {
        assert_eq!(
            table.width(),
            board.width(),
            "Q-table and board sizes differ"
        );
        assert!(
            self.config.start < table.num_states(),
            "start state {} is off the board",
            self.config.start
        );

        let width = board.width();
        let TrainConfig {
            iterations,
            learn_rate,
            discount,
            lower,
            upper,
            ..
        } = self.config;
        let mut report = TrainReport {
            iterations,
            ..Default::default()
        };

        for i in 0..iterations {
            let state = self.state;
            let dir = self.select_action(table, state, i, rng);

            // The accumulator sees the estimate before it is updated
            self.episode.estimate += table.row(state)[dir.index()];
            let next_state = successor(state, dir, width);

            let (row, col) = to_2d(state, width);
            let reward = f64::from(board.reward_at(row, col));
            self.episode.reward += reward;
            self.episode.steps += 1;

            table.update(state, dir, reward, next_state, learn_rate, discount);

            trace!(
                "iteration {i}: state {state}, values {:?}, chose {dir}, accumulated {:.3}",
                table.row(state),
                self.episode.estimate
            );

            let outcome = if self.episode.estimate < lower {
                Some(EpisodeOutcome::Lost)
            } else if self.episode.estimate > upper {
                Some(EpisodeOutcome::Won)
            } else {
                None
            };

            match outcome {
                Some(outcome) => {
                    let episode = std::mem::take(&mut self.episode);
                    let summary = EpisodeSummary {
                        index: self.episodes,
                        steps: episode.steps,
                        estimate: episode.estimate,
                        reward: episode.reward,
                        outcome,
                    };
                    debug!(
                        "episode {} {:?} after {} steps (estimate {:.3}, reward {})",
                        summary.index, outcome, summary.steps, summary.estimate, summary.reward
                    );
                    on_episode(&summary, &*table);

                    match outcome {
                        EpisodeOutcome::Won => report.wins += 1,
                        EpisodeOutcome::Lost => report.losses += 1,
                    }
                    report.episodes += 1;
                    self.episodes += 1;
                    self.state = self.config.start;
                }
                None => self.state = next_state,
            }
        }

        info!(
            "trained {} iterations: {} episodes, {} won, {} lost",
            report.iterations, report.episodes, report.wins, report.losses
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{rngs::StdRng, SeedableRng};
    use statrs::distribution::{ChiSquared, ContinuousCDF};

    use super::*;
    use crate::{
        board::tests::{costs, grid},
        q_table::tests::same_values,
    };

    fn board(rows: &[&str]) -> Board<char> {
        Board::new(grid(rows), &costs(), 'K').unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = TrainConfig::new(1000);
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.learn_rate, 0.1);
        assert_eq!(config.discount, 0.9);
        assert_eq!(config.epsilon, 1.0);
        assert!(config.decay);

        let exploration = config.exploration();
        assert_eq!(exploration.epsilon(0), 1.0);
        assert!((exploration.epsilon(500) - 0.5).abs() < 1e-9);

        let flat = TrainConfig::new(1000).epsilon(0.3).decay(false).exploration();
        assert_eq!(flat.epsilon(0), 0.3);
        assert_eq!(flat.epsilon(999), 0.3);
    }

    #[test]
    #[should_panic(expected = "learn_rate")]
    fn learn_rate_out_of_range() {
        Trainer::new(TrainConfig::new(10).learn_rate(1.5));
    }

    #[test]
    fn accumulates_estimate_before_update() {
        let board = board(&["OO", "OO"]);
        let mut table = QTable::for_board(&board);
        let mut trainer = Trainer::new(TrainConfig::new(1).epsilon(0.0).decay(false));

        table.update(0, Direction::Right, 50.0, 3, 0.1, 0.0);
        assert_eq!(table.get(0, Direction::Right), Some(5.0));

        trainer.train_with(&mut table, &board, &mut StdRng::seed_from_u64(0), |_, _| {});
        assert_eq!(trainer.accumulated(), 5.0);
        assert_eq!(trainer.state(), 1);
        // 5 + 0.1 * (-1 + 0.9 * 0 - 5)
        let value = table.get(0, Direction::Right).unwrap();
        assert!((value - 4.4).abs() < 1e-12, "{value}");
    }

    #[test]
    fn reward_comes_from_current_tile() {
        let board = board(&["PO", "OO"]);
        let mut table = QTable::for_board(&board);
        let mut trainer = Trainer::new(TrainConfig::new(1).epsilon(0.0).decay(false));

        trainer.train_with(&mut table, &board, &mut StdRng::seed_from_u64(0), |_, _| {});
        assert_eq!(table.get(0, Direction::Right), Some(10.0));
    }

    #[test]
    fn episode_resets_past_threshold() {
        let board = board(&["OO", "OO"]);
        let mut table = QTable::for_board(&board);
        table.update(0, Direction::Right, 50.0, 3, 0.1, 0.0);

        let config = TrainConfig {
            iterations: 1,
            epsilon: 0.0,
            decay: false,
            upper: 3.0,
            ..Default::default()
        };
        let mut trainer = Trainer::new(config);
        let mut summaries = Vec::new();
        let report = trainer.train_with(&mut table, &board, &mut StdRng::seed_from_u64(0), |s, _| {
            summaries.push(s.clone())
        });

        assert_eq!(
            report,
            TrainReport {
                iterations: 1,
                episodes: 1,
                wins: 1,
                losses: 0
            }
        );
        assert_eq!(
            summaries,
            [EpisodeSummary {
                index: 0,
                steps: 1,
                estimate: 5.0,
                reward: -1.0,
                outcome: EpisodeOutcome::Won,
            }]
        );
        assert_eq!(trainer.state(), 0);
        assert_eq!(trainer.accumulated(), 0.0);
        assert_eq!(trainer.episodes(), 1);
    }

    #[test]
    fn losing_episodes_reset() {
        let board = board(&["EE", "EE"]);
        let mut table = QTable::for_board(&board);
        let mut trainer = Trainer::new(TrainConfig::new(2000));
        let report = trainer.train_with(&mut table, &board, &mut StdRng::seed_from_u64(9), |s, _| {
            assert_eq!(s.outcome, EpisodeOutcome::Lost);
            assert!(s.estimate < -100.0);
        });
        assert!(report.losses > 0);
        assert_eq!(report.wins, 0);
        assert_eq!(report.episodes, report.losses);
    }

    #[test]
    fn masked_pairs_survive_training() {
        let board = board(&["OOO", "OEO", "OOP"]);
        let mut table = QTable::for_board(&board);
        let mut trainer = Trainer::new(TrainConfig::new(5000).decay(false));
        trainer.train_with(&mut table, &board, &mut StdRng::seed_from_u64(1), |_, _| {});

        let fresh = QTable::for_board(&board);
        for state in 0..table.num_states() {
            for dir in [
                Direction::Up,
                Direction::Right,
                Direction::Down,
                Direction::Left,
            ] {
                assert_eq!(fresh.is_legal(state, dir), table.is_legal(state, dir));
            }
            assert!(table.row(state).iter().all(|v| !v.is_infinite()));
        }
    }

    #[test]
    fn zero_learn_rate_leaves_table_untouched() {
        let board = board(&["OOO", "OEO", "OOP"]);
        let mut table = QTable::for_board(&board);
        let mut trainer = Trainer::new(TrainConfig::new(2000).learn_rate(0.0));
        trainer.train_with(&mut table, &board, &mut StdRng::seed_from_u64(2), |_, _| {});
        assert!(same_values(&table, &QTable::for_board(&board)));
    }

    #[test]
    fn greedy_training_is_deterministic() {
        let board = board(&["OOO", "OEO", "OOP"]);
        let mut seed = QTable::for_board(&board);
        // Some structure so the greedy walk is not trivial
        seed.update(0, Direction::Down, 3.0, 3, 1.0, 0.0);
        seed.update(3, Direction::Right, -2.0, 4, 1.0, 0.0);

        let config = TrainConfig::new(300).epsilon(0.0).decay(false);
        let mut a = seed.clone();
        let mut b = seed.clone();
        Trainer::new(config.clone()).train_with(&mut a, &board, &mut StdRng::seed_from_u64(1), |_, _| {});
        Trainer::new(config).train_with(&mut b, &board, &mut StdRng::seed_from_u64(2), |_, _| {});
        assert!(same_values(&a, &b));
        assert!(!same_values(&a, &seed));
    }

    fn chi_squared_uniform(state: usize, draws: usize) {
        let board = board(&["OOO", "OOO", "OOO"]);
        let table = QTable::for_board(&board);
        let trainer = Trainer::new(TrainConfig::new(draws as u32).decay(false));
        let mut rng = StdRng::seed_from_u64(state as u64);

        let legal = table.legal_directions(state);
        let mut counts: HashMap<Direction, usize> = HashMap::new();
        for t in 0..draws {
            let dir = trainer.select_action(&table, state, t as u32, &mut rng);
            assert!(legal.contains(&dir), "{dir} is not legal from {state}");
            *counts.entry(dir).or_default() += 1;
        }

        let expected = draws as f64 / legal.len() as f64;
        let statistic: f64 = legal
            .iter()
            .map(|dir| {
                let observed = *counts.get(dir).unwrap_or(&0) as f64;
                (observed - expected).powi(2) / expected
            })
            .sum();
        let critical = ChiSquared::new((legal.len() - 1) as f64)
            .unwrap()
            .inverse_cdf(0.999);
        assert!(
            statistic < critical,
            "state {state}: chi2 {statistic} >= {critical}, counts {counts:?}"
        );
    }

    #[test]
    fn full_exploration_is_uniform_over_legal_directions() {
        chi_squared_uniform(4, 8000); // interior
        chi_squared_uniform(1, 6000); // top edge
        chi_squared_uniform(8, 4000); // corner
    }

    #[test]
    fn learns_to_avoid_the_enemy() {
        // Princess below the start, enemy to its right
        let board = board(&["OEO", "POO", "OOO"]);
        for seed in 0..5 {
            let mut table = QTable::for_board(&board);
            let mut trainer = Trainer::new(TrainConfig::new(10_000));
            trainer.train_with(&mut table, &board, &mut StdRng::seed_from_u64(seed), |_, _| {});
            assert_eq!(
                table.best_direction(0),
                Direction::Down,
                "seed {seed}: {:?}",
                table.row(0)
            );
        }
    }

    #[test]
    fn training_continues_the_current_episode() {
        let board = board(&["OOO", "OOO", "OOO"]);
        let mut table = QTable::for_board(&board);
        let mut trainer = Trainer::new(TrainConfig::new(1).epsilon(0.0).decay(false));
        let mut rng = StdRng::seed_from_u64(0);
        trainer.train_with(&mut table, &board, &mut rng, |_, _| {});
        let after_first = trainer.state();
        assert_ne!(after_first, 0);
        trainer.train_with(&mut table, &board, &mut rng, |_, _| {});
        assert_ne!(trainer.state(), after_first);
    }
}
