use rand::Rng;

use crate::decay::Decay;

/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

/// Epsilon greedy exploration policy with a time-decaying epsilon threshold
///
/// Explores with probability ε(t). Once ε(t) is zero or negative the policy always
/// exploits and does not touch the random number generator.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// ε at time `t`
    pub fn epsilon(&self, t: u32) -> f64 {
        self.epsilon.evaluate(f64::from(t))
    }

    /// Invoke epsilon greedy policy at time `t`
    pub fn choose<R: Rng + ?Sized>(&self, t: u32, rng: &mut R) -> Choice {
        let epsilon = self.epsilon(t);
        if epsilon > 0.0 && rng.gen::<f64>() < epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::decay::{Constant, Linear};

    #[test]
    fn extremes_are_certain() {
        let mut rng = StdRng::seed_from_u64(7);
        let always = EpsilonGreedy::new(Constant::new(1.0));
        let never = EpsilonGreedy::new(Constant::new(0.0));
        for t in 0..1000 {
            assert_eq!(always.choose(t, &mut rng), Choice::Explore);
            assert_eq!(never.choose(t, &mut rng), Choice::Exploit);
        }
    }

    #[test]
    fn zero_epsilon_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut untouched = rng.clone();
        let never = EpsilonGreedy::new(Constant::new(0.0));
        for t in 0..10 {
            never.choose(t, &mut rng);
        }
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn explore_rate_tracks_epsilon() {
        let mut rng = StdRng::seed_from_u64(42);
        let policy = EpsilonGreedy::new(Constant::new(0.25));
        let n = 20_000;
        let explored = (0..n)
            .filter(|&t| policy.choose(t, &mut rng) == Choice::Explore)
            .count();
        let rate = explored as f64 / n as f64;
        assert!((rate - 0.25).abs() < 0.02, "explore rate {rate}");
    }

    #[test]
    fn decayed_epsilon_exploits() {
        let mut rng = StdRng::seed_from_u64(3);
        let policy = EpsilonGreedy::new(Linear::over(100, 1.0, 0.0).unwrap());
        assert_eq!(policy.epsilon(0), 1.0);
        for t in 100..200 {
            assert_eq!(policy.choose(t, &mut rng), Choice::Exploit);
        }
    }
}
