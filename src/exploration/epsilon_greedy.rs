use rand::Rng;

use crate::{
    check_interval,
    decay::{self, Decay},
    error::ConfigError,
};

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
///
/// Randomness is supplied by the caller so that a seeded generator makes a whole run reproducible.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl EpsilonGreedy<decay::Constant> {
    /// Fixed exploration rate
    ///
    /// **Errors** if `epsilon` is not in the interval `[0,1]`
    pub fn constant(epsilon: f32) -> Result<Self, ConfigError> {
        Self::new(decay::Constant::new(epsilon))
    }
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    ///
    /// **Errors** if either endpoint of the schedule is outside `[0,1]`
    pub fn new(decay: D) -> Result<Self, ConfigError> {
        let (epsilon_start, epsilon_end) = decay.endpoints();
        check_interval!(epsilon_start, 0.0, 1.0);
        check_interval!(epsilon_end, 0.0, 1.0);
        Ok(Self { epsilon: decay })
    }

    /// Exploration rate for the given episode
    pub fn epsilon(&self, episode: u32) -> f32 {
        self.epsilon.evaluate(episode as f32)
    }

    /// Invoke epsilon greedy policy for current episode
    ///
    /// Explores when a uniform sample from `[0,1)` falls below epsilon, so an epsilon of `0` never explores
    /// and an epsilon of `1` always does.
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        if rng.gen::<f32>() < self.epsilon(episode) {
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

    #[test]
    fn rejects_out_of_range_epsilon() {
        assert!(EpsilonGreedy::constant(-0.1).is_err());
        assert!(EpsilonGreedy::constant(1.1).is_err());
        assert!(EpsilonGreedy::new(decay::Linear::new(0.1, 2.0, 0.5).unwrap()).is_err());
    }

    #[test]
    fn decaying_epsilon_stays_a_probability() {
        let exponential = EpsilonGreedy::new(decay::Exponential::new(0.5, 1.0, 0.0).unwrap()).unwrap();
        let inverse = EpsilonGreedy::new(decay::InverseTime::new(2.0, 0.5, 0.0).unwrap()).unwrap();
        for episode in 0..1000 {
            assert!((0.0..=1.0).contains(&exponential.epsilon(episode)));
            assert!((0.0..=0.5).contains(&inverse.epsilon(episode)));
        }
    }

    #[test]
    fn extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(3);
        let greedy = EpsilonGreedy::constant(0.0).unwrap();
        let random = EpsilonGreedy::constant(1.0).unwrap();
        for episode in 0..200 {
            assert_eq!(greedy.choose(episode, &mut rng), Choice::Exploit);
            assert_eq!(random.choose(episode, &mut rng), Choice::Explore);
        }
    }

    #[test]
    fn explores_at_roughly_epsilon() {
        let mut rng = StdRng::seed_from_u64(11);
        let policy = EpsilonGreedy::constant(0.25).unwrap();
        let explored = (0..10_000)
            .filter(|_| policy.choose(0, &mut rng) == Choice::Explore)
            .count();
        assert!((2200..2800).contains(&explored), "explored {explored} times");
    }

    #[test]
    fn decaying_epsilon() {
        let policy = EpsilonGreedy::new(decay::Linear::new(0.5, 1.0, 0.0).unwrap()).unwrap();
        assert_eq!(policy.epsilon(0), 1.0);
        assert_eq!(policy.epsilon(1), 0.5);
        assert_eq!(policy.epsilon(5), 0.0);
    }
}
