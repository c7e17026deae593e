use log::trace;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    agent::{Exp, Learner},
    check_half_open, check_interval,
    decay::{self, Decay},
    env::{Environment, GridWorld},
    episode::Decision,
    error::ConfigError,
    exploration::{Choice, EpsilonGreedy},
    grid::{Action, Pos},
};

use super::{QLearning, QTable, UpdateRule};

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig<D: Decay = decay::Constant> {
    /// Exploration policy, evaluated per episode
    ///
    /// **Default**: a constant epsilon of `0.1`
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate, in `(0,1]`
    ///
    /// **Default**: `0.1`
    pub alpha: f32,
    /// Discount factor, in `[0,1]`
    ///
    /// **Default**: `0.9`
    pub gamma: f32,
    /// Seed for the agent's random number generator
    ///
    /// **Default**: `0`
    pub seed: u64,
}

impl Default for QTableAgentConfig<decay::Constant> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::constant(0.1).expect("0.1 is a valid exploration rate"),
            alpha: 0.1,
            gamma: 0.9,
            seed: 0,
        }
    }
}

impl<D: Decay> QTableAgentConfig<D> {
    /// Check the learning rate and discount factor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (alpha, gamma) = (self.alpha, self.gamma);
        check_half_open!(alpha, 0.0, 1.0);
        check_interval!(gamma, 0.0, 1.0);
        Ok(())
    }
}

/// A tabular agent that learns to reach the goal of a [`GridWorld`]
///
/// The learning rule is picked at construction through `R`: [`QLearning`] by default, or
/// [`Sarsa`](super::Sarsa) for on-policy learning. The value table belongs to the agent and survives
/// across episodes and training runs until [`reset_table`](Self::reset_table) is called.
///
/// The world is only borrowed, so several agents can learn in the same world at once.
pub struct QTableAgent<'a, R: UpdateRule = QLearning, D: Decay = decay::Constant> {
    env: &'a GridWorld,
    table: QTable<Pos, Action>,
    rule: R,
    exploration: EpsilonGreedy<D>,
    alpha: f32, // learning rate
    gamma: f32, // discount factor
    rng: StdRng,
    position: Pos,
    spawn: Pos,
    /// Action already chosen for the current position by an on-policy rule
    pending: Option<Action>,
    episode: u32, // completed episodes
}

impl<'a, R: UpdateRule + Default, D: Decay> QTableAgent<'a, R, D> {
    /// Initialize a new agent in `env` with an empty table
    ///
    /// **Errors** if `alpha` is not in `(0,1]` or `gamma` is not in `[0,1]`
    pub fn new(env: &'a GridWorld, config: QTableAgentConfig<D>) -> Result<Self, ConfigError> {
        Self::with_rule(env, R::default(), config)
    }
}

impl<'a, R: UpdateRule, D: Decay> QTableAgent<'a, R, D> {
    /// Initialize a new agent with an explicit update rule
    pub fn with_rule(
        env: &'a GridWorld,
        rule: R,
        config: QTableAgentConfig<D>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            env,
            table: QTable::new(),
            rule,
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            rng: StdRng::seed_from_u64(config.seed),
            position: Pos::default(),
            spawn: Pos::default(),
            pending: None,
            episode: 0,
        })
    }

    /// Start from previously learned values instead of an empty table
    pub fn with_table(mut self, table: QTable<Pos, Action>) -> Self {
        self.table = table;
        self
    }

    pub fn table(&self) -> &QTable<Pos, Action> {
        &self.table
    }

    pub fn into_table(self) -> QTable<Pos, Action> {
        self.table
    }

    /// Number of episodes completed so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.episode)
    }

    /// Forget everything learned and restart the exploration schedule
    pub fn reset_table(&mut self) {
        self.table.clear();
        self.pending = None;
        self.episode = 0;
    }

    /// The cells visited by always taking the best known action from `from`
    ///
    /// Stops at the goal or after `max_len` moves, whichever comes first. Does not touch the agent.
    pub fn greedy_path(&self, from: Pos, max_len: usize) -> Vec<Pos> {
        let mut path = vec![from];
        let mut pos = from;
        while !self.env.is_terminal(pos) && path.len() <= max_len {
            pos = self
                .env
                .apply(pos, self.table.best_action(pos, self.env.actions()));
            path.push(pos);
        }
        path
    }
}

impl<'a, R: UpdateRule, D: Decay> Learner for QTableAgent<'a, R, D> {
    fn world(&self) -> &GridWorld {
        self.env
    }

    fn choose(&mut self, state: Pos) -> Action {
        let actions = self.env.actions();
        match self.exploration.choose(self.episode, &mut self.rng) {
            Choice::Explore => *actions
                .choose(&mut self.rng)
                .expect("There is always at least one action available"),
            Choice::Exploit => self.table.best_action(state, actions),
        }
    }

    fn step(&mut self) -> Decision {
        let state = self.position;
        let action = self.pending.take().unwrap_or_else(|| self.choose(state));

        let next_state = self.env.apply(state, action);
        self.position = next_state;
        let reward = self.env.reward(next_state);

        let next_action =
            (R::ON_POLICY && !self.env.is_terminal(next_state)).then(|| self.choose(next_state));

        let q_value = self.rule.update(
            &mut self.table,
            &Exp {
                state,
                action,
                reward,
                next_state,
            },
            next_action,
            self.env.actions(),
            self.alpha,
            self.gamma,
        );
        self.pending = next_action;

        trace!(
            "{} {state} {action:?} -> {next_state} reward {reward:.2} q {q_value:.3}",
            R::NAME
        );

        Decision {
            action,
            reward,
            distance_to_goal: self.env.grid().distance_manhattan(next_state),
            position: next_state,
        }
    }

    fn reset(&mut self, spawn: Pos) {
        self.spawn = spawn;
        self.position = spawn;
        self.pending = None;
    }

    fn finish_episode(&mut self) {
        self.pending = None;
        self.episode += 1;
    }

    fn position(&self) -> Pos {
        self.position
    }

    fn spawn(&self) -> Pos {
        self.spawn
    }
}

#[cfg(test)]
mod tests {
    use strum::VariantArray;

    use crate::{algo::tabular::Sarsa, env::tests::world};

    use super::*;

    fn greedy_config() -> QTableAgentConfig {
        QTableAgentConfig {
            exploration: EpsilonGreedy::constant(0.0).unwrap(),
            alpha: 0.1,
            gamma: 0.9,
            seed: 0,
        }
    }

    #[test]
    fn rejects_bad_hyperparameters() {
        let env = world(3, 3, (2, 2));
        for (alpha, gamma) in [(0.0, 0.9), (1.5, 0.9), (0.1, -0.1), (0.1, 1.1)] {
            let config = QTableAgentConfig {
                alpha,
                gamma,
                ..greedy_config()
            };
            assert!(QTableAgent::<QLearning>::new(&env, config).is_err());
        }
        assert!(QTableAgent::<QLearning>::new(&env, greedy_config()).is_ok());
    }

    #[test]
    fn first_greedy_decision_takes_first_action() {
        let env = world(11, 11, (5, 5));
        let mut agent = QTableAgent::<QLearning>::new(&env, greedy_config()).unwrap();
        agent.reset(Pos::new(0, 0));

        let decision = agent.step();
        // Up from the top row bumps the wall
        assert_eq!(decision.action, Action::Up);
        assert_eq!(decision.position, Pos::new(0, 0));
        assert_eq!(decision.reward, -1.0);
        assert_eq!(decision.distance_to_goal, 10);
        // 0 + 0.1 * (-1 + 0.9 * 0 - 0)
        assert_eq!(agent.table().get(Pos::new(0, 0), Action::Up), -0.1);

        // Up now looks worse than the untouched actions, so Down is next
        let decision = agent.step();
        assert_eq!(decision.action, Action::Down);
        assert_eq!(decision.position, Pos::new(0, 1));
        assert_eq!(agent.position(), Pos::new(0, 1));
    }

    #[test]
    fn update_reads_next_state_before_writing() {
        let env = world(3, 1, (2, 0));
        let mut agent = QTableAgent::<QLearning>::new(
            &env,
            QTableAgentConfig {
                alpha: 1.0,
                gamma: 1.0,
                ..greedy_config()
            },
        )
        .unwrap()
        .with_table({
            let mut table = QTable::new();
            table.set(Pos::new(1, 0), Action::Right, 5.0);
            table.set(Pos::new(0, 0), Action::Right, 1.0);
            table
        });
        agent.reset(Pos::new(0, 0));

        let decision = agent.step();
        assert_eq!(decision.action, Action::Right);
        // -1/10 for the cell one away from the goal, plus the best value there
        assert_eq!(agent.table().get(Pos::new(0, 0), Action::Right), -0.1 + 5.0);
    }

    #[test]
    fn reset_keeps_table_and_reset_table_clears_it() {
        let env = world(4, 4, (3, 3));
        let mut agent = QTableAgent::<QLearning>::new(&env, greedy_config()).unwrap();
        agent.reset(Pos::new(0, 0));
        agent.step();
        agent.step();
        let learned = agent.table().clone();
        assert!(!learned.is_empty());

        agent.reset(Pos::new(1, 1));
        assert_eq!(agent.table(), &learned);
        assert_eq!(agent.spawn(), Pos::new(1, 1));
        assert_eq!(agent.position(), Pos::new(1, 1));

        agent.reset_table();
        for (state, action, _) in learned.iter() {
            assert_eq!(agent.table().get(state, action), 0.0);
        }
    }

    #[test]
    fn sarsa_commits_to_its_lookahead() {
        let env = world(5, 5, (4, 4));
        let config = QTableAgentConfig {
            exploration: EpsilonGreedy::constant(0.5).unwrap(),
            seed: 9,
            ..greedy_config()
        };
        let mut agent = QTableAgent::<Sarsa>::new(&env, config).unwrap();
        agent.reset(Pos::new(0, 0));
        for _ in 0..50 {
            let before = agent.pending;
            let decision = agent.step();
            if let Some(action) = before {
                assert_eq!(decision.action, action);
            }
            if agent.is_done() {
                assert_eq!(agent.pending, None);
                break;
            }
            assert!(agent.pending.is_some());
        }
    }

    #[test]
    fn greedy_path_follows_table() {
        let env = world(3, 3, (2, 0));
        let mut table = QTable::new();
        table.set(Pos::new(0, 0), Action::Right, 1.0);
        table.set(Pos::new(1, 0), Action::Right, 1.0);
        let agent = QTableAgent::<QLearning>::new(&env, greedy_config())
            .unwrap()
            .with_table(table);

        assert_eq!(
            agent.greedy_path(Pos::new(0, 0), 10),
            vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)]
        );
        // Capped at `max_len` moves
        assert_eq!(agent.greedy_path(Pos::new(0, 2), 3).len(), 4);
        assert_eq!(agent.greedy_path(Pos::new(2, 0), 3), vec![Pos::new(2, 0)]);
    }

    #[test]
    fn all_actions_get_explored() {
        let env = world(7, 7, (6, 6));
        let config = QTableAgentConfig {
            exploration: EpsilonGreedy::constant(1.0).unwrap(),
            seed: 1,
            ..greedy_config()
        };
        let mut agent = QTableAgent::<QLearning>::new(&env, config).unwrap();
        let mut seen = Vec::new();
        for _ in 0..200 {
            let action = agent.choose(Pos::new(3, 3));
            if !seen.contains(&action) {
                seen.push(action);
            }
        }
        assert_eq!(seen.len(), Action::VARIANTS.len());
    }
}
