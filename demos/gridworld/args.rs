use std::{error::Error, path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use gridq::{
    algo::{QLearning, QTableAgent, QTableAgentConfig, Sarsa},
    exploration::EpsilonGreedy,
    Grid, GridWorld, Pos, Spawn, TrainerConfig,
};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Rule {
    Q,
    Sarsa,
}

/// Train tabular agents to walk to the goal of a grid
#[derive(Parser, Debug)]
pub struct Args {
    /// Grid width
    #[arg(long, default_value_t = 11)]
    pub width: usize,
    /// Grid height
    #[arg(long, default_value_t = 11)]
    pub height: usize,
    /// Goal cell as `x,y`, defaults to the center
    #[arg(long, value_parser = parse_pos)]
    pub goal: Option<Pos>,
    /// Fixed spawn cell as `x,y`, random over the grid if omitted
    #[arg(long, value_parser = parse_pos)]
    pub spawn: Option<Pos>,
    /// Episodes per agent
    #[arg(short, long, default_value_t = 200)]
    pub episodes: u32,
    /// Pause after every decision, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,
    /// Exploration rate
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f32,
    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    pub alpha: f32,
    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f32,
    /// Learning rule
    #[arg(long, value_enum, default_value_t = Rule::Q)]
    pub rule: Rule,
    /// Number of independent agents sharing the grid
    #[arg(long, default_value_t = 1)]
    pub agents: usize,
    /// Base seed, agent `i` uses `seed + i`
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Write per-episode stats of every agent to this CSV file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

fn parse_pos(s: &str) -> Result<Pos, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(Pos::new(x, y))
}

impl Args {
    pub fn world(&self) -> Result<GridWorld, Box<dyn Error>> {
        let goal = self
            .goal
            .unwrap_or(Pos::new(self.width / 2, self.height / 2));
        Ok(GridWorld::new(Grid::new(self.width, self.height, goal)?))
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            episodes: self.episodes,
            delay: Duration::from_millis(self.delay_ms),
        }
    }

    pub fn agent_config(&self, agent: usize) -> Result<QTableAgentConfig, Box<dyn Error>> {
        Ok(QTableAgentConfig {
            exploration: EpsilonGreedy::constant(self.epsilon)?,
            alpha: self.alpha,
            gamma: self.gamma,
            seed: self.seed + agent as u64,
        })
    }

    /// Spawn generator for agent `i`
    pub fn spawner(&self, agent: usize) -> Box<dyn Spawn + Send> {
        match self.spawn {
            Some(pos) => Box::new(gridq::FixedSpawn(pos)),
            None => Box::new(gridq::RandomSpawn::new(
                self.seed.wrapping_add(1000 + agent as u64),
            )),
        }
    }
}

/// A learner of either rule, chosen at runtime
pub enum AnyAgent<'a> {
    Q(QTableAgent<'a, QLearning>),
    Sarsa(QTableAgent<'a, Sarsa>),
}

impl<'a> AnyAgent<'a> {
    pub fn new(rule: Rule, env: &'a GridWorld, config: QTableAgentConfig) -> Result<Self, Box<dyn Error>> {
        Ok(match rule {
            Rule::Q => AnyAgent::Q(QTableAgent::new(env, config)?),
            Rule::Sarsa => AnyAgent::Sarsa(QTableAgent::new(env, config)?),
        })
    }
}
