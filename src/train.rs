use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    agent::Learner,
    ds::RingBuffer,
    episode::{Decision, Episode},
    error::{ConfigError, TrainError},
    grid::{Grid, Pos},
};

/// Number of recent episodes averaged in progress logs
const WINDOW: usize = 10;

/// Configuration for a [`Trainer`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    /// Episodes per call to [`Trainer::train`]
    ///
    /// **Default**: `100`
    pub episodes: u32,
    /// Pause after every decision, giving a renderer time to draw
    ///
    /// Has no effect on what is learned.
    ///
    /// **Default**: none
    pub delay: Duration,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            delay: Duration::ZERO,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.episodes == 0 {
            return Err(ConfigError::NoEpisodes);
        }
        Ok(())
    }
}

/// Produces the starting cell of each episode
///
/// Must always return a cell inside `grid`. Any `FnMut() -> Pos` closure is a spawn generator.
pub trait Spawn {
    fn spawn(&mut self, grid: &Grid) -> Pos;
}

impl<F: FnMut() -> Pos> Spawn for F {
    fn spawn(&mut self, _grid: &Grid) -> Pos {
        self()
    }
}

/// Always spawn on the same cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSpawn(pub Pos);

impl Spawn for FixedSpawn {
    fn spawn(&mut self, _grid: &Grid) -> Pos {
        self.0
    }
}

/// Spawn uniformly at random over the whole grid
#[derive(Debug, Clone)]
pub struct RandomSpawn {
    rng: StdRng,
}

impl RandomSpawn {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Spawn for RandomSpawn {
    fn spawn(&mut self, grid: &Grid) -> Pos {
        grid.random_pos(&mut self.rng)
    }
}

/// Receives progress from a training run of the learner `L`
///
/// Every hook gets shared references only. A closure taking `&Episode` observes finished episodes.
pub trait Observer<L: ?Sized> {
    /// Called once the learner stands on the spawn cell, before its first decision
    fn on_episode_start(&mut self, _spawn: Pos) {}

    /// Called after every decision, before the trainer pauses
    fn on_decision(&mut self, _decision: &Decision) {}

    /// Called with each sealed episode and the learner as it stands after it
    fn on_episode(&mut self, _episode: &Episode, _learner: &L) {}
}

/// An observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl<L: ?Sized> Observer<L> for Silent {}

impl<L: ?Sized, F: FnMut(&Episode)> Observer<L> for F {
    fn on_episode(&mut self, episode: &Episode, _learner: &L) {
        self(episode)
    }
}

/// Shared flag for stopping a training run from elsewhere
///
/// The run notices between decisions, never in the middle of an update.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the flag so the token can be reused for another run
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// How a training run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every requested episode reached the goal
    Completed { elapsed: Duration },
    /// Stopped through the [`CancelToken`] after `completed` whole episodes
    Cancelled { completed: u32 },
}

impl Outcome {
    /// Wall-clock time of the run, only known for runs that completed
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Outcome::Completed { elapsed } => Some(*elapsed),
            Outcome::Cancelled { .. } => None,
        }
    }
}

/// Drives a [`Learner`] through repeated episodes and keeps their traces
///
/// Every decision is followed by a suspension point: the observer hears about it, the configured delay
/// elapses and the cancel flag is checked. Episodes of one learner never overlap.
pub struct Trainer {
    config: TrainerConfig,
    cancel: CancelToken,
    history: Vec<Episode>,
    recent: RingBuffer<u32>,
}

impl Trainer {
    /// **Errors** if the configuration asks for no episodes
    pub fn new(config: TrainerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
            history: Vec::new(),
            recent: RingBuffer::new(WINDOW),
        })
    }

    /// Use an existing token, for example one shared with a UI thread
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Every episode completed so far, across all runs, oldest first
    pub fn history(&self) -> &[Episode] {
        &self.history
    }

    /// Drop the recorded episodes
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.recent = RingBuffer::new(WINDOW);
    }

    /// Mean length of the most recent episodes
    pub fn recent_mean_len(&self) -> Option<f64> {
        self.recent.mean()
    }

    /// Run the configured number of episodes
    ///
    /// Learned values carry over from earlier runs. A spawn outside the grid aborts the run before that
    /// episode starts, so the table only ever holds complete updates.
    pub fn train<L, S, O>(
        &mut self,
        agent: &mut L,
        spawn: &mut S,
        observer: &mut O,
    ) -> Result<Outcome, TrainError>
    where
        L: Learner,
        S: Spawn + ?Sized,
        O: Observer<L>,
    {
        let episodes = self.config.episodes;
        info!("training for {episodes} episodes");
        let start = Instant::now();

        for completed in 0..episodes {
            if self.cancel.is_cancelled() {
                return Ok(self.cancelled(completed));
            }

            let grid = agent.world().grid();
            let pos = spawn.spawn(grid);
            if !grid.contains(pos) {
                return Err(TrainError::SpawnOutOfBounds(pos));
            }

            let Some(episode) = self.run_episode(agent, pos, observer) else {
                return Ok(self.cancelled(completed));
            };

            let len = episode.len() as u32;
            self.recent.push(len);
            debug!(
                "episode {} from {} took {len} steps, return {:.2}",
                self.history.len(),
                episode.spawn(),
                episode.total_reward(),
            );

            observer.on_episode(&episode, agent);
            self.history.push(episode);
        }

        let elapsed = start.elapsed();
        info!(
            "finished {episodes} episodes in {elapsed:.2?}, recent mean length {:.1}",
            self.recent.mean().unwrap_or_default()
        );
        Ok(Outcome::Completed { elapsed })
    }

    /// Run one episode from `spawn` until the goal is reached
    ///
    /// Returns `None` if cancelled part way. Decisions completed before the cancellation stay learned.
    fn run_episode<L: Learner, O: Observer<L>>(
        &self,
        agent: &mut L,
        spawn: Pos,
        observer: &mut O,
    ) -> Option<Episode> {
        agent.reset(spawn);
        observer.on_episode_start(spawn);
        let mut episode = Episode::begin(spawn);

        while !agent.is_done() {
            let decision = agent.step();
            episode.record(decision);

            observer.on_decision(&decision);
            if !self.config.delay.is_zero() {
                thread::sleep(self.config.delay);
            }
            if self.cancel.is_cancelled() {
                return None;
            }
        }

        episode.seal();
        agent.finish_episode();
        Some(episode)
    }

    fn cancelled(&self, completed: u32) -> Outcome {
        warn!("training cancelled after {completed} episodes");
        Outcome::Cancelled { completed }
    }
}
