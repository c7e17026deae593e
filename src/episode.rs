use std::time::{Duration, Instant};

use crate::grid::{Action, Pos};

/// One step's record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub reward: f32,
    /// Manhattan distance from `position` to the goal
    pub distance_to_goal: usize,
    /// Where the agent ended up
    pub position: Pos,
}

/// One trial from a spawn point to the goal
///
/// Decisions are appended in the order they were taken while the episode runs. Once sealed, an episode
/// has an end time and is only handed out by shared reference.
#[derive(Debug, Clone)]
pub struct Episode {
    spawn: Pos,
    start: Instant,
    end: Option<Instant>,
    decisions: Vec<Decision>,
}

impl Episode {
    pub(crate) fn begin(spawn: Pos) -> Self {
        Self {
            spawn,
            start: Instant::now(),
            end: None,
            decisions: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, decision: Decision) {
        debug_assert!(self.end.is_none(), "sealed episodes are immutable");
        self.decisions.push(decision);
    }

    pub(crate) fn seal(&mut self) {
        self.end.get_or_insert_with(Instant::now);
    }

    pub fn spawn(&self) -> Pos {
        self.spawn
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    /// `None` until the goal has been reached
    pub fn end(&self) -> Option<Instant> {
        self.end
    }

    pub fn is_sealed(&self) -> bool {
        self.end.is_some()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end.duration_since(self.start))
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// Number of decisions taken
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Undiscounted sum of rewards
    pub fn total_reward(&self) -> f32 {
        self.decisions.iter().map(|d| d.reward).sum()
    }

    /// Where the episode finished, or the spawn if no decision was taken
    pub fn last_position(&self) -> Pos {
        self.decisions.last().map_or(self.spawn, |d| d.position)
    }
}
