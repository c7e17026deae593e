use std::{
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use log::{error, LevelFilter};

use crate::{
    agent::Learner,
    algo::{QTable, QTableAgent, UpdateRule},
    decay::Decay,
    episode::{Decision, Episode},
    grid::{Action, Grid, Pos},
    train::{CancelToken, Observer},
};

pub use app::App;

mod app;
mod components;
mod tui;

/// Messages from training threads to the view
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// An agent was placed on the spawn cell of a new episode
    Started { agent: usize, spawn: Pos },
    /// An agent took a decision
    Moved { agent: usize, position: Pos },
    /// An agent reached the goal
    Episode {
        agent: usize,
        episode: u32,
        steps: usize,
        reward: f32,
    },
    /// Best known action and its value for every visited cell of an agent
    Policy {
        agent: usize,
        cells: Vec<(Pos, Action, f32)>,
    },
}

impl Update {
    /// Snapshot the greedy policy stored in `table`
    pub fn policy(agent: usize, grid: &Grid, table: &QTable<Pos, Action>) -> Self {
        use strum::VariantArray;

        let cells = grid
            .cells()
            .filter(|&pos| Action::VARIANTS.iter().any(|&a| table.get(pos, a) != 0.0))
            .map(|pos| {
                let (action, value) = table.best(pos, Action::VARIANTS);
                (pos, action, value)
            })
            .collect();
        Update::Policy { agent, cells }
    }
}

/// Forwards training progress of one agent to the view
///
/// Send errors are ignored: once the view has closed, training carries on headless.
pub struct Reporter {
    agent: usize,
    episode: u32,
    tx: Sender<Update>,
}

impl Reporter {
    pub fn new(agent: usize, tx: Sender<Update>) -> Self {
        Self {
            agent,
            episode: 0,
            tx,
        }
    }
}

impl<'a, R: UpdateRule, D: Decay> Observer<QTableAgent<'a, R, D>> for Reporter {
    fn on_episode_start(&mut self, spawn: Pos) {
        let _ = self.tx.send(Update::Started {
            agent: self.agent,
            spawn,
        });
    }

    fn on_decision(&mut self, decision: &Decision) {
        let _ = self.tx.send(Update::Moved {
            agent: self.agent,
            position: decision.position,
        });
    }

    fn on_episode(&mut self, episode: &Episode, learner: &QTableAgent<'a, R, D>) {
        let _ = self.tx.send(Update::Episode {
            agent: self.agent,
            episode: self.episode,
            steps: episode.len(),
            reward: episode.total_reward(),
        });
        let _ = self.tx.send(Update::policy(
            self.agent,
            learner.world().grid(),
            learner.table(),
        ));
        self.episode += 1;
    }
}

/// Start the view on its own thread
///
/// Installs [`tui_logger`] as the global logger so log records show up in the logs tab. Quitting the view
/// cancels `cancel`.
///
/// **Returns** the view thread and the sender training threads report through
pub fn init(
    grid: Grid,
    agents: usize,
    episodes: u32,
    cancel: CancelToken,
) -> (JoinHandle<()>, Sender<Update>) {
    if tui_logger::init_logger(LevelFilter::Trace).is_ok() {
        tui_logger::set_default_level(LevelFilter::Debug);
    }

    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut app = App::new(grid, agents, episodes, cancel);
        if let Err(e) = app.run(rx) {
            error!("view stopped: {e}");
        }
    });

    (handle, tx)
}
