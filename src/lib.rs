/// Learning algorithms
pub mod algo;

/// The capability interface shared by learners
pub mod agent;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Data structures
pub mod ds;

/// Environment dynamics and rewards
pub mod env;

/// Episode traces
pub mod episode;

/// Configuration and training errors
pub mod error;

/// Exploration policies
pub mod exploration;

/// Grid geometry
pub mod grid;

/// The episode loop
pub mod train;

/// Live terminal view of training
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use agent::Learner;
pub use env::{Environment, GridWorld, Reward};
pub use episode::{Decision, Episode};
pub use error::{ConfigError, TrainError};
pub use grid::{Action, Grid, Pos};
pub use train::{
    CancelToken, FixedSpawn, Observer, Outcome, RandomSpawn, Silent, Spawn, Trainer, TrainerConfig,
};
