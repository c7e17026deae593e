use thiserror::Error;

use crate::grid::Pos;

/// A parameter outside its valid domain
///
/// Always reported before a training run touches the value table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for `{name}`: {value} is not in the interval {min}..={max}")]
    OutOfInterval {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("invalid value for `{name}`: {value} is not in the interval ({min}, {max}]")]
    OutOfHalfOpenInterval {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("episode count must be positive")]
    NoEpisodes,

    #[error("grid must have at least one cell, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("goal {goal} lies outside the {width}x{height} grid")]
    GoalOutOfBounds { goal: Pos, width: usize, height: usize },

    #[error("invalid decay schedule: {0}")]
    Decay(&'static str),
}

/// Reasons a training run stops without completing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("spawn generator produced {0}, which is outside the grid")]
    SpawnOutOfBounds(Pos),
}
