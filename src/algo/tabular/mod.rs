mod q_table;
mod rule;
mod table;

pub use q_table::{QTableAgent, QTableAgentConfig};
pub use rule::{QLearning, Sarsa, UpdateRule};
pub use table::QTable;

/// A trait for state and action types that can be used as keys in a [`HashMap`](std::collections::HashMap)
pub trait Hashable: Copy + Eq + std::hash::Hash {}

impl<T> Hashable for T where T: Copy + Eq + std::hash::Hash {}
