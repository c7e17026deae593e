pub mod tabular;

pub use tabular::{QLearning, QTable, QTableAgent, QTableAgentConfig, Sarsa, UpdateRule};
