use super::{Hashable, QTable};
use crate::agent::Exp;

/// A one-step temporal-difference update rule
///
/// Each rule decides what estimate of the next state's value to bootstrap from. The update itself is shared:
///
/// Q(s,a) ← Q(s,a) + α(r + γ·bootstrap - Q(s,a))
pub trait UpdateRule {
    /// Name for logs
    const NAME: &'static str;

    /// Whether the bootstrap needs the action the policy will actually take next
    const ON_POLICY: bool;

    /// Estimated value of `next_state`
    ///
    /// `next_action` is only provided to on-policy rules, and is `None` when the next state is terminal.
    fn bootstrap<S: Hashable, A: Hashable>(
        &self,
        table: &QTable<S, A>,
        next_state: S,
        next_action: Option<A>,
        actions: &[A],
    ) -> f32;

    /// Apply the update for one experience and return the new value
    fn update<S: Hashable, A: Hashable>(
        &self,
        table: &mut QTable<S, A>,
        exp: &Exp<S, A>,
        next_action: Option<A>,
        actions: &[A],
        alpha: f32,
        gamma: f32,
    ) -> f32 {
        let next_value = self.bootstrap(table, exp.next_state, next_action, actions);
        let q_value = table.get(exp.state, exp.action);
        let new_q_value = q_value + alpha * (exp.reward + gamma * next_value - q_value);
        table.set(exp.state, exp.action, new_q_value);
        new_q_value
    }
}

/// Off-policy Q-learning, bootstrapping from the best action in the next state
#[derive(Debug, Clone, Copy, Default)]
pub struct QLearning;

impl UpdateRule for QLearning {
    const NAME: &'static str = "q-learning";
    const ON_POLICY: bool = false;

    fn bootstrap<S: Hashable, A: Hashable>(
        &self,
        table: &QTable<S, A>,
        next_state: S,
        _next_action: Option<A>,
        actions: &[A],
    ) -> f32 {
        table.max_value(next_state, actions)
    }
}

/// On-policy SARSA, bootstrapping from the action the policy picks next
#[derive(Debug, Clone, Copy, Default)]
pub struct Sarsa;

impl UpdateRule for Sarsa {
    const NAME: &'static str = "sarsa";
    const ON_POLICY: bool = true;

    fn bootstrap<S: Hashable, A: Hashable>(
        &self,
        table: &QTable<S, A>,
        next_state: S,
        next_action: Option<A>,
        _actions: &[A],
    ) -> f32 {
        next_action.map_or(0.0, |a| table.get(next_state, a))
    }
}
