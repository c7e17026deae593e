use std::collections::HashMap;

use super::Hashable;

/// Sparse mapping from `(state, action)` to a value estimate
///
/// Pairs that have never been written read as `0.0`, so an empty table and a table full of zeros behave
/// identically. The key is the `(state, action)` tuple itself, so two states share an entry exactly when
/// they compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable<S: Hashable, A: Hashable> {
    values: HashMap<(S, A), f32>,
}

impl<S: Hashable, A: Hashable> Default for QTable<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Hashable, A: Hashable> QTable<S, A> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Value of `action` in `state`, `0.0` if never written
    pub fn get(&self, state: S, action: A) -> f32 {
        self.values.get(&(state, action)).copied().unwrap_or(0.0)
    }

    /// Insert or overwrite the value of `action` in `state`
    pub fn set(&mut self, state: S, action: A, value: f32) {
        self.values.insert((state, action), value);
    }

    /// Forget every learned value
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of pairs that have been written
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, A, f32)> + '_ {
        self.values.iter().map(|(&(s, a), &v)| (s, a, v))
    }

    /// The highest valued action in `state` along with its value
    ///
    /// Ties go to whichever action comes first in `actions`.
    ///
    /// **Panics** if `actions` is empty
    pub fn best(&self, state: S, actions: &[A]) -> (A, f32) {
        let (&first, rest) = actions
            .split_first()
            .expect("There is always at least one action available");
        rest.iter()
            .fold((first, self.get(state, first)), |best, &action| {
                let value = self.get(state, action);
                if value > best.1 {
                    (action, value)
                } else {
                    best
                }
            })
    }

    /// See [`QTable::best`]
    pub fn best_action(&self, state: S, actions: &[A]) -> A {
        self.best(state, actions).0
    }

    /// max<sub>a</sub> Q(state, a) over `actions`, or `0.0` when there are none
    pub fn max_value(&self, state: S, actions: &[A]) -> f32 {
        if actions.is_empty() {
            return 0.0;
        }
        self.best(state, actions).1
    }
}

#[cfg(test)]
mod tests {
    use strum::VariantArray;

    use crate::grid::{Action, Pos};

    use super::*;

    type Table = QTable<Pos, Action>;

    #[test]
    fn fresh_table_reads_zero() {
        let table = Table::new();
        for x in 0..4 {
            for &action in Action::VARIANTS {
                assert_eq!(table.get(Pos::new(x, 7), action), 0.0);
            }
        }
        assert!(table.is_empty());
    }

    #[test]
    fn set_overwrites() {
        let mut table = Table::new();
        let s = Pos::new(1, 2);
        table.set(s, Action::Left, 3.5);
        table.set(s, Action::Left, -1.0);
        assert_eq!(table.get(s, Action::Left), -1.0);
        assert_eq!(table.get(s, Action::Right), 0.0);
        assert_eq!(table.get(Pos::new(2, 1), Action::Left), 0.0, "keys are not symmetric");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn ties_go_to_first_action() {
        let mut table = Table::new();
        let s = Pos::new(0, 0);
        assert_eq!(table.best_action(s, Action::VARIANTS), Action::Up);

        table.set(s, Action::Up, -0.5);
        assert_eq!(table.best_action(s, Action::VARIANTS), Action::Down);

        table.set(s, Action::Left, 2.0);
        table.set(s, Action::Right, 2.0);
        assert_eq!(table.best(s, Action::VARIANTS), (Action::Left, 2.0));
    }

    #[test]
    fn max_value_includes_unseen_zero() {
        let mut table = Table::new();
        let s = Pos::new(3, 3);
        for &action in Action::VARIANTS {
            table.set(s, action, -1.0);
        }
        assert_eq!(table.max_value(s, Action::VARIANTS), -1.0);
        assert_eq!(table.max_value(s, &[]), 0.0);
        assert_eq!(table.max_value(Pos::new(0, 3), Action::VARIANTS), 0.0);
    }

    #[test]
    fn clear_forgets() {
        let mut table = Table::new();
        let s = Pos::new(2, 2);
        table.set(s, Action::Down, 42.0);
        table.clear();
        assert_eq!(table.get(s, Action::Down), 0.0);
        assert!(table.is_empty());
    }
}
