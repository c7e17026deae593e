use strum::VariantArray;

use crate::grid::{Action, Grid, Pos};

/// The dynamics an agent learns from: which actions exist, where they lead and what they pay
///
/// Implementations are read-only, so one environment can be shared by any number of agents.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Every available action, in tie-break order
    ///
    /// The returned slice should never be empty.
    fn actions(&self) -> &[Self::Action];

    /// The state reached by taking `action` in `state`
    fn apply(&self, state: Self::State, action: Self::Action) -> Self::State;

    /// The reward for arriving in `state`
    fn reward(&self, state: Self::State) -> f32;

    /// Whether arriving in `state` ends the episode
    fn is_terminal(&self, state: Self::State) -> bool;
}

/// Reward shape for a [`GridWorld`]
///
/// Reaching the goal pays `goal_bonus`. Any other cell costs its Manhattan distance to the goal divided
/// by `distance_scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reward {
    pub goal_bonus: f32,
    pub distance_scale: f32,
}

impl Default for Reward {
    fn default() -> Self {
        Self {
            goal_bonus: 100.0,
            distance_scale: 10.0,
        }
    }
}

/// A [`Grid`] with walls on every side and a shaped reward toward the goal
#[derive(Debug, Clone, PartialEq)]
pub struct GridWorld {
    grid: Grid,
    reward: Reward,
}

impl GridWorld {
    pub fn new(grid: Grid) -> Self {
        Self::with_reward(grid, Reward::default())
    }

    pub fn with_reward(grid: Grid, reward: Reward) -> Self {
        Self { grid, reward }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn goal(&self) -> Pos {
        self.grid.goal()
    }
}

impl Environment for GridWorld {
    type State = Pos;
    type Action = Action;

    fn actions(&self) -> &[Action] {
        Action::VARIANTS
    }

    /// Moves one cell, staying put on any axis that would leave the grid
    fn apply(&self, pos: Pos, action: Action) -> Pos {
        let Pos { x, y } = pos;
        match action {
            Action::Up => Pos::new(x, y.saturating_sub(1)),
            Action::Down => Pos::new(x, (y + 1).min(self.grid.height() - 1)),
            Action::Left => Pos::new(x.saturating_sub(1), y),
            Action::Right => Pos::new((x + 1).min(self.grid.width() - 1), y),
        }
    }

    fn reward(&self, pos: Pos) -> f32 {
        if self.grid.is_goal(pos) {
            self.reward.goal_bonus
        } else {
            -(self.grid.distance_manhattan(pos) as f32) / self.reward.distance_scale
        }
    }

    fn is_terminal(&self, pos: Pos) -> bool {
        self.grid.is_goal(pos)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn world(width: usize, height: usize, goal: (usize, usize)) -> GridWorld {
        GridWorld::new(Grid::new(width, height, goal.into()).unwrap())
    }

    #[test]
    fn moves_follow_axes() {
        let env = world(5, 5, (4, 4));
        let p = Pos::new(2, 2);
        assert_eq!(env.apply(p, Action::Up), Pos::new(2, 1));
        assert_eq!(env.apply(p, Action::Down), Pos::new(2, 3));
        assert_eq!(env.apply(p, Action::Left), Pos::new(1, 2));
        assert_eq!(env.apply(p, Action::Right), Pos::new(3, 2));
    }

    #[test]
    fn walls_clamp_every_move() {
        let env = world(4, 3, (0, 0));
        for pos in env.grid().cells().collect::<Vec<_>>() {
            for &action in env.actions() {
                let next = env.apply(pos, action);
                assert!(env.grid().contains(next), "{pos} {action:?} -> {next}");
                assert!(pos.x.abs_diff(next.x) + pos.y.abs_diff(next.y) <= 1);
            }
        }
        assert_eq!(env.apply(Pos::new(0, 0), Action::Up), Pos::new(0, 0));
        assert_eq!(env.apply(Pos::new(0, 0), Action::Left), Pos::new(0, 0));
        assert_eq!(env.apply(Pos::new(3, 2), Action::Down), Pos::new(3, 2));
        assert_eq!(env.apply(Pos::new(3, 2), Action::Right), Pos::new(3, 2));
    }

    #[test]
    fn one_by_one_grid_never_moves() {
        let env = world(1, 1, (0, 0));
        for &action in env.actions() {
            assert_eq!(env.apply(Pos::new(0, 0), action), Pos::new(0, 0));
        }
    }

    #[test]
    fn reward_shape() {
        let env = world(11, 11, (5, 5));
        assert_eq!(env.reward(Pos::new(5, 5)), 100.0);
        assert_eq!(env.reward(Pos::new(0, 0)), -1.0);
        assert_eq!(env.reward(Pos::new(5, 4)), -0.1);

        // Closer cells are never worse
        let mut by_distance = env
            .grid()
            .cells()
            .filter(|&p| !env.is_terminal(p))
            .map(|p| (env.grid().distance_manhattan(p), env.reward(p)))
            .collect::<Vec<_>>();
        by_distance.sort_by_key(|&(d, _)| d);
        for pair in by_distance.windows(2) {
            let [(d0, r0), (d1, r1)] = [pair[0], pair[1]];
            assert!(r0 <= 0.0 && r1 <= 0.0);
            if d0 < d1 {
                assert!(r0 > r1);
            } else {
                assert_eq!(r0, r1);
            }
        }
    }

    #[test]
    fn tunable_reward() {
        let grid = Grid::new(3, 3, Pos::new(2, 2)).unwrap();
        let env = GridWorld::with_reward(
            grid,
            Reward {
                goal_bonus: 1.0,
                distance_scale: 2.0,
            },
        );
        assert_eq!(env.reward(Pos::new(2, 2)), 1.0);
        assert_eq!(env.reward(Pos::new(0, 0)), -2.0);
    }
}
