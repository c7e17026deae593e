use std::fmt;

use rand::Rng;
use strum::{EnumIter, VariantArray};

use crate::error::ConfigError;

/// A cell on the grid
///
/// Positions are plain values. Agent, goal and spawn each hold their own copy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A move on the grid
///
/// Declaration order is the tie-break order used when several actions share the best value.
#[derive(EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Arrow glyph for display
    pub const fn arrow(self) -> char {
        match self {
            Action::Up => '↑',
            Action::Down => '↓',
            Action::Left => '←',
            Action::Right => '→',
        }
    }
}

/// Immutable grid geometry with a fixed goal cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    goal: Pos,
}

impl Grid {
    /// Build a `width` x `height` grid with the given goal
    ///
    /// **Errors** if either dimension is zero or the goal lies outside the grid
    pub fn new(width: usize, height: usize, goal: Pos) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        let grid = Self {
            width,
            height,
            goal,
        };
        if !grid.contains(goal) {
            return Err(ConfigError::GoalOutOfBounds { goal, width, height });
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn is_goal(&self, pos: Pos) -> bool {
        pos == self.goal
    }

    /// |dx| + |dy| from `pos` to the goal
    pub fn distance_manhattan(&self, pos: Pos) -> usize {
        pos.x.abs_diff(self.goal.x) + pos.y.abs_diff(self.goal.y)
    }

    /// Straight-line distance from `pos` to the goal, or its square if `squared` is set
    pub fn distance_euclidean(&self, pos: Pos, squared: bool) -> f32 {
        let dx = pos.x.abs_diff(self.goal.x) as f32;
        let dy = pos.y.abs_diff(self.goal.y) as f32;
        let d2 = dx * dx + dy * dy;
        if squared {
            d2
        } else {
            d2.sqrt()
        }
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Pos::new(x, y)))
    }

    /// A cell drawn uniformly from the whole grid
    pub fn random_pos<R: Rng + ?Sized>(&self, rng: &mut R) -> Pos {
        Pos::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }
}
