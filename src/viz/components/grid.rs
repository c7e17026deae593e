use std::collections::HashMap;

use crossterm::event::{Event, KeyCode};
use ratatui::{prelude::*, widgets::*};

use crate::grid::{Action, Grid, Pos};

use super::{pressed_key, Component};

const AGENT_COLORS: [Color; 6] = [
    Color::LightCyan,
    Color::LightMagenta,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightGreen,
    Color::White,
];

/// Current and spawn cell of one agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentView {
    pub position: Pos,
    pub spawn: Pos,
}

/// The grid with its goal, every agent, and the greedy policy of the selected agent
///
/// Cells the selected agent has learned about show the arrow of their best action, shaded by its value.
pub struct GridView {
    grid: Grid,
    agents: Vec<AgentView>,
    policies: Vec<HashMap<Pos, (Action, f32)>>,
    selected: usize,
}

impl GridView {
    pub fn new(grid: Grid, agents: usize) -> Self {
        Self {
            grid,
            agents: vec![AgentView::default(); agents],
            policies: vec![HashMap::new(); agents],
            selected: 0,
        }
    }

    pub fn moved(&mut self, agent: usize, position: Pos) {
        if let Some(view) = self.agents.get_mut(agent) {
            view.position = position;
        }
    }

    /// A new episode put `agent` on `spawn`
    pub fn spawned(&mut self, agent: usize, spawn: Pos) {
        if let Some(view) = self.agents.get_mut(agent) {
            view.spawn = spawn;
            view.position = spawn;
        }
    }

    pub fn set_policy(&mut self, agent: usize, cells: Vec<(Pos, Action, f32)>) {
        if let Some(policy) = self.policies.get_mut(agent) {
            *policy = cells.into_iter().map(|(p, a, v)| (p, (a, v))).collect();
        }
    }

    fn cell(&self, pos: Pos, value_range: (f32, f32)) -> Span<'static> {
        if let Some(i) = self.agents.iter().position(|a| a.position == pos) {
            return Span::from(" @ ").fg(AGENT_COLORS[i % AGENT_COLORS.len()]).bold();
        }
        if self.grid.is_goal(pos) {
            return Span::from(" G ").light_green().bold();
        }
        if self.agents.iter().any(|a| a.spawn == pos) {
            return Span::from(" S ").dark_gray().bold();
        }
        match self.policies[self.selected].get(&pos) {
            Some(&(action, value)) => {
                Span::from(format!(" {} ", action.arrow())).fg(shade(value, value_range))
            }
            None => Span::from(" · ").dark_gray(),
        }
    }
}

/// Red for the lowest known value through to green for the highest
fn shade(value: f32, (lo, hi): (f32, f32)) -> Color {
    let t = if hi > lo { (value - lo) / (hi - lo) } else { 1.0 };
    let t = t.clamp(0.0, 1.0);
    Color::Rgb((255.0 * (1.0 - t)) as u8, (255.0 * t) as u8, 80)
}

impl WidgetRef for GridView {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let policy = &self.policies[self.selected];
        let value_range = policy
            .values()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &(_, v)| (lo.min(v), hi.max(v)));

        let lines = (0..self.grid.height())
            .map(|y| {
                Line::from(
                    (0..self.grid.width())
                        .map(|x| self.cell(Pos::new(x, y), value_range))
                        .collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>();

        let title = format!(
            "Grid {}x{}, goal {}, policy of agent {}",
            self.grid.width(),
            self.grid.height(),
            self.grid.goal(),
            self.selected
        );

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(title)
                    .padding(Padding::uniform(1)),
            )
            .render(area, buf);
    }
}

impl Component for GridView {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        let len = self.agents.len();
        match pressed_key(event) {
            Some(KeyCode::Left) => self.selected = (self.selected + len - 1) % len,
            Some(KeyCode::Right) => self.selected = (self.selected + 1) % len,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> GridView {
        GridView::new(Grid::new(3, 2, Pos::new(2, 1)).unwrap(), 2)
    }

    #[test]
    fn draws_agents_goal_and_policy() {
        let mut view = view();
        view.spawned(0, Pos::new(0, 0));
        view.spawned(1, Pos::new(0, 0));
        view.moved(0, Pos::new(1, 0));
        view.moved(1, Pos::new(0, 1));
        view.set_policy(0, vec![(Pos::new(1, 1), Action::Right, 5.0)]);

        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        view.render_ref(area, &mut buf);

        // Border plus one cell of padding puts the first row at y = 2, x = 2
        let row = |y: u16| {
            (2..11)
                .map(|x| buf.get(x, y).symbol().to_string())
                .collect::<String>()
        };
        assert_eq!(row(2), " S  @  · ");
        assert_eq!(row(3), " @  →  G ");
    }

    #[test]
    fn spawn_marker_follows_each_episode() {
        let mut view = view();
        view.spawned(1, Pos::new(0, 1));
        assert_eq!(view.agents[1].spawn, Pos::new(0, 1));
        assert_eq!(view.agents[1].position, Pos::new(0, 1));

        view.moved(1, Pos::new(1, 1));
        view.spawned(1, Pos::new(2, 0));
        assert_eq!(view.agents[1].spawn, Pos::new(2, 0));
        assert_eq!(view.agents[1].position, Pos::new(2, 0));
        assert_eq!(view.agents[0].spawn, Pos::default());
    }

    #[test]
    fn ignores_unknown_agents() {
        let mut view = view();
        view.moved(5, Pos::new(1, 1));
        view.set_policy(5, vec![]);
        assert!(view.agents.iter().all(|a| a.position == Pos::default()));
    }

    #[test]
    fn shade_endpoints() {
        assert_eq!(shade(0.0, (0.0, 1.0)), Color::Rgb(255, 0, 80));
        assert_eq!(shade(1.0, (0.0, 1.0)), Color::Rgb(0, 255, 80));
        assert_eq!(shade(3.0, (3.0, 3.0)), Color::Rgb(0, 255, 80));
    }
}
