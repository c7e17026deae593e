use crossterm::event::{Event, KeyCode};
use ratatui::{prelude::*, style::Stylize, widgets::*};

use super::{pressed_key, Component};

fn labels(bounds: [f64; 2]) -> Vec<String> {
    bounds.iter().map(|x| format!("{x:.1}")).collect()
}

/// Scatter plot of one metric against the episode number
pub struct Plot {
    title: &'static str,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    data: Vec<(f64, f64)>,
}

impl Plot {
    pub fn new(title: &'static str, episodes: u32) -> Self {
        Self {
            title,
            x_bounds: [0.0, episodes.into()],
            y_bounds: [f64::MAX, f64::MIN],
            data: Vec::new(),
        }
    }

    /// Add a point, growing the bounds to fit it
    pub fn push(&mut self, point: (f64, f64)) {
        let (x, y) = point;
        self.x_bounds = [self.x_bounds[0].min(x), self.x_bounds[1].max(x)];
        self.y_bounds = [self.y_bounds[0].min(y), self.y_bounds[1].max(y)];
        self.data.push(point);
    }
}

impl WidgetRef for Plot {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Scatter)
            .cyan()
            .data(&self.data);

        let y_bounds = if self.data.is_empty() {
            [0.0, 1.0]
        } else {
            self.y_bounds
        };

        let x_axis = Axis::default()
            .title("Episode")
            .dark_gray()
            .labels(labels(self.x_bounds).into_iter().map(|l| l.bold()).collect())
            .bounds(self.x_bounds);

        let y_axis = Axis::default()
            .title(self.title)
            .dark_gray()
            .labels(labels(y_bounds).into_iter().map(|l| l.bold()).collect())
            .bounds(y_bounds);

        Chart::new(vec![dataset])
            .block(Block::default().padding(Padding::uniform(1)))
            .x_axis(x_axis)
            .y_axis(y_axis)
            .render(area, buf);
    }
}

/// Per-episode metrics, one plot per metric
pub struct Plots {
    plots: Vec<Plot>,
    selected: usize,
}

impl Plots {
    pub fn new(episodes: u32) -> Self {
        Self {
            plots: vec![Plot::new("steps", episodes), Plot::new("return", episodes)],
            selected: 0,
        }
    }

    /// Record a finished episode
    pub fn update(&mut self, episode: u32, steps: usize, reward: f32) {
        let x = f64::from(episode);
        self.plots[0].push((x, steps as f64));
        self.plots[1].push((x, reward.into()));
    }

    pub fn next_plot(&mut self) {
        self.selected = (self.selected + 1) % self.plots.len();
    }

    pub fn prev_plot(&mut self) {
        let len = self.plots.len();
        self.selected = (self.selected + len - 1) % len;
    }
}

impl WidgetRef for Plots {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Plots");
        let inner = block.inner(area);
        block.render(area, buf);

        let [tabs_area, plot_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

        Tabs::new(self.plots.iter().map(|p| p.title))
            .white()
            .highlight_style(Style::default().light_green())
            .select(self.selected)
            .render(tabs_area, buf);

        self.plots[self.selected].render_ref(plot_area, buf);
    }
}

impl Component for Plots {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        match pressed_key(event) {
            Some(KeyCode::Left) => self.prev_plot(),
            Some(KeyCode::Right) => self.next_plot(),
            _ => return false,
        }
        true
    }
}
