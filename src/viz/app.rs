use std::{
    io,
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use crossterm::event::{self, Event, KeyCode};
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{help::render_help, pressed_key, Component, GridView, Logs, Plots},
    tui, Update,
};
use crate::{grid::Grid, train::CancelToken};

const TABS: [&str; 3] = ["Grid", "Plots", "Logs"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    #[default]
    Train,
    /// Every training thread has hung up
    Done,
    Quit,
}

/// The root of the view, holding every tab and the progress of all agents
pub struct App {
    state: State,
    episodes: u32,
    /// Completed episodes per agent
    progress: Vec<u32>,
    selected_tab: usize,
    show_help: bool,
    grid: GridView,
    plots: Plots,
    logs: Logs,
    cancel: CancelToken,
}

impl App {
    pub fn new(grid: Grid, agents: usize, episodes: u32, cancel: CancelToken) -> Self {
        let agents = agents.max(1);
        Self {
            state: State::default(),
            episodes,
            progress: vec![0; agents],
            selected_tab: 0,
            show_help: false,
            grid: GridView::new(grid, agents),
            plots: Plots::new(episodes),
            logs: Logs::new(),
            cancel,
        }
    }

    /// Initialize the terminal and draw until the user quits
    ///
    /// Restores the terminal on exit
    pub fn run(&mut self, rx: Receiver<Update>) -> io::Result<()> {
        let mut terminal = tui::init()?;

        while self.state != State::Quit {
            if self.state == State::Train {
                self.drain(&rx);
            }

            terminal.draw(|frame| frame.render_widget(&*self, frame.size()))?;

            if event::poll(Duration::from_millis(16))? {
                let event = event::read()?;
                self.handle_event(&event);
            }
        }

        self.cancel.cancel();
        tui::restore()
    }

    fn drain(&mut self, rx: &Receiver<Update>) {
        loop {
            match rx.try_recv() {
                Ok(update) => self.apply(update),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.state = State::Done;
                    break;
                }
            }
        }
    }

    fn apply(&mut self, update: Update) {
        match update {
            Update::Started { agent, spawn } => self.grid.spawned(agent, spawn),
            Update::Moved { agent, position } => self.grid.moved(agent, position),
            Update::Episode {
                agent,
                episode,
                steps,
                reward,
            } => {
                if let Some(done) = self.progress.get_mut(agent) {
                    *done = episode + 1;
                }
                if agent == 0 {
                    self.plots.update(episode, steps, reward);
                }
            }
            Update::Policy { agent, cells } => self.grid.set_policy(agent, cells),
        }
    }

    fn handle_event(&mut self, event: &Event) {
        match pressed_key(event) {
            Some(KeyCode::Char('q')) => {
                self.state = State::Quit;
                return;
            }
            Some(KeyCode::Char('h')) => {
                self.show_help = !self.show_help;
                return;
            }
            Some(KeyCode::Tab) => {
                self.selected_tab = (self.selected_tab + 1) % TABS.len();
                return;
            }
            _ => {}
        }

        match self.selected_tab {
            0 => self.grid.handle_ui_event(event),
            1 => self.plots.handle_ui_event(event),
            2 => self.logs.handle_ui_event(event),
            _ => false,
        };
    }

    fn ratio(&self) -> f64 {
        let total = self.episodes as f64 * self.progress.len() as f64;
        let done: f64 = self.progress.iter().map(|&p| f64::from(p)).sum();
        if total > 0.0 {
            (done / total).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [menu_area, main_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        match self.selected_tab {
            0 => self.grid.render_ref(main_area, buf),
            1 => self.plots.render_ref(main_area, buf),
            2 => self.logs.render_ref(main_area, buf),
            _ => {}
        }

        let title = match self.state {
            State::Train => "Progress",
            State::Done | State::Quit => "Done (q to exit)",
        };
        Gauge::default()
            .block(Block::bordered().border_type(BorderType::Rounded).title(title))
            .gauge_style(Color::Cyan)
            .ratio(self.ratio())
            .render(progress_area, buf);

        if self.show_help {
            render_help(area, buf, self.selected_tab);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::{Action, Pos};

    use super::*;

    #[test]
    fn updates_drive_progress() {
        let grid = Grid::new(4, 4, Pos::new(3, 3)).unwrap();
        let mut app = App::new(grid, 2, 10, CancelToken::new());

        app.apply(Update::Episode {
            agent: 0,
            episode: 4,
            steps: 6,
            reward: 99.0,
        });
        app.apply(Update::Episode {
            agent: 1,
            episode: 0,
            steps: 9,
            reward: 98.0,
        });
        assert_eq!(app.progress, [5, 1]);
        assert_eq!(app.ratio(), 0.3);

        app.apply(Update::Policy {
            agent: 0,
            cells: vec![(Pos::new(2, 3), Action::Right, 100.0)],
        });
        app.apply(Update::Moved {
            agent: 7,
            position: Pos::new(1, 1),
        });
    }

    #[test]
    fn disconnect_finishes_training() {
        let grid = Grid::new(2, 2, Pos::new(1, 1)).unwrap();
        let mut app = App::new(grid, 1, 3, CancelToken::new());
        let (tx, rx) = std::sync::mpsc::channel();
        tx.send(Update::Moved {
            agent: 0,
            position: Pos::new(1, 0),
        })
        .unwrap();
        drop(tx);

        app.drain(&rx);
        assert_eq!(app.state, State::Done);
    }
}
