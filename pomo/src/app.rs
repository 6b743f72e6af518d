use chrono::{DateTime, Local};
use pomo_ipc::SessionSnapshot;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::config::Config;

/// How long the timer panel stays highlighted after a session change.
pub const COMPLETION_FLASH: Duration = Duration::from_millis(1500);

/// UI-side state. The session machine itself lives behind `TimerSession`;
/// the app only caches the latest snapshot for drawing.
pub struct App {
    pub snapshot: SessionSnapshot,
    pub goals: Vec<Goal>,
    pub selected_goal: usize,
    pub next_goal_id: u32,
    pub mode: AppMode,
    pub input_buffer: String,
    pub config: Config,
    pub should_quit: bool,
    /// Set by every goal mutation; the main loop persists and clears it.
    pub goals_dirty: bool,
    flash_until: Option<Instant>,
}

#[derive(Default, Clone, PartialEq, Debug)]
pub enum AppMode {
    #[default]
    Normal,
    AddingGoal,
    ShowHelp,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: u32,
    pub text: String,
    pub done: bool,
    pub created_at: DateTime<Local>,
}

impl Goal {
    pub fn new(id: u32, text: String) -> Self {
        Self {
            id,
            text,
            done: false,
            created_at: Local::now(),
        }
    }
}

impl App {
    pub fn new(config: Config, snapshot: SessionSnapshot, goals: Vec<Goal>) -> Self {
        let next_goal_id = goals.iter().map(|goal| goal.id).max().map_or(1, |id| id + 1);
        Self {
            snapshot,
            goals,
            selected_goal: 0,
            next_goal_id,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            config,
            should_quit: false,
            goals_dirty: false,
            flash_until: None,
        }
    }

    pub fn add_goal(&mut self, text: String) {
        self.goals.push(Goal::new(self.next_goal_id, text));
        self.next_goal_id += 1;
        self.selected_goal = self.goals.len() - 1;
        self.goals_dirty = true;
    }

    pub fn delete_selected_goal(&mut self) {
        if self.goals.get(self.selected_goal).is_some() {
            self.goals.remove(self.selected_goal);
            if !self.goals.is_empty() && self.selected_goal >= self.goals.len() {
                self.selected_goal = self.goals.len() - 1;
            }
            self.goals_dirty = true;
        }
    }

    pub fn toggle_selected_goal(&mut self) {
        if let Some(goal) = self.goals.get_mut(self.selected_goal) {
            goal.done = !goal.done;
            self.goals_dirty = true;
        }
    }

    pub fn move_selection_up(&mut self) {
        self.selected_goal = self.selected_goal.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if !self.goals.is_empty() {
            self.selected_goal = (self.selected_goal + 1).min(self.goals.len() - 1);
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if self.mode == AppMode::AddingGoal {
            if c == '\n' {
                if !self.input_buffer.is_empty() {
                    self.add_goal(self.input_buffer.clone());
                }
                self.input_buffer.clear();
                self.mode = AppMode::Normal;
            } else {
                self.input_buffer.push(c);
            }
        }
    }

    pub fn handle_backspace(&mut self) {
        if self.mode == AppMode::AddingGoal {
            self.input_buffer.pop();
        }
    }

    pub fn trigger_flash(&mut self) {
        self.flash_until = Some(Instant::now() + COMPLETION_FLASH);
    }

    pub fn flash_active(&self) -> bool {
        self.flash_until.is_some_and(|until| Instant::now() < until)
    }
}
