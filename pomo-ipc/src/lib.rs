//! Inter-process communication between pomo and pomoctl
//!
//! We use Unix domain sockets for local IPC - they're fast, secure,
//! and perfect for this use case. The protocol is one newline-terminated
//! JSON command per connection, answered by a single JSON response.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod client;

/// Which kind of session a countdown belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    pub fn is_break(self) -> bool {
        matches!(self, SessionKind::ShortBreak | SessionKind::LongBreak)
    }

    /// Label used by the UI and by notification copy.
    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Work => "work",
            SessionKind::ShortBreak => "short break",
            SessionKind::LongBreak => "long break",
        }
    }
}

/// Which break follows a completed work session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakPolicy {
    /// Short breaks, with a long break after every fourth work session.
    #[default]
    Alternating,
    AlwaysShort,
    AlwaysLong,
}

/// Countdown phase. Running and Paused are mutually exclusive by
/// construction; a freshly loaded session sits in Idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Point-in-time view of the session machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub kind: SessionKind,
    pub remaining_secs: u64,
    pub total_secs: u64,
    /// Fraction of the session already elapsed, 0.0 to 1.0.
    pub progress: f64,
    /// Work sessions started in the current cycle.
    pub session_count: u32,
    pub completed_sessions: u32,
    pub total_time_spent_secs: u64,
}

/// Lifetime counters, as persisted and as reported over IPC.
///
/// `session_count` is the position within the current work/break cycle; it
/// survives restarts so the fourth work session still earns the long break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub completed_sessions: u32,
    pub total_time_spent_secs: u64,
    pub session_count: u32,
}

/// Partial settings update; absent fields keep their current values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub work_mins: Option<u32>,
    pub short_break_mins: Option<u32>,
    pub long_break_mins: Option<u32>,
    pub break_policy: Option<BreakPolicy>,
    pub auto_start_break: Option<bool>,
    pub auto_start_work: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.work_mins.is_none()
            && self.short_break_mins.is_none()
            && self.long_break_mins.is_none()
            && self.break_policy.is_none()
            && self.auto_start_break.is_none()
            && self.auto_start_work.is_none()
    }
}

/// Commands that pomoctl can send to pomo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Pause,
    Reset,
    ResetCycle,
    Skip,
    Status,
    Stats,
    ClearStats,
    UpdateSettings(SettingsPatch),
}

/// Responses from pomo back to pomoctl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    Ok,
    Status(SessionSnapshot),
    Stats(StatsSnapshot),
    Error(String),
}

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection refused - is pomo running?")]
    ConnectionRefused,
}

pub const SOCKET_PATH: &str = "/tmp/pomo.sock";
