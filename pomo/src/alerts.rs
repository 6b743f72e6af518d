//! Desktop notifications and the terminal bell.

use pomo_ipc::SessionKind;
use tracing::warn;

use crate::config::Alerts;

/// Desktop notification sender. Failures are logged and swallowed; an
/// unavailable notification daemon must never take the timer down.
pub struct Notifier {
    enabled: bool,
}

impl Notifier {
    pub fn new(alerts: &Alerts) -> Self {
        Self {
            enabled: alerts.notifications,
        }
    }

    pub fn session_completed(&self, previous: SessionKind, next: SessionKind) {
        let (title, body) = match previous {
            SessionKind::Work => (
                "Work Session Complete!",
                format!("Time for a {}! {}", next.label(), break_emoji(next)),
            ),
            SessionKind::ShortBreak => ("Break Complete!", "Time to focus! 🎯".to_string()),
            SessionKind::LongBreak => (
                "Long Break Complete!",
                "Ready to start fresh! 🚀".to_string(),
            ),
        };
        self.send(title, &body);
    }

    pub fn session_skipped(&self, previous: SessionKind, next: SessionKind) {
        let (title, body) = if previous == SessionKind::Work {
            (
                "Work Session Skipped",
                format!("Moving to {}! {}", next.label(), break_emoji(next)),
            )
        } else {
            ("Break Skipped", "Back to work! Time to focus! 🎯".to_string())
        };
        self.send(title, &body);
    }

    pub fn cycle_reset(&self) {
        self.send(
            "Session Reset",
            "Pomodoro session has been reset to the beginning! 🔄",
        );
    }

    pub fn stats_cleared(&self) {
        self.send(
            "Sessions Cleared",
            "All session data has been reset. Ready for a fresh start! 🌟",
        );
    }

    fn send(&self, title: &str, body: &str) {
        if !self.enabled {
            return;
        }
        if let Err(e) = notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .appname("pomo")
            .show()
        {
            warn!("Failed to send notification: {}", e);
        }
    }
}

fn break_emoji(kind: SessionKind) -> &'static str {
    if kind == SessionKind::LongBreak {
        "🌟"
    } else {
        "☕"
    }
}

/// Terminal bell on session boundaries. The BEL byte goes straight to
/// stdout, which the TUI owns, so it never disturbs the layout.
pub struct Chime {
    enabled: bool,
}

impl Chime {
    pub fn new(alerts: &Alerts) -> Self {
        Self {
            enabled: alerts.sound,
        }
    }

    pub fn ring(&self) {
        if !self.enabled {
            return;
        }
        use std::io::Write;
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}
