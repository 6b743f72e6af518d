//! The pomodoro session state machine.
//!
//! Pure and synchronous: every operation mutates the state and returns the
//! events it emits, so the machine can be driven and inspected without a
//! runtime. `TimerSession` in `timer.rs` owns an instance, schedules the
//! ticks, and fans the events out to subscribers.

use std::time::Duration;

use pomo_ipc::{BreakPolicy, Phase, SessionKind, SessionSnapshot, SettingsPatch, StatsSnapshot};
use serde::{Deserialize, Serialize};

/// Cadence of the countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
/// Gap between a natural completion and an auto-started follow-up session.
pub const AUTO_START_DELAY: Duration = Duration::from_secs(2);
/// Work sessions per cycle under `BreakPolicy::Alternating`.
pub const CYCLE_LENGTH: u32 = 4;

/// Durations, break policy, and auto-start flags.
///
/// Durations are minutes and are expected to be positive; a zero duration
/// loads a session that completes on its very first tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub work_mins: u32,
    pub short_break_mins: u32,
    pub long_break_mins: u32,
    pub break_policy: BreakPolicy,
    pub auto_start_break: bool,
    pub auto_start_work: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_mins: 25,
            short_break_mins: 5,
            long_break_mins: 15,
            break_policy: BreakPolicy::Alternating,
            auto_start_break: false,
            auto_start_work: false,
        }
    }
}

impl TimerSettings {
    pub fn duration_secs(&self, kind: SessionKind) -> u64 {
        let mins = match kind {
            SessionKind::Work => self.work_mins,
            SessionKind::ShortBreak => self.short_break_mins,
            SessionKind::LongBreak => self.long_break_mins,
        };
        u64::from(mins) * 60
    }

    /// Merge the provided fields, leaving the rest untouched.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(mins) = patch.work_mins {
            self.work_mins = mins;
        }
        if let Some(mins) = patch.short_break_mins {
            self.short_break_mins = mins;
        }
        if let Some(mins) = patch.long_break_mins {
            self.long_break_mins = mins;
        }
        if let Some(policy) = patch.break_policy {
            self.break_policy = policy;
        }
        if let Some(auto) = patch.auto_start_break {
            self.auto_start_break = auto;
        }
        if let Some(auto) = patch.auto_start_work {
            self.auto_start_work = auto;
        }
    }

    /// The auto-start flag that governs a session of `kind`.
    pub fn auto_start(&self, kind: SessionKind) -> bool {
        if kind.is_break() {
            self.auto_start_break
        } else {
            self.auto_start_work
        }
    }
}

/// Lifecycle notifications, delivered to subscribers in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started {
        kind: SessionKind,
        remaining_secs: u64,
        total_secs: u64,
    },
    Paused {
        kind: SessionKind,
        remaining_secs: u64,
        total_secs: u64,
    },
    Reset {
        kind: SessionKind,
        remaining_secs: u64,
        total_secs: u64,
    },
    Tick {
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
    },
    SessionCompleted {
        previous: SessionKind,
        next: SessionKind,
        completed_sessions: u32,
        session_count: u32,
        total_time_spent_secs: u64,
    },
    SessionSkipped {
        previous: SessionKind,
        next: SessionKind,
        completed_sessions: u32,
        session_count: u32,
    },
    CycleReset {
        kind: SessionKind,
        remaining_secs: u64,
        total_secs: u64,
        session_count: u32,
    },
    /// The idle session was reloaded after a settings change.
    Updated {
        kind: SessionKind,
        remaining_secs: u64,
        total_secs: u64,
    },
    SettingsUpdated(TimerSettings),
    StatsUpdated(StatsSnapshot),
    StatsCleared(StatsSnapshot),
}

/// The session machine itself.
///
/// Invariants: `remaining_secs <= total_secs` always; `total_secs` matches
/// the configured duration of `kind` whenever a session (re)loads; the
/// lifetime counters only ever move through `advance`, `update_stats`, and
/// `clear_stats`.
#[derive(Debug, Clone)]
pub struct SessionState {
    phase: Phase,
    kind: SessionKind,
    remaining_secs: u64,
    total_secs: u64,
    /// Work sessions started this cycle; drives the alternating break
    /// selection and only resets on `reset_cycle` or `clear_stats`.
    session_count: u32,
    completed_sessions: u32,
    total_time_spent_secs: u64,
    settings: TimerSettings,
}

impl SessionState {
    pub fn new(settings: TimerSettings) -> Self {
        let mut state = Self {
            phase: Phase::Idle,
            kind: SessionKind::Work,
            remaining_secs: 0,
            total_secs: 0,
            session_count: 0,
            completed_sessions: 0,
            total_time_spent_secs: 0,
            settings,
        };
        state.load(SessionKind::Work);
        state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            kind: self.kind,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress: self.progress(),
            session_count: self.session_count,
            completed_sessions: self.completed_sessions,
            total_time_spent_secs: self.total_time_spent_secs,
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            completed_sessions: self.completed_sessions,
            total_time_spent_secs: self.total_time_spent_secs,
            session_count: self.session_count,
        }
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    /// Start from idle (reloading the full duration) or resume from a
    /// pause (keeping the countdown). No-op while running.
    pub fn start(&mut self) -> Option<SessionEvent> {
        match self.phase {
            Phase::Running => None,
            Phase::Idle => {
                self.load(self.kind);
                self.phase = Phase::Running;
                Some(self.loaded_event(EventTag::Started))
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                Some(self.loaded_event(EventTag::Started))
            }
        }
    }

    /// Freeze the countdown. No-op unless running.
    pub fn pause(&mut self) -> Option<SessionEvent> {
        if self.phase != Phase::Running {
            return None;
        }
        self.phase = Phase::Paused;
        Some(self.loaded_event(EventTag::Paused))
    }

    /// Reload the current session kind at full duration. Counters and the
    /// cycle position are untouched.
    pub fn reset(&mut self) -> SessionEvent {
        self.phase = Phase::Idle;
        self.load(self.kind);
        self.loaded_event(EventTag::Reset)
    }

    /// Full cycle reset: back to the first work session of a fresh cycle.
    /// Lifetime statistics are untouched.
    pub fn reset_cycle(&mut self) -> SessionEvent {
        self.phase = Phase::Idle;
        self.session_count = 0;
        self.load(SessionKind::Work);
        SessionEvent::CycleReset {
            kind: self.kind,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            session_count: self.session_count,
        }
    }

    /// Jump to the next session using the same transition policy as a
    /// natural completion, but without crediting the skipped session's
    /// duration to the time-spent counter.
    pub fn skip(&mut self) -> SessionEvent {
        self.phase = Phase::Idle;
        let (previous, next) = self.advance();
        SessionEvent::SessionSkipped {
            previous,
            next,
            completed_sessions: self.completed_sessions,
            session_count: self.session_count,
        }
    }

    /// One second elapses. Returns the tick event and, when the countdown
    /// reaches zero, the completion transition in the same call.
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let mut events = vec![SessionEvent::Tick {
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress: self.progress(),
        }];
        if self.remaining_secs == 0 {
            self.phase = Phase::Idle;
            self.total_time_spent_secs += self.total_secs;
            let (previous, next) = self.advance();
            events.push(SessionEvent::SessionCompleted {
                previous,
                next,
                completed_sessions: self.completed_sessions,
                session_count: self.session_count,
                total_time_spent_secs: self.total_time_spent_secs,
            });
        }
        events
    }

    /// Merge a settings patch. An idle session reloads immediately; a
    /// running or paused one keeps its loaded duration until the next
    /// natural reload.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Vec<SessionEvent> {
        self.settings.apply(patch);
        let mut events = Vec::new();
        if self.phase == Phase::Idle {
            self.load(self.kind);
            events.push(self.loaded_event(EventTag::Updated));
        }
        events.push(SessionEvent::SettingsUpdated(self.settings));
        events
    }

    /// Overwrite the lifetime counters, e.g. when hydrating from storage.
    pub fn update_stats(&mut self, stats: StatsSnapshot) -> SessionEvent {
        self.completed_sessions = stats.completed_sessions;
        self.total_time_spent_secs = stats.total_time_spent_secs;
        self.session_count = stats.session_count;
        SessionEvent::StatsUpdated(self.stats())
    }

    /// Zero every counter and drop back to an idle work session. An active
    /// session is fully reset first.
    pub fn clear_stats(&mut self) -> Vec<SessionEvent> {
        self.completed_sessions = 0;
        self.total_time_spent_secs = 0;
        self.session_count = 0;
        let was_active = self.phase != Phase::Idle;
        self.phase = Phase::Idle;
        self.load(SessionKind::Work);
        let mut events = Vec::new();
        if was_active {
            events.push(self.loaded_event(EventTag::Reset));
        }
        events.push(SessionEvent::StatsCleared(self.stats()));
        events
    }

    fn load(&mut self, kind: SessionKind) {
        self.kind = kind;
        self.total_secs = self.settings.duration_secs(kind);
        self.remaining_secs = self.total_secs;
    }

    /// Shared transition policy for completion and skip: a work session
    /// counts toward the cycle and routes to a break; a break always
    /// returns to work.
    fn advance(&mut self) -> (SessionKind, SessionKind) {
        let previous = self.kind;
        let next = if previous == SessionKind::Work {
            self.session_count += 1;
            self.completed_sessions += 1;
            self.next_break_kind()
        } else {
            SessionKind::Work
        };
        self.load(next);
        (previous, next)
    }

    fn next_break_kind(&self) -> SessionKind {
        match self.settings.break_policy {
            BreakPolicy::AlwaysShort => SessionKind::ShortBreak,
            BreakPolicy::AlwaysLong => SessionKind::LongBreak,
            BreakPolicy::Alternating => {
                if self.session_count % CYCLE_LENGTH == 0 {
                    SessionKind::LongBreak
                } else {
                    SessionKind::ShortBreak
                }
            }
        }
    }

    fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        (self.total_secs - self.remaining_secs) as f64 / self.total_secs as f64
    }

    fn loaded_event(&self, tag: EventTag) -> SessionEvent {
        let (kind, remaining_secs, total_secs) = (self.kind, self.remaining_secs, self.total_secs);
        match tag {
            EventTag::Started => SessionEvent::Started { kind, remaining_secs, total_secs },
            EventTag::Paused => SessionEvent::Paused { kind, remaining_secs, total_secs },
            EventTag::Reset => SessionEvent::Reset { kind, remaining_secs, total_secs },
            EventTag::Updated => SessionEvent::Updated { kind, remaining_secs, total_secs },
        }
    }
}

/// Selector for the events that share the loaded-session payload.
enum EventTag {
    Started,
    Paused,
    Reset,
    Updated,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(work: u32, short: u32, long: u32) -> TimerSettings {
        TimerSettings {
            work_mins: work,
            short_break_mins: short,
            long_break_mins: long,
            ..Default::default()
        }
    }

    /// Tick a running session through to its completion event.
    fn run_to_completion(state: &mut SessionState) -> SessionEvent {
        assert_eq!(state.snapshot().phase, Phase::Running, "session must be running");
        let limit = state.snapshot().remaining_secs + 1;
        for _ in 0..limit {
            for event in state.tick() {
                if matches!(event, SessionEvent::SessionCompleted { .. }) {
                    return event;
                }
            }
        }
        panic!("session never completed");
    }

    #[test]
    fn fresh_state_loads_a_full_work_session() {
        let state = SessionState::new(TimerSettings::default());
        let snap = state.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.kind, SessionKind::Work);
        assert_eq!(snap.remaining_secs, 25 * 60);
        assert_eq!(snap.total_secs, 25 * 60);
        assert_eq!(snap.progress, 0.0);
        assert_eq!(snap.completed_sessions, 0);
        assert_eq!(snap.session_count, 0);
    }

    #[test]
    fn start_reports_the_loaded_session() {
        let mut state = SessionState::new(TimerSettings::default());
        let event = state.start().expect("start from idle emits");
        assert_eq!(
            event,
            SessionEvent::Started {
                kind: SessionKind::Work,
                remaining_secs: 1500,
                total_secs: 1500,
            }
        );
        assert_eq!(state.snapshot().phase, Phase::Running);
    }

    #[test]
    fn start_while_running_is_a_noop() {
        let mut state = SessionState::new(TimerSettings::default());
        state.start();
        state.tick();
        let before = state.snapshot();
        assert_eq!(state.start(), None);
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let mut state = SessionState::new(TimerSettings::default());
        state.start();
        for _ in 0..3 {
            state.tick();
        }
        let event = state.pause().expect("pause while running emits");
        assert_eq!(
            event,
            SessionEvent::Paused {
                kind: SessionKind::Work,
                remaining_secs: 1497,
                total_secs: 1500,
            }
        );
        // Paused sessions ignore ticks entirely.
        assert!(state.tick().is_empty());
        assert_eq!(state.snapshot().remaining_secs, 1497);

        let resumed = state.start().expect("resume from pause emits");
        assert_eq!(
            resumed,
            SessionEvent::Started {
                kind: SessionKind::Work,
                remaining_secs: 1497,
                total_secs: 1500,
            }
        );
    }

    #[test]
    fn pause_when_not_running_is_a_noop() {
        let mut state = SessionState::new(TimerSettings::default());
        assert_eq!(state.pause(), None);
        assert_eq!(state.snapshot().phase, Phase::Idle);
    }

    #[test]
    fn ticks_stay_within_bounds_and_report_progress() {
        let mut state = SessionState::new(settings(1, 5, 15));
        state.start();
        let mut last_remaining = 60;
        for _ in 0..30 {
            let events = state.tick();
            assert_eq!(events.len(), 1);
            match events[0] {
                SessionEvent::Tick { remaining_secs, total_secs, progress } => {
                    assert_eq!(remaining_secs, last_remaining - 1);
                    assert_eq!(total_secs, 60);
                    assert!(remaining_secs <= total_secs);
                    assert!((0.0..=1.0).contains(&progress));
                    last_remaining = remaining_secs;
                }
                ref other => panic!("unexpected event: {other:?}"),
            }
        }
        assert!((state.snapshot().progress - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn full_work_session_completes_to_short_break() {
        let mut state = SessionState::new(TimerSettings::default());
        state.start();

        let mut ticks = 0;
        let mut completions = Vec::new();
        for _ in 0..1500 {
            for event in state.tick() {
                match event {
                    SessionEvent::Tick { .. } => ticks += 1,
                    SessionEvent::SessionCompleted { .. } => completions.push(event),
                    other => panic!("unexpected event: {other:?}"),
                }
            }
        }

        assert_eq!(ticks, 1500);
        assert_eq!(
            completions,
            vec![SessionEvent::SessionCompleted {
                previous: SessionKind::Work,
                next: SessionKind::ShortBreak,
                completed_sessions: 1,
                session_count: 1,
                total_time_spent_secs: 1500,
            }]
        );

        let snap = state.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.kind, SessionKind::ShortBreak);
        assert_eq!(snap.remaining_secs, 5 * 60);
    }

    #[test]
    fn final_tick_reports_full_progress() {
        let mut state = SessionState::new(settings(1, 5, 15));
        state.start();
        let mut last_tick_progress = 0.0;
        for _ in 0..60 {
            for event in state.tick() {
                if let SessionEvent::Tick { progress, .. } = event {
                    last_tick_progress = progress;
                }
            }
        }
        assert_eq!(last_tick_progress, 1.0);
    }

    #[test]
    fn only_natural_completions_accrue_time() {
        let mut state = SessionState::new(settings(25, 5, 15));
        state.start();
        run_to_completion(&mut state);
        state.skip(); // skip the break
        state.start();
        run_to_completion(&mut state);

        let stats = state.stats();
        assert_eq!(stats.completed_sessions, 2);
        assert_eq!(stats.total_time_spent_secs, 2 * 1500);
    }

    #[test]
    fn skipping_work_counts_the_session_without_time() {
        let mut state = SessionState::new(TimerSettings::default());
        let event = state.skip();
        assert_eq!(
            event,
            SessionEvent::SessionSkipped {
                previous: SessionKind::Work,
                next: SessionKind::ShortBreak,
                completed_sessions: 1,
                session_count: 1,
            }
        );
        assert_eq!(state.stats().total_time_spent_secs, 0);
        assert_eq!(state.snapshot().phase, Phase::Idle);
    }

    #[test]
    fn skipping_a_break_does_not_touch_counters() {
        let mut state = SessionState::new(TimerSettings::default());
        state.skip(); // work -> short break
        let event = state.skip(); // short break -> work
        assert_eq!(
            event,
            SessionEvent::SessionSkipped {
                previous: SessionKind::ShortBreak,
                next: SessionKind::Work,
                completed_sessions: 1,
                session_count: 1,
            }
        );
    }

    #[test]
    fn fourth_work_skip_routes_to_the_long_break() {
        let mut state = SessionState::new(TimerSettings::default());
        let mut nexts = Vec::new();
        for _ in 0..4 {
            if let SessionEvent::SessionSkipped { next, .. } = state.skip() {
                nexts.push(next);
            }
            state.skip(); // skip the break straight away
        }
        assert_eq!(
            nexts,
            vec![
                SessionKind::ShortBreak,
                SessionKind::ShortBreak,
                SessionKind::ShortBreak,
                SessionKind::LongBreak,
            ]
        );
    }

    #[test]
    fn alternating_policy_earns_a_long_break_every_fourth_completion() {
        let mut state = SessionState::new(settings(1, 1, 1));
        let mut nexts = Vec::new();
        for _ in 0..5 {
            state.start();
            if let SessionEvent::SessionCompleted { next, .. } = run_to_completion(&mut state) {
                nexts.push(next);
            }
            state.skip(); // breaks do not need to run for the cycle to move
        }
        assert_eq!(
            nexts,
            vec![
                SessionKind::ShortBreak,
                SessionKind::ShortBreak,
                SessionKind::ShortBreak,
                SessionKind::LongBreak,
                SessionKind::ShortBreak,
            ]
        );
    }

    #[test]
    fn fixed_break_policies_ignore_the_cycle() {
        let mut always_short = SessionState::new(TimerSettings {
            break_policy: BreakPolicy::AlwaysShort,
            ..settings(1, 1, 1)
        });
        for _ in 0..4 {
            if let SessionEvent::SessionSkipped { next, .. } = always_short.skip() {
                assert_eq!(next, SessionKind::ShortBreak);
            }
            always_short.skip();
        }

        let mut always_long = SessionState::new(TimerSettings {
            break_policy: BreakPolicy::AlwaysLong,
            ..settings(1, 1, 1)
        });
        if let SessionEvent::SessionSkipped { next, .. } = always_long.skip() {
            assert_eq!(next, SessionKind::LongBreak);
        }
    }

    #[test]
    fn reset_reloads_the_current_kind_and_keeps_counters() {
        let mut state = SessionState::new(TimerSettings::default());
        state.skip(); // move into the short break with counters at 1
        state.start();
        for _ in 0..30 {
            state.tick();
        }
        let event = state.reset();
        assert_eq!(
            event,
            SessionEvent::Reset {
                kind: SessionKind::ShortBreak,
                remaining_secs: 300,
                total_secs: 300,
            }
        );
        let snap = state.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.completed_sessions, 1);
        assert_eq!(snap.session_count, 1);
    }

    #[test]
    fn cycle_reset_mid_break_keeps_lifetime_stats() {
        let mut state = SessionState::new(settings(25, 5, 15));
        state.start();
        run_to_completion(&mut state);
        state.skip(); // break -> work
        state.start();
        run_to_completion(&mut state); // two completed work sessions, now in a break
        state.start();
        state.tick();

        let event = state.reset_cycle();
        assert_eq!(
            event,
            SessionEvent::CycleReset {
                kind: SessionKind::Work,
                remaining_secs: 1500,
                total_secs: 1500,
                session_count: 0,
            }
        );
        let snap = state.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.kind, SessionKind::Work);
        assert_eq!(snap.session_count, 0);
        assert_eq!(snap.completed_sessions, 2);
        assert_eq!(snap.total_time_spent_secs, 2 * 1500);
    }

    #[test]
    fn clear_stats_while_running_resets_everything() {
        let mut state = SessionState::new(TimerSettings::default());
        state.skip(); // earn a counter
        state.start(); // running the break
        state.tick();

        let events = state.clear_stats();
        assert_eq!(
            events,
            vec![
                SessionEvent::Reset {
                    kind: SessionKind::Work,
                    remaining_secs: 1500,
                    total_secs: 1500,
                },
                SessionEvent::StatsCleared(StatsSnapshot::default()),
            ]
        );
        let snap = state.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.kind, SessionKind::Work);
        assert_eq!(snap.completed_sessions, 0);
        assert_eq!(snap.session_count, 0);
        assert_eq!(snap.total_time_spent_secs, 0);
    }

    #[test]
    fn clear_stats_while_idle_emits_once() {
        let mut state = SessionState::new(TimerSettings::default());
        let events = state.clear_stats();
        assert_eq!(events, vec![SessionEvent::StatsCleared(StatsSnapshot::default())]);
    }

    #[test]
    fn settings_change_while_idle_reloads_immediately() {
        let mut state = SessionState::new(TimerSettings::default());
        let patch = SettingsPatch { work_mins: Some(30), ..Default::default() };
        let events = state.update_settings(&patch);
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            SessionEvent::Updated {
                kind: SessionKind::Work,
                remaining_secs: 1800,
                total_secs: 1800,
            }
        );
        assert!(matches!(events[1], SessionEvent::SettingsUpdated(s) if s.work_mins == 30));
        assert_eq!(state.snapshot().total_secs, 1800);
    }

    #[test]
    fn settings_change_while_running_defers_the_reload() {
        let mut state = SessionState::new(TimerSettings::default());
        state.start();
        for _ in 0..10 {
            state.tick();
        }
        let patch = SettingsPatch { work_mins: Some(30), ..Default::default() };
        let events = state.update_settings(&patch);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SessionEvent::SettingsUpdated(_)));
        assert_eq!(state.snapshot().total_secs, 1500);
        assert_eq!(state.snapshot().remaining_secs, 1490);
    }

    #[test]
    fn settings_change_while_paused_keeps_progress() {
        let mut state = SessionState::new(TimerSettings::default());
        state.start();
        state.tick();
        state.pause();
        let patch = SettingsPatch { work_mins: Some(30), ..Default::default() };
        state.update_settings(&patch);
        assert_eq!(state.snapshot().remaining_secs, 1499);
        assert_eq!(state.snapshot().total_secs, 1500);

        // The new duration shows up at the next reload.
        state.reset();
        assert_eq!(state.snapshot().total_secs, 1800);
    }

    #[test]
    fn new_break_duration_applies_when_the_break_loads() {
        let mut state = SessionState::new(settings(1, 5, 15));
        state.start();
        let patch = SettingsPatch { short_break_mins: Some(10), ..Default::default() };
        state.update_settings(&patch);
        run_to_completion(&mut state);
        let snap = state.snapshot();
        assert_eq!(snap.kind, SessionKind::ShortBreak);
        assert_eq!(snap.total_secs, 600);
    }

    #[test]
    fn hydrated_stats_continue_the_cycle() {
        let mut state = SessionState::new(settings(1, 1, 1));
        let event = state.update_stats(StatsSnapshot {
            completed_sessions: 7,
            total_time_spent_secs: 9000,
            session_count: 3,
        });
        assert_eq!(
            event,
            SessionEvent::StatsUpdated(StatsSnapshot {
                completed_sessions: 7,
                total_time_spent_secs: 9000,
                session_count: 3,
            })
        );

        // The hydrated cycle position makes this the fourth work session.
        state.start();
        match run_to_completion(&mut state) {
            SessionEvent::SessionCompleted { next, completed_sessions, session_count, .. } => {
                assert_eq!(next, SessionKind::LongBreak);
                assert_eq!(completed_sessions, 8);
                assert_eq!(session_count, 4);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn work_sessions_count_whether_completed_or_skipped() {
        let mut state = SessionState::new(settings(1, 1, 1));
        // Two natural completions and three skips, breaks handled either way.
        state.start();
        run_to_completion(&mut state);
        state.start();
        run_to_completion(&mut state); // break completes naturally too
        state.skip(); // skip work
        state.skip(); // skip break
        state.start();
        run_to_completion(&mut state);
        state.skip(); // skip break
        state.skip(); // skip work
        state.skip(); // skip break
        state.skip(); // skip work

        assert_eq!(state.stats().completed_sessions, 5);
    }

    #[test]
    fn zero_duration_session_completes_on_the_first_tick() {
        let mut state = SessionState::new(settings(0, 5, 15));
        let started = state.start().expect("start emits");
        assert_eq!(
            started,
            SessionEvent::Started {
                kind: SessionKind::Work,
                remaining_secs: 0,
                total_secs: 0,
            }
        );
        let events = state.tick();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            SessionEvent::Tick { remaining_secs: 0, total_secs: 0, progress } if progress == 0.0
        ));
        assert!(matches!(
            events[1],
            SessionEvent::SessionCompleted { next: SessionKind::ShortBreak, .. }
        ));
        assert_eq!(state.stats().total_time_spent_secs, 0);
    }
}
