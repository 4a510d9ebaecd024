//! Countdown sprint: Idle → Running → Summary → Idle.
//!
//! The machine only tracks state; the practice controller owns the timers
//! that drive `tick` and the summary auto-dismiss.

use std::time::Duration;

use crate::session::result::SessionSummary;

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const SUMMARY_DISMISS_DELAY: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Summary { expanded: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickResult {
    Running,
    Expired,
    /// Tick arrived outside Running and was dropped.
    Stale,
}

#[derive(Clone, Debug)]
pub struct TimedSession {
    state: SessionState,
    duration: Duration,
    displayed: Duration,
    problems_solved: u32,
    summary: Option<SessionSummary>,
}

impl TimedSession {
    pub fn new(duration_secs: u32) -> Self {
        let duration = Duration::from_secs(duration_secs.max(1) as u64);
        Self {
            state: SessionState::Idle,
            duration,
            displayed: duration,
            problems_solved: 0,
            summary: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn is_showing_summary(&self) -> bool {
        matches!(self.state, SessionState::Summary { .. })
    }

    pub fn is_expanded(&self) -> bool {
        self.state == SessionState::Summary { expanded: true }
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration.as_secs() as u32
    }

    /// Fractional seconds left, counting down continuously.
    pub fn displayed_time(&self) -> f64 {
        self.displayed.as_secs_f64()
    }

    /// Whole seconds left: floor of the displayed time.
    pub fn remaining_time(&self) -> u32 {
        self.displayed.as_secs() as u32
    }

    pub fn problems_solved(&self) -> u32 {
        self.problems_solved
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Takes effect immediately unless a countdown is in progress, in which
    /// case the next start picks it up.
    pub fn set_duration(&mut self, duration_secs: u32) {
        self.duration = Duration::from_secs(duration_secs.max(1) as u64);
        if !self.is_running() {
            self.displayed = self.duration;
        }
    }

    /// Starts a countdown from Idle or from a showing Summary.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = SessionState::Running;
        self.displayed = self.duration;
        self.problems_solved = 0;
        self.summary = None;
        true
    }

    /// Abandons a running countdown without a summary.
    pub fn cancel(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = SessionState::Idle;
        self.displayed = self.duration;
        true
    }

    pub fn tick(&mut self, interval: Duration) -> TickResult {
        if !self.is_running() {
            return TickResult::Stale;
        }
        self.displayed = self.displayed.saturating_sub(interval);
        if !self.displayed.is_zero() {
            return TickResult::Running;
        }
        self.summary = Some(SessionSummary::new(
            self.problems_solved,
            self.duration_secs(),
        ));
        self.state = SessionState::Summary { expanded: false };
        self.displayed = self.duration;
        TickResult::Expired
    }

    pub fn record_solved(&mut self) {
        if self.is_running() {
            self.problems_solved += 1;
        }
    }

    /// Returns the new expanded flag, or `None` when no summary is showing.
    pub fn toggle_expanded(&mut self) -> Option<bool> {
        match self.state {
            SessionState::Summary { expanded } => {
                self.state = SessionState::Summary {
                    expanded: !expanded,
                };
                Some(!expanded)
            }
            _ => None,
        }
    }

    pub fn dismiss(&mut self) -> bool {
        if !self.is_showing_summary() {
            return false;
        }
        self.state = SessionState::Idle;
        true
    }
}
