//! The drill itself, independent of any UI.
//!
//! `Practice` owns the current problem, the answer line, statistics, the
//! sprint state machine and every timer. Front-ends push user actions in,
//! call [`Practice::advance`] with elapsed time, and either read state back
//! or subscribe to [`PracticeEvent`]s.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::engine::evaluator::{AnswerEvaluator, Outcome};
use crate::engine::problem::{Operation, Problem};
use crate::engine::progress;
use crate::engine::stats::GameStatistics;
use crate::engine::timer::{Scheduler, TimerId};
use crate::error::SettingsError;
use crate::generator::{ProblemSource, RandomProblemGenerator};
use crate::session::input::{self, AnswerInput};
use crate::session::result::SessionSummary;
use crate::session::timed::{SUMMARY_DISMISS_DELAY, TICK_INTERVAL, TickResult, TimedSession};
use crate::store::{SettingsRepository, SettingsStore};

/// How long an answer's colour stays up before the drill moves on.
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    CountdownTick,
    FeedbackDone { advance: bool },
    SummaryDismiss,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PracticeEvent {
    ProblemChanged(Problem),
    Answered { outcome: Outcome, celebrate: bool },
    FeedbackFinished,
    SessionStarted { duration_secs: u32 },
    SessionCancelled,
    SessionExpired(SessionSummary),
    SummaryToggled { expanded: bool },
    SummaryDismissed,
    SettingsChanged,
    StatsReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PracticeEvent)>;

pub struct Practice<R, G = RandomProblemGenerator> {
    settings: SettingsStore<R>,
    generator: G,
    problem: Problem,
    input: AnswerInput,
    evaluator: AnswerEvaluator,
    stats: GameStatistics,
    session: TimedSession,
    timers: Scheduler<TimerKind>,
    tick_timer: Option<TimerId>,
    feedback_timer: Option<TimerId>,
    dismiss_timer: Option<TimerId>,
    feedback: Option<Outcome>,
    celebrating: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<R: SettingsRepository, G: ProblemSource> Practice<R, G> {
    /// Resumes the saved problem when preservation is on, otherwise starts fresh.
    pub fn new(mut settings: SettingsStore<R>, mut generator: G) -> Self {
        let problem = match settings.last_problem() {
            Some(problem) => {
                info!(%problem, "restored last problem");
                problem
            }
            None => {
                let problem = generator.generate(settings.settings());
                if let Err(err) = settings.remember_problem(&problem) {
                    warn!(error = %err, "could not save problem snapshot");
                }
                problem
            }
        };
        let session = TimedSession::new(settings.settings().timer_duration);

        Self {
            settings,
            generator,
            problem,
            input: AnswerInput::new(),
            evaluator: AnswerEvaluator::new(),
            stats: GameStatistics::default(),
            session,
            timers: Scheduler::new(),
            tick_timer: None,
            feedback_timer: None,
            dismiss_timer: None,
            feedback: None,
            celebrating: false,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    pub fn stats(&self) -> &GameStatistics {
        &self.stats
    }

    pub fn session(&self) -> &TimedSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn settings_store(&self) -> &SettingsStore<R> {
        &self.settings
    }

    /// Outcome whose feedback is currently on screen.
    pub fn feedback(&self) -> Option<Outcome> {
        self.feedback
    }

    /// Perfect answer with the celebration enabled.
    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn is_awaiting_feedback(&self) -> bool {
        self.feedback_timer.is_some()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn level(&self) -> u32 {
        progress::level_for(self.stats.correct_answers)
    }

    pub fn progress_to_next_level(&self) -> f64 {
        progress::progress_to_next_level(self.stats.correct_answers)
    }

    pub fn points_to_next_level(&self) -> u64 {
        progress::points_to_next_level(self.stats.correct_answers)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&PracticeEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    // ---- answering ----

    /// With automatic checking on, every digit is an implicit submit.
    pub fn append_digit(&mut self, ch: char) -> Outcome {
        if self.is_awaiting_feedback() || !input::process_digit(&mut self.input, ch) {
            return Outcome::Ignored;
        }
        if self.settings.settings().automatic_correct {
            self.check(true)
        } else {
            Outcome::Ignored
        }
    }

    pub fn clear(&mut self) {
        if self.is_awaiting_feedback() {
            return;
        }
        input::process_clear(&mut self.input);
        self.evaluator.clear();
    }

    pub fn submit(&mut self) -> Outcome {
        if self.is_awaiting_feedback() {
            return Outcome::Ignored;
        }
        self.check(false)
    }

    pub fn new_problem(&mut self) {
        self.next_problem();
    }

    fn check(&mut self, auto_submit: bool) -> Outcome {
        let outcome = self.evaluator.submit(
            &self.problem,
            self.input.as_str(),
            auto_submit,
            self.settings.settings(),
            &mut self.stats,
        );

        let advance = match outcome {
            Outcome::Ignored => return outcome,
            Outcome::Perfect | Outcome::CorrectWithRetry => {
                self.session.record_solved();
                true
            }
            Outcome::Incorrect => self.settings.settings().generate_new_on_incorrect,
        };
        self.celebrating =
            outcome == Outcome::Perfect && self.settings.settings().perfect_animation_enabled;
        self.begin_feedback(outcome, advance);

        debug!(
            problem = %self.problem,
            input = self.input.as_str(),
            ?outcome,
            total = self.stats.total_problems,
            correct = self.stats.correct_answers,
            "answer checked"
        );
        let celebrate = self.celebrating;
        self.emit(PracticeEvent::Answered { outcome, celebrate });
        outcome
    }

    fn begin_feedback(&mut self, outcome: Outcome, advance: bool) {
        self.cancel_feedback();
        self.feedback = Some(outcome);
        self.feedback_timer = Some(
            self.timers
                .schedule_once(FEEDBACK_DURATION, TimerKind::FeedbackDone { advance }),
        );
    }

    fn finish_feedback(&mut self, advance: bool) {
        self.feedback_timer = None;
        self.feedback = None;
        self.celebrating = false;
        self.emit(PracticeEvent::FeedbackFinished);
        if advance {
            self.next_problem();
        } else {
            input::process_clear(&mut self.input);
            self.evaluator.forget_last_checked();
        }
    }

    fn cancel_feedback(&mut self) {
        if let Some(id) = self.feedback_timer.take() {
            self.timers.cancel(id);
        }
        self.feedback = None;
        self.celebrating = false;
    }

    fn next_problem(&mut self) {
        self.cancel_feedback();
        self.problem = self.generator.generate(self.settings.settings());
        if let Err(err) = self.settings.remember_problem(&self.problem) {
            warn!(error = %err, "could not save problem snapshot");
        }
        input::process_clear(&mut self.input);
        self.evaluator.reset();
        debug!(problem = %self.problem, "new problem");
        self.emit(PracticeEvent::ProblemChanged(self.problem));
    }

    // ---- timed sprint ----

    pub fn toggle_timer(&mut self) {
        if self.session.is_running() {
            self.cancel_session();
        } else {
            self.start_session();
        }
    }

    fn start_session(&mut self) {
        self.cancel_dismiss_timer();
        self.session.set_duration(self.settings.settings().timer_duration);
        self.session.start();
        self.next_problem();
        self.tick_timer = Some(
            self.timers
                .schedule_repeating(TICK_INTERVAL, TimerKind::CountdownTick),
        );
        let duration_secs = self.session.duration_secs();
        info!(duration_secs, "sprint started");
        self.emit(PracticeEvent::SessionStarted { duration_secs });
    }

    fn cancel_session(&mut self) {
        self.cancel_tick_timer();
        if self.session.cancel() {
            info!(solved = self.session.problems_solved(), "sprint cancelled");
            self.emit(PracticeEvent::SessionCancelled);
        }
    }

    fn on_tick(&mut self) {
        match self.session.tick(TICK_INTERVAL) {
            TickResult::Running => {}
            TickResult::Stale => self.cancel_tick_timer(),
            TickResult::Expired => {
                self.cancel_tick_timer();
                self.schedule_dismiss();
                if let Some(summary) = self.session.summary().cloned() {
                    info!(solved = summary.problems_solved, "sprint finished");
                    self.emit(PracticeEvent::SessionExpired(summary));
                }
            }
        }
    }

    /// Expanding keeps the summary up until it is collapsed again.
    pub fn toggle_summary_expanded(&mut self) -> Option<bool> {
        let expanded = self.session.toggle_expanded()?;
        if expanded {
            self.cancel_dismiss_timer();
        } else {
            self.schedule_dismiss();
        }
        self.emit(PracticeEvent::SummaryToggled { expanded });
        Some(expanded)
    }

    pub fn dismiss_summary(&mut self) -> bool {
        self.cancel_dismiss_timer();
        if !self.session.dismiss() {
            return false;
        }
        self.emit(PracticeEvent::SummaryDismissed);
        true
    }

    fn schedule_dismiss(&mut self) {
        self.cancel_dismiss_timer();
        self.dismiss_timer = Some(
            self.timers
                .schedule_once(SUMMARY_DISMISS_DELAY, TimerKind::SummaryDismiss),
        );
    }

    fn cancel_dismiss_timer(&mut self) {
        if let Some(id) = self.dismiss_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn cancel_tick_timer(&mut self) {
        if let Some(id) = self.tick_timer.take() {
            self.timers.cancel(id);
        }
    }

    /// Moves the drill clock forward, firing whatever came due in order.
    pub fn advance(&mut self, elapsed: Duration) {
        let deadline = self.timers.now() + elapsed;
        while let Some((id, kind)) = self.timers.poll_until(deadline) {
            match kind {
                TimerKind::CountdownTick => self.on_tick(),
                TimerKind::FeedbackDone { advance } => {
                    if self.feedback_timer == Some(id) {
                        self.finish_feedback(advance);
                    }
                }
                TimerKind::SummaryDismiss => {
                    if self.dismiss_timer == Some(id) {
                        self.dismiss_timer = None;
                        if !self.session.is_expanded() {
                            self.dismiss_summary();
                        }
                    }
                }
            }
        }
    }

    // ---- settings and statistics ----

    /// Every settings write is persisted and replaces the current problem.
    pub fn edit_settings(&mut self, edit: impl FnOnce(&mut Settings)) {
        let was_preserving = self.settings.settings().preserve_problems;
        if let Err(err) = self.settings.update(edit) {
            warn!(error = %err, "could not save settings");
        }
        self.after_settings_change(was_preserving);
    }

    pub fn toggle_operation(&mut self, op: Operation) -> Result<bool, SettingsError> {
        let was_preserving = self.settings.settings().preserve_problems;
        let enabled = self.settings.toggle_operation(op)?;
        self.after_settings_change(was_preserving);
        Ok(enabled)
    }

    pub fn reset_settings(&mut self) {
        let was_preserving = self.settings.settings().preserve_problems;
        if let Err(err) = self.settings.reset_to_defaults() {
            warn!(error = %err, "could not save settings");
        }
        self.after_settings_change(was_preserving);
    }

    fn after_settings_change(&mut self, was_preserving: bool) {
        let preserving = self.settings.settings().preserve_problems;
        if was_preserving && !preserving {
            if let Err(err) = self.settings.forget_problem() {
                warn!(error = %err, "could not remove problem snapshot");
            }
        }
        self.session
            .set_duration(self.settings.settings().timer_duration);
        self.emit(PracticeEvent::SettingsChanged);
        self.next_problem();
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
        info!("statistics reset");
        self.emit(PracticeEvent::StatsReset);
    }

    fn emit(&mut self, event: PracticeEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}
