use std::sync::mpsc;
use std::time::Duration;

use crate::config::{Bound, Operand, Settings, format_duration};
use crate::engine::evaluator::Outcome;
use crate::engine::problem::Operation;
use crate::generator::{ProblemSource, RandomProblemGenerator};
use crate::practice::{Practice, PracticeEvent};
use crate::store::SettingsRepository;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Practice,
    Settings,
    Stats,
}

impl AppScreen {
    pub const ALL: [AppScreen; 3] = [AppScreen::Practice, AppScreen::Settings, AppScreen::Stats];
    pub const TITLES: [&'static str; 3] = ["Practice", "Settings", "Stats"];

    pub fn index(self) -> usize {
        match self {
            AppScreen::Practice => 0,
            AppScreen::Settings => 1,
            AppScreen::Stats => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// One editable row on the settings screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsField {
    Operation(Operation),
    Bound(Operation, Operand, Bound),
    TimerDuration,
    GenerateNewOnIncorrect,
    AutomaticCorrect,
    PreserveProblems,
    PerfectAnimation,
    ResetDefaults,
}

impl SettingsField {
    pub fn all() -> Vec<SettingsField> {
        let mut fields: Vec<SettingsField> =
            Operation::ALL.into_iter().map(SettingsField::Operation).collect();
        for op in Operation::ALL {
            for operand in [Operand::First, Operand::Second] {
                for bound in [Bound::Min, Bound::Max] {
                    fields.push(SettingsField::Bound(op, operand, bound));
                }
            }
        }
        fields.extend([
            SettingsField::TimerDuration,
            SettingsField::GenerateNewOnIncorrect,
            SettingsField::AutomaticCorrect,
            SettingsField::PreserveProblems,
            SettingsField::PerfectAnimation,
            SettingsField::ResetDefaults,
        ]);
        fields
    }

    pub fn label(self) -> String {
        match self {
            SettingsField::Operation(op) => format!("{} ({})", op.label(), op.symbol()),
            SettingsField::Bound(op, operand, bound) => {
                let which = match operand {
                    Operand::First => "first",
                    Operand::Second => "second",
                };
                let end = match bound {
                    Bound::Min => "min",
                    Bound::Max => "max",
                };
                format!("  {} {which} number {end}", op.label())
            }
            SettingsField::TimerDuration => "Timer duration".to_string(),
            SettingsField::GenerateNewOnIncorrect => "New problem after a wrong answer".to_string(),
            SettingsField::AutomaticCorrect => "Check answer while typing".to_string(),
            SettingsField::PreserveProblems => "Keep problem between runs".to_string(),
            SettingsField::PerfectAnimation => "Celebrate perfect answers".to_string(),
            SettingsField::ResetDefaults => "Reset to defaults".to_string(),
        }
    }

    pub fn value(self, settings: &Settings) -> String {
        fn on_off(flag: bool) -> String {
            if flag { "on" } else { "off" }.to_string()
        }
        match self {
            SettingsField::Operation(op) => on_off(settings.is_enabled(op)),
            SettingsField::Bound(op, operand, bound) => {
                let range = settings.ranges(op).operand(operand);
                match bound {
                    Bound::Min => range.min.to_string(),
                    Bound::Max => range.max.to_string(),
                }
            }
            SettingsField::TimerDuration => format_duration(settings.timer_duration),
            SettingsField::GenerateNewOnIncorrect => on_off(settings.generate_new_on_incorrect),
            SettingsField::AutomaticCorrect => on_off(settings.automatic_correct),
            SettingsField::PreserveProblems => on_off(settings.preserve_problems),
            SettingsField::PerfectAnimation => on_off(settings.perfect_animation_enabled),
            SettingsField::ResetDefaults => String::new(),
        }
    }
}

/// `practice` is declared before `events`, so the receiver outlives the
/// subscription and a failed send only happens if that order changes.
fn forward_event(tx: &mpsc::Sender<PracticeEvent>, event: &PracticeEvent) -> bool {
    if tx.send(event.clone()).is_err() {
        tracing::debug!(?event, "status channel closed");
        return false;
    }
    true
}

pub struct App<R: SettingsRepository, G: ProblemSource = RandomProblemGenerator> {
    pub screen: AppScreen,
    pub practice: Practice<R, G>,
    pub theme: &'static Theme,
    pub should_quit: bool,
    pub settings_fields: Vec<SettingsField>,
    pub settings_selected: usize,
    pub status: Option<String>,
    events: mpsc::Receiver<PracticeEvent>,
}

impl<R: SettingsRepository, G: ProblemSource> App<R, G> {
    pub fn new(mut practice: Practice<R, G>, theme: &'static Theme) -> Self {
        let (tx, rx) = mpsc::channel();
        practice.subscribe(move |event| {
            forward_event(&tx, event);
        });

        Self {
            screen: AppScreen::Practice,
            practice,
            theme,
            should_quit: false,
            settings_fields: SettingsField::all(),
            settings_selected: 0,
            status: None,
            events: rx,
        }
    }

    pub fn next_screen(&mut self) {
        self.screen = self.screen.next();
    }

    pub fn prev_screen(&mut self) {
        self.screen = self.screen.prev();
    }

    /// Advances drill timers by real elapsed time.
    pub fn on_tick(&mut self, elapsed: Duration) {
        self.practice.advance(elapsed);
        self.pump_events();
    }

    /// Folds controller notifications into the status line.
    pub fn pump_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                PracticeEvent::Answered { outcome, .. } => {
                    self.status = match outcome {
                        Outcome::Incorrect => Some("Not quite".to_string()),
                        _ => None,
                    };
                }
                PracticeEvent::SessionStarted { duration_secs } => {
                    self.status = Some(format!("Sprint: {}", format_duration(duration_secs)));
                }
                PracticeEvent::SessionCancelled => {
                    self.status = Some("Sprint cancelled".to_string());
                }
                PracticeEvent::SessionExpired(summary) => {
                    self.status = Some(summary.headline());
                }
                PracticeEvent::SettingsChanged => {
                    self.status = Some("Settings saved".to_string());
                }
                PracticeEvent::StatsReset => {
                    self.status = Some("Statistics reset".to_string());
                }
                PracticeEvent::ProblemChanged(_)
                | PracticeEvent::FeedbackFinished
                | PracticeEvent::SummaryToggled { .. }
                | PracticeEvent::SummaryDismissed => {}
            }
        }
    }

    pub fn selected_field(&self) -> SettingsField {
        self.settings_fields[self.settings_selected.min(self.settings_fields.len() - 1)]
    }

    pub fn settings_up(&mut self) {
        self.settings_selected = self.settings_selected.saturating_sub(1);
    }

    pub fn settings_down(&mut self) {
        if self.settings_selected + 1 < self.settings_fields.len() {
            self.settings_selected += 1;
        }
    }

    /// Applies the selected row's change; `forward` is Right/Enter, `!forward` is Left.
    pub fn settings_change(&mut self, forward: bool) {
        match self.selected_field() {
            SettingsField::Operation(op) => {
                if let Err(err) = self.practice.toggle_operation(op) {
                    self.status = Some(err.to_string());
                    return;
                }
            }
            SettingsField::Bound(op, operand, bound) => {
                let range = self.practice.settings().ranges(op).operand(operand);
                let current = match bound {
                    Bound::Min => range.min,
                    Bound::Max => range.max,
                };
                let step = if forward { 1 } else { -1 };
                self.practice
                    .edit_settings(|s| s.set_bound(op, operand, bound, current + step));
            }
            SettingsField::TimerDuration => {
                self.practice.edit_settings(|s| s.cycle_timer_preset(forward));
            }
            SettingsField::GenerateNewOnIncorrect => self
                .practice
                .edit_settings(|s| s.generate_new_on_incorrect = !s.generate_new_on_incorrect),
            SettingsField::AutomaticCorrect => self
                .practice
                .edit_settings(|s| s.automatic_correct = !s.automatic_correct),
            SettingsField::PreserveProblems => self
                .practice
                .edit_settings(|s| s.preserve_problems = !s.preserve_problems),
            SettingsField::PerfectAnimation => self
                .practice
                .edit_settings(|s| s.perfect_animation_enabled = !s.perfect_animation_enabled),
            SettingsField::ResetDefaults => self.practice.reset_settings(),
        }
        self.pump_events();
    }

    pub fn reset_stats(&mut self) {
        self.practice.reset_stats();
        self.pump_events();
    }
}
