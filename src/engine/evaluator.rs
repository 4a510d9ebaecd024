use crate::config::Settings;
use crate::engine::problem::Problem;
use crate::engine::stats::GameStatistics;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Unparseable, duplicate, or a suppressed automatic check. Nothing changed.
    Ignored,
    /// Correct on the first try with no Clear in between.
    Perfect,
    CorrectWithRetry,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Success,
    Warning,
    Error,
}

impl Outcome {
    pub fn is_correct(self) -> bool {
        matches!(self, Outcome::Perfect | Outcome::CorrectWithRetry)
    }

    pub fn feedback(self) -> Option<Feedback> {
        match self {
            Outcome::Ignored => None,
            Outcome::Perfect => Some(Feedback::Success),
            Outcome::CorrectWithRetry => Some(Feedback::Warning),
            Outcome::Incorrect => Some(Feedback::Error),
        }
    }
}

/// Per-problem bookkeeping. Reset whenever a new problem is shown.
#[derive(Clone, Debug, Default)]
pub struct AnswerEvaluator {
    has_cleared: bool,
    has_submitted_incorrectly: bool,
    last_checked: Option<String>,
    is_perfect: bool,
}

impl AnswerEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The user wiped their input: the next correct answer can no longer be perfect.
    pub fn clear(&mut self) {
        self.has_cleared = true;
        self.last_checked = None;
    }

    /// Input was emptied by the app after a wrong answer; same text may be scored again.
    pub fn forget_last_checked(&mut self) {
        self.last_checked = None;
    }

    pub fn has_cleared(&self) -> bool {
        self.has_cleared
    }

    pub fn has_submitted_incorrectly(&self) -> bool {
        self.has_submitted_incorrectly
    }

    pub fn is_perfect(&self) -> bool {
        self.is_perfect
    }

    pub fn submit(
        &mut self,
        problem: &Problem,
        raw_input: &str,
        auto_submit: bool,
        settings: &Settings,
        stats: &mut GameStatistics,
    ) -> Outcome {
        let Ok(answer) = raw_input.trim().parse::<i64>() else {
            return Outcome::Ignored;
        };
        if self.last_checked.as_deref() == Some(raw_input) {
            return Outcome::Ignored;
        }

        if answer == problem.correct_answer() {
            stats.record_correct();
            self.is_perfect = !self.has_cleared && !self.has_submitted_incorrectly;
            self.last_checked = Some(raw_input.to_string());
            if self.is_perfect {
                Outcome::Perfect
            } else {
                Outcome::CorrectWithRetry
            }
        } else if settings.automatic_correct && auto_submit {
            Outcome::Ignored
        } else {
            stats.record_incorrect();
            self.has_submitted_incorrectly = true;
            self.last_checked = Some(raw_input.to_string());
            Outcome::Incorrect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::problem::Operation;

    fn problem() -> Problem {
        Problem::new(12, 30, Operation::Addition)
    }

    #[test]
    fn test_first_correct_answer_is_perfect() {
        let mut evaluator = AnswerEvaluator::new();
        let mut stats = GameStatistics::default();
        let outcome = evaluator.submit(&problem(), "42", false, &Settings::default(), &mut stats);
        assert_eq!(outcome, Outcome::Perfect);
        assert_eq!(outcome.feedback(), Some(Feedback::Success));
        assert_eq!(stats.total_problems, 1);
        assert_eq!(stats.correct_answers, 1);
    }

    #[test]
    fn test_duplicate_submission_is_ignored() {
        let mut evaluator = AnswerEvaluator::new();
        let mut stats = GameStatistics::default();
        let settings = Settings::default();
        evaluator.submit(&problem(), "42", false, &settings, &mut stats);
        let again = evaluator.submit(&problem(), "42", false, &settings, &mut stats);
        assert_eq!(again, Outcome::Ignored);
        assert_eq!(stats.total_problems, 1);
        assert_eq!(stats.correct_answers, 1);
    }

    #[test]
    fn test_unparseable_input_changes_nothing() {
        let mut evaluator = AnswerEvaluator::new();
        let mut stats = GameStatistics::default();
        let settings = Settings::default();
        for raw in ["", "abc", "99999999999999999999999"] {
            assert_eq!(
                evaluator.submit(&problem(), raw, false, &settings, &mut stats),
                Outcome::Ignored
            );
        }
        assert_eq!(stats, GameStatistics::default());
        assert!(!evaluator.has_submitted_incorrectly());
    }

    #[test]
    fn test_correct_after_wrong_is_retry() {
        let mut evaluator = AnswerEvaluator::new();
        let mut stats = GameStatistics::default();
        let settings = Settings::default();
        assert_eq!(
            evaluator.submit(&problem(), "41", false, &settings, &mut stats),
            Outcome::Incorrect
        );
        let outcome = evaluator.submit(&problem(), "42", false, &settings, &mut stats);
        assert_eq!(outcome, Outcome::CorrectWithRetry);
        assert_eq!(outcome.feedback(), Some(Feedback::Warning));
        assert_eq!(stats.total_problems, 2);
        assert_eq!(stats.correct_answers, 1);
    }

    #[test]
    fn test_correct_after_clear_is_retry() {
        let mut evaluator = AnswerEvaluator::new();
        let mut stats = GameStatistics::default();
        evaluator.clear();
        let outcome = evaluator.submit(&problem(), "42", false, &Settings::default(), &mut stats);
        assert_eq!(outcome, Outcome::CorrectWithRetry);
        assert!(!evaluator.is_perfect());
    }

    #[test]
    fn test_automatic_mode_suppresses_wrong_prefixes() {
        let mut evaluator = AnswerEvaluator::new();
        let mut stats = GameStatistics::default();
        let settings = Settings {
            automatic_correct: true,
            ..Settings::default()
        };
        assert_eq!(
            evaluator.submit(&problem(), "4", true, &settings, &mut stats),
            Outcome::Ignored
        );
        assert_eq!(
            evaluator.submit(&problem(), "43", true, &settings, &mut stats),
            Outcome::Ignored
        );
        assert_eq!(stats.total_problems, 0);

        // An explicit submit of the same wrong value still counts.
        assert_eq!(
            evaluator.submit(&problem(), "43", false, &settings, &mut stats),
            Outcome::Incorrect
        );
        assert_eq!(stats.total_problems, 1);
    }

    #[test]
    fn test_automatic_mode_accepts_correct_value() {
        let mut evaluator = AnswerEvaluator::new();
        let mut stats = GameStatistics::default();
        let settings = Settings {
            automatic_correct: true,
            ..Settings::default()
        };
        assert_eq!(
            evaluator.submit(&problem(), "42", true, &settings, &mut stats),
            Outcome::Perfect
        );
        assert_eq!(stats.correct_answers, 1);
    }

    #[test]
    fn test_reset_restores_perfect_eligibility() {
        let mut evaluator = AnswerEvaluator::new();
        let mut stats = GameStatistics::default();
        let settings = Settings::default();
        evaluator.submit(&problem(), "1", false, &settings, &mut stats);
        evaluator.reset();
        assert_eq!(
            evaluator.submit(&problem(), "42", false, &settings, &mut stats),
            Outcome::Perfect
        );
    }
}
