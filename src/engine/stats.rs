/// Running counters for the current process. Not persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameStatistics {
    pub total_problems: u32,
    pub correct_answers: u32,
}

impl GameStatistics {
    pub fn record_correct(&mut self) {
        self.total_problems = self.total_problems.saturating_add(1);
        self.correct_answers = self.correct_answers.saturating_add(1);
    }

    pub fn record_incorrect(&mut self) {
        self.total_problems = self.total_problems.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn incorrect_answers(&self) -> u32 {
        self.total_problems - self.correct_answers
    }

    /// Truncated whole percentage; 0 before anything was answered.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_problems == 0 {
            return 0;
        }
        (self.correct_answers as u64 * 100 / self.total_problems as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_starts_at_zero() {
        assert_eq!(GameStatistics::default().accuracy_percent(), 0);
    }

    #[test]
    fn test_accuracy_truncates() {
        let mut stats = GameStatistics::default();
        stats.record_correct();
        stats.record_correct();
        stats.record_incorrect();
        assert_eq!(stats.total_problems, 3);
        assert_eq!(stats.correct_answers, 2);
        assert_eq!(stats.incorrect_answers(), 1);
        assert_eq!(stats.accuracy_percent(), 66);
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let mut stats = GameStatistics::default();
        stats.record_correct();
        stats.reset();
        assert_eq!(stats, GameStatistics::default());
    }
}
