/// What a finished sprint shows in the summary banner.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub problems_solved: u32,
    pub total_time_secs: u32,
}

impl SessionSummary {
    pub fn new(problems_solved: u32, total_time_secs: u32) -> Self {
        Self {
            problems_solved,
            total_time_secs,
        }
    }

    /// Undefined when nothing was solved.
    pub fn average_secs_per_problem(&self) -> Option<f64> {
        if self.problems_solved == 0 {
            return None;
        }
        Some(self.total_time_secs as f64 / self.problems_solved as f64)
    }

    pub fn headline(&self) -> String {
        let noun = if self.problems_solved == 1 {
            "problem"
        } else {
            "problems"
        };
        format!("Time's up! {} {noun} solved", self.problems_solved)
    }
}
