use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IteratorRandom;

use crate::config::{OperandRange, Settings};
use crate::engine::problem::{Operation, Problem};
use crate::generator::ProblemSource;

/// Draws operands uniformly from the configured ranges.
///
/// Subtraction and division are built backwards from their answer so the
/// result is always a whole, non-negative number: `(n1 + n2) − n1 = n2` and
/// `(n1 × n2) ÷ n1 = n2`.
pub struct RandomProblemGenerator {
    rng: SmallRng,
}

impl RandomProblemGenerator {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Ranges are held to the operand limits even when settings skipped
    /// normalization, so products stay small and divisors stay nonzero.
    fn draw(&mut self, range: OperandRange) -> i64 {
        let range = range.clamped();
        self.rng.gen_range(range.min..=range.max)
    }

    fn pick_operation(&mut self, settings: &Settings) -> Operation {
        settings
            .operations
            .iter()
            .copied()
            .choose(&mut self.rng)
            .unwrap_or(Operation::Addition)
    }
}

impl Default for RandomProblemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemSource for RandomProblemGenerator {
    fn generate(&mut self, settings: &Settings) -> Problem {
        let operation = self.pick_operation(settings);
        let ranges = *settings.ranges(operation);
        match operation {
            Operation::Addition | Operation::Multiplication => {
                let a = self.draw(ranges.first);
                let b = self.draw(ranges.second);
                Problem::new(a, b, operation)
            }
            Operation::Subtraction => {
                let n1 = self.draw(ranges.first);
                let n2 = self.draw(ranges.second);
                Problem::new(n1 + n2, n1, operation)
            }
            Operation::Division => {
                let n1 = self.draw(ranges.first);
                let n2 = self.draw(ranges.second);
                Problem::new(n1 * n2, n1, operation)
            }
        }
    }
}
