pub mod random;

use crate::config::Settings;
use crate::engine::problem::Problem;

pub use random::RandomProblemGenerator;

pub trait ProblemSource {
    fn generate(&mut self, settings: &Settings) -> Problem;
}
