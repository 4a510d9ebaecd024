pub mod evaluator;
pub mod problem;
pub mod progress;
pub mod stats;
pub mod timer;

pub use evaluator::{AnswerEvaluator, Feedback, Outcome};
pub use problem::{Operation, Problem};
pub use stats::GameStatistics;
