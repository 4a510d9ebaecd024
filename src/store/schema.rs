use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::{
    OPERAND_MAX, OPERAND_MIN, OperandRange, OperandRanges, Settings, default_addition_ranges,
    default_multiplication_ranges, default_operations,
};
use crate::engine::problem::{Operation, Problem};

pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk shape of the last problem shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastProblemData {
    pub schema_version: u32,
    pub first_operand: i64,
    pub second_operand: i64,
    pub operator: String,
}

impl From<&Problem> for LastProblemData {
    fn from(problem: &Problem) -> Self {
        Self {
            schema_version: SNAPSHOT_VERSION,
            first_operand: problem.first_operand,
            second_operand: problem.second_operand,
            operator: problem.operation.symbol().to_string(),
        }
    }
}

impl LastProblemData {
    /// `None` for unknown versions, unknown operators, and anything the
    /// generator could not have produced.
    pub fn to_problem(&self) -> Option<Problem> {
        if self.schema_version != SNAPSHOT_VERSION {
            return None;
        }
        let operation = Operation::from_symbol(&self.operator)?;
        let problem = Problem::new(self.first_operand, self.second_operand, operation);
        (problem.is_well_formed() && within_operand_limits(&problem)).then_some(problem)
    }
}

/// Subtraction and division are built backwards, so their drawn values are
/// the second operand and the answer.
fn within_operand_limits(problem: &Problem) -> bool {
    let limits = OPERAND_MIN..=OPERAND_MAX;
    let drawn = match problem.operation {
        Operation::Addition | Operation::Multiplication => problem.first_operand,
        Operation::Subtraction | Operation::Division => problem.correct_answer(),
    };
    limits.contains(&drawn) && limits.contains(&problem.second_operand)
}

/// Version 1 settings: flat keys, with subtraction sharing the addition ranges
/// and division sharing the multiplication ranges.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySettings {
    addition_min_number1: Option<i64>,
    addition_max_number1: Option<i64>,
    addition_min_number2: Option<i64>,
    addition_max_number2: Option<i64>,
    multiplication_min_number1: Option<i64>,
    multiplication_max_number1: Option<i64>,
    multiplication_min_number2: Option<i64>,
    multiplication_max_number2: Option<i64>,
    operation_types: Option<BTreeSet<Operation>>,
    generate_new_on_incorrect: Option<bool>,
    automatic_correct: Option<bool>,
    preserve_problems: Option<bool>,
    perfect_animation_enabled: Option<bool>,
    timer_duration: Option<u32>,
}

const LEGACY_KEYS: &[&str] = &[
    "additionMinNumber1",
    "additionMaxNumber1",
    "additionMinNumber2",
    "additionMaxNumber2",
    "multiplicationMinNumber1",
    "multiplicationMaxNumber1",
    "multiplicationMinNumber2",
    "multiplicationMaxNumber2",
    "operationTypes",
    "generateNewOnIncorrect",
    "automaticCorrect",
    "preserveProblems",
    "perfectAnimationEnabled",
    "timerDuration",
];

impl LegacySettings {
    pub fn matches(table: &toml::Table) -> bool {
        !table.contains_key("schema_version") && LEGACY_KEYS.iter().any(|k| table.contains_key(*k))
    }

    pub fn migrate(self) -> Settings {
        let defaults = Settings::default();
        let add = default_addition_ranges();
        let mul = default_multiplication_ranges();
        let addition = OperandRanges {
            first: OperandRange::new(
                self.addition_min_number1.unwrap_or(add.first.min),
                self.addition_max_number1.unwrap_or(add.first.max),
            ),
            second: OperandRange::new(
                self.addition_min_number2.unwrap_or(add.second.min),
                self.addition_max_number2.unwrap_or(add.second.max),
            ),
        };
        let multiplication = OperandRanges {
            first: OperandRange::new(
                self.multiplication_min_number1.unwrap_or(mul.first.min),
                self.multiplication_max_number1.unwrap_or(mul.first.max),
            ),
            second: OperandRange::new(
                self.multiplication_min_number2.unwrap_or(mul.second.min),
                self.multiplication_max_number2.unwrap_or(mul.second.max),
            ),
        };

        Settings {
            operations: self.operation_types.unwrap_or_else(default_operations),
            generate_new_on_incorrect: self
                .generate_new_on_incorrect
                .unwrap_or(defaults.generate_new_on_incorrect),
            automatic_correct: self.automatic_correct.unwrap_or(defaults.automatic_correct),
            preserve_problems: self.preserve_problems.unwrap_or(defaults.preserve_problems),
            perfect_animation_enabled: self
                .perfect_animation_enabled
                .unwrap_or(defaults.perfect_animation_enabled),
            timer_duration: self.timer_duration.unwrap_or(defaults.timer_duration),
            addition,
            subtraction: addition,
            multiplication,
            division: multiplication,
            ..defaults
        }
    }
}
