use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
    ];

    /// Key used in the settings file and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operation::Addition => "Addition",
            Operation::Subtraction => "Subtraction",
            Operation::Multiplication => "Multiplication",
            Operation::Division => "Division",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operation::Addition => '+',
            Operation::Subtraction => '−',
            Operation::Multiplication => '×',
            Operation::Division => '÷',
        }
    }

    /// Accepts the display symbol as well as the ASCII spellings people type.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "+" => Some(Operation::Addition),
            "-" | "−" => Some(Operation::Subtraction),
            "×" | "x" | "*" => Some(Operation::Multiplication),
            "÷" | "/" => Some(Operation::Division),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == key)
            .or_else(|| Operation::from_symbol(&key))
            .ok_or_else(|| format!("unknown operation: {s}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Problem {
    pub first_operand: i64,
    pub second_operand: i64,
    pub operation: Operation,
}

impl Problem {
    pub fn new(first_operand: i64, second_operand: i64, operation: Operation) -> Self {
        Self {
            first_operand,
            second_operand,
            operation,
        }
    }

    /// `None` when the problem has no integer answer (zero divisor or overflow).
    pub fn checked_answer(&self) -> Option<i64> {
        let (a, b) = (self.first_operand, self.second_operand);
        match self.operation {
            Operation::Addition => a.checked_add(b),
            Operation::Subtraction => a.checked_sub(b),
            Operation::Multiplication => a.checked_mul(b),
            Operation::Division => a.checked_div(b),
        }
    }

    /// Division truncates toward zero.
    pub fn correct_answer(&self) -> i64 {
        self.checked_answer().unwrap_or_default()
    }

    /// Has a whole, non-negative answer, i.e. one digit-only input can express.
    pub fn is_well_formed(&self) -> bool {
        if self.operation == Operation::Division
            && self.first_operand.checked_rem(self.second_operand) != Some(0)
        {
            return false;
        }
        self.checked_answer().is_some_and(|answer| answer >= 0)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.first_operand,
            self.operation.symbol(),
            self.second_operand
        )
    }
}
