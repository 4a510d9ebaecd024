use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::problem::Operation;
use crate::error::{SettingsError, StoreError};
use crate::store::schema::LegacySettings;

pub const SETTINGS_SCHEMA_VERSION: u32 = 2;

/// Bounds the settings editor keeps operands within.
pub const OPERAND_MIN: i64 = 1;
pub const OPERAND_MAX: i64 = 999;

pub const MIN_TIMER_DURATION: u32 = 1;
pub const TIMER_PRESETS: [u32; 5] = [15, 30, 60, 120, 300];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRange {
    pub min: i64,
    pub max: i64,
}

impl OperandRange {
    /// Reversed bounds are swapped.
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn normalized(self) -> Self {
        Self::new(self.min, self.max)
    }

    /// Both bounds pulled into `OPERAND_MIN..=OPERAND_MAX`, then ordered.
    pub fn clamped(self) -> Self {
        Self::new(
            self.min.clamp(OPERAND_MIN, OPERAND_MAX),
            self.max.clamp(OPERAND_MIN, OPERAND_MAX),
        )
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRanges {
    pub first: OperandRange,
    pub second: OperandRange,
}

impl OperandRanges {
    pub fn uniform(min: i64, max: i64) -> Self {
        Self {
            first: OperandRange::new(min, max),
            second: OperandRange::new(min, max),
        }
    }

    pub fn operand(&self, operand: Operand) -> OperandRange {
        match operand {
            Operand::First => self.first,
            Operand::Second => self.second,
        }
    }

    fn operand_mut(&mut self, operand: Operand) -> &mut OperandRange {
        match operand {
            Operand::First => &mut self.first,
            Operand::Second => &mut self.second,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    First,
    Second,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default = "default_operations")]
    pub operations: BTreeSet<Operation>,
    #[serde(default = "default_generate_new_on_incorrect")]
    pub generate_new_on_incorrect: bool,
    #[serde(default = "default_automatic_correct")]
    pub automatic_correct: bool,
    #[serde(default = "default_preserve_problems")]
    pub preserve_problems: bool,
    #[serde(default = "default_perfect_animation_enabled")]
    pub perfect_animation_enabled: bool,
    #[serde(default = "default_timer_duration")]
    pub timer_duration: u32,
    #[serde(default = "default_addition_ranges")]
    pub addition: OperandRanges,
    #[serde(default = "default_addition_ranges")]
    pub subtraction: OperandRanges,
    #[serde(default = "default_multiplication_ranges")]
    pub multiplication: OperandRanges,
    #[serde(default = "default_multiplication_ranges")]
    pub division: OperandRanges,
}

fn default_schema_version() -> u32 {
    SETTINGS_SCHEMA_VERSION
}
pub(crate) fn default_operations() -> BTreeSet<Operation> {
    Operation::ALL.into_iter().collect()
}
fn default_generate_new_on_incorrect() -> bool {
    false
}
fn default_automatic_correct() -> bool {
    false
}
fn default_preserve_problems() -> bool {
    true
}
fn default_perfect_animation_enabled() -> bool {
    true
}
fn default_timer_duration() -> u32 {
    60
}
pub(crate) fn default_addition_ranges() -> OperandRanges {
    OperandRanges::uniform(2, 100)
}
pub(crate) fn default_multiplication_ranges() -> OperandRanges {
    OperandRanges::uniform(2, 12)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            operations: default_operations(),
            generate_new_on_incorrect: default_generate_new_on_incorrect(),
            automatic_correct: default_automatic_correct(),
            preserve_problems: default_preserve_problems(),
            perfect_animation_enabled: default_perfect_animation_enabled(),
            timer_duration: default_timer_duration(),
            addition: default_addition_ranges(),
            subtraction: default_addition_ranges(),
            multiplication: default_multiplication_ranges(),
            division: default_multiplication_ranges(),
        }
    }
}

impl Settings {
    /// Parses either the current document or a version-1 document with flat
    /// camelCase keys, then normalizes the result.
    pub fn from_toml_str(content: &str) -> Result<Self, StoreError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut settings = if LegacySettings::matches(&table) {
            toml::from_str::<LegacySettings>(content)?.migrate()
        } else {
            toml::from_str::<Settings>(content)?
        };
        settings.normalize();
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, StoreError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathdrill")
            .join("settings.toml")
    }

    /// Heals states that cannot be generated from: empty operation set,
    /// out-of-limit or reversed ranges, zero duration.
    pub fn normalize(&mut self) {
        self.schema_version = SETTINGS_SCHEMA_VERSION;
        if self.operations.is_empty() {
            self.operations.insert(Operation::Addition);
        }
        for op in Operation::ALL {
            let ranges = self.ranges_mut(op);
            ranges.first = ranges.first.clamped();
            ranges.second = ranges.second.clamped();
        }
        self.timer_duration = self.timer_duration.max(MIN_TIMER_DURATION);
    }

    pub fn ranges(&self, op: Operation) -> &OperandRanges {
        match op {
            Operation::Addition => &self.addition,
            Operation::Subtraction => &self.subtraction,
            Operation::Multiplication => &self.multiplication,
            Operation::Division => &self.division,
        }
    }

    pub fn ranges_mut(&mut self, op: Operation) -> &mut OperandRanges {
        match op {
            Operation::Addition => &mut self.addition,
            Operation::Subtraction => &mut self.subtraction,
            Operation::Multiplication => &mut self.multiplication,
            Operation::Division => &mut self.division,
        }
    }

    pub fn is_enabled(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }

    /// Flips `op` and returns whether it is now enabled. Refuses to disable
    /// the last remaining operation.
    pub fn toggle_operation(&mut self, op: Operation) -> Result<bool, SettingsError> {
        if self.operations.contains(&op) {
            if self.operations.len() == 1 {
                return Err(SettingsError::LastOperation);
            }
            self.operations.remove(&op);
            Ok(false)
        } else {
            self.operations.insert(op);
            Ok(true)
        }
    }

    /// Editor write: clamps into the operand limits and never lets min pass max.
    pub fn set_bound(&mut self, op: Operation, operand: Operand, bound: Bound, value: i64) {
        let value = value.clamp(OPERAND_MIN, OPERAND_MAX);
        let range = self.ranges_mut(op).operand_mut(operand);
        match bound {
            Bound::Min => range.min = value.min(range.max),
            Bound::Max => range.max = value.max(range.min),
        }
    }

    pub fn set_timer_duration(&mut self, seconds: u32) {
        self.timer_duration = seconds.max(MIN_TIMER_DURATION);
    }

    /// Steps through [`TIMER_PRESETS`], wrapping at either end. A custom
    /// duration jumps to the nearest preset in the chosen direction.
    pub fn cycle_timer_preset(&mut self, forward: bool) {
        let current = self.timer_duration;
        let next = if forward {
            TIMER_PRESETS
                .iter()
                .copied()
                .find(|&p| p > current)
                .unwrap_or(TIMER_PRESETS[0])
        } else {
            TIMER_PRESETS
                .iter()
                .rev()
                .copied()
                .find(|&p| p < current)
                .unwrap_or(TIMER_PRESETS[TIMER_PRESETS.len() - 1])
        };
        self.set_timer_duration(next);
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }
}

/// Human-readable preset label: "30 seconds", "2 minutes".
pub fn format_duration(seconds: u32) -> String {
    if seconds < 60 {
        format!("{seconds} seconds")
    } else if seconds % 60 == 0 {
        let minutes = seconds / 60;
        format!("{minutes} minute{}", if minutes > 1 { "s" } else { "" })
    } else {
        format!("{}m {}s", seconds / 60, seconds % 60)
    }
}
