pub mod file_store;
pub mod memory;
pub mod schema;

use tracing::{info, warn};

use crate::config::Settings;
use crate::engine::problem::{Operation, Problem};
use crate::error::{SettingsError, StoreError};

/// Where settings and the last-problem snapshot live between runs.
pub trait SettingsRepository {
    /// `Ok(None)` when nothing has been saved yet.
    fn load_settings(&self) -> Result<Option<Settings>, StoreError>;

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError>;

    /// Absent, unreadable, or malformed snapshots all come back as `None`.
    fn load_last_problem(&self) -> Option<Problem>;

    /// `None` removes the snapshot.
    fn save_last_problem(&mut self, problem: Option<&Problem>) -> Result<(), StoreError>;
}

impl<R: SettingsRepository + ?Sized> SettingsRepository for Box<R> {
    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        (**self).load_settings()
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        (**self).save_settings(settings)
    }

    fn load_last_problem(&self) -> Option<Problem> {
        (**self).load_last_problem()
    }

    fn save_last_problem(&mut self, problem: Option<&Problem>) -> Result<(), StoreError> {
        (**self).save_last_problem(problem)
    }
}

/// Current settings plus the repository that persists them.
pub struct SettingsStore<R> {
    settings: Settings,
    repo: R,
}

impl<R: SettingsRepository> SettingsStore<R> {
    /// Restores saved settings, falling back to defaults when the repository
    /// is empty or unreadable.
    pub fn load(repo: R) -> Self {
        let settings = match repo.load_settings() {
            Ok(Some(mut settings)) => {
                settings.normalize();
                settings
            }
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!(error = %err, "could not read settings, using defaults");
                Settings::default()
            }
        };
        Self { settings, repo }
    }

    pub fn with_settings(repo: R, mut settings: Settings) -> Self {
        settings.normalize();
        Self { settings, repo }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Applies an edit, normalizes, and persists.
    pub fn update(&mut self, edit: impl FnOnce(&mut Settings)) -> Result<(), StoreError> {
        edit(&mut self.settings);
        self.settings.normalize();
        self.persist()
    }

    pub fn toggle_operation(&mut self, op: Operation) -> Result<bool, SettingsError> {
        let enabled = self.settings.toggle_operation(op)?;
        info!(operation = %op, enabled, "operation toggled");
        if let Err(err) = self.persist() {
            warn!(error = %err, "could not save settings");
        }
        Ok(enabled)
    }

    /// Edits the in-memory settings without saving, for per-run overrides.
    pub fn apply_transient(&mut self, edit: impl FnOnce(&mut Settings)) {
        edit(&mut self.settings);
        self.settings.normalize();
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), StoreError> {
        info!("settings reset to defaults");
        self.update(Settings::reset_to_defaults)
    }

    pub fn persist(&mut self) -> Result<(), StoreError> {
        self.repo.save_settings(&self.settings)
    }

    /// Snapshot is only read back when problem preservation is on.
    pub fn last_problem(&self) -> Option<Problem> {
        if !self.settings.preserve_problems {
            return None;
        }
        self.repo.load_last_problem()
    }

    pub fn remember_problem(&mut self, problem: &Problem) -> Result<(), StoreError> {
        if !self.settings.preserve_problems {
            return Ok(());
        }
        self.repo.save_last_problem(Some(problem))
    }

    pub fn forget_problem(&mut self) -> Result<(), StoreError> {
        self.repo.save_last_problem(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryRepository;

    #[test]
    fn test_load_uses_defaults_for_empty_repository() {
        let store = SettingsStore::load(MemoryRepository::new());
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_update_persists_normalized_settings() {
        let mut store = SettingsStore::load(MemoryRepository::new());
        store
            .update(|s| {
                s.timer_duration = 0;
                s.operations.clear();
            })
            .unwrap();
        let saved = store.repository().load_settings().unwrap().unwrap();
        assert_eq!(saved.timer_duration, 1);
        assert_eq!(saved.operations.len(), 1);
        assert_eq!(&saved, store.settings());
    }

    #[test]
    fn test_toggle_rejects_last_operation() {
        let mut settings = Settings::default();
        settings.operations = [Operation::Multiplication].into_iter().collect();
        let mut store = SettingsStore::with_settings(MemoryRepository::new(), settings);
        assert_eq!(
            store.toggle_operation(Operation::Multiplication),
            Err(SettingsError::LastOperation)
        );
        assert!(store.settings().is_enabled(Operation::Multiplication));
    }

    #[test]
    fn test_transient_edit_is_not_saved() {
        let mut store = SettingsStore::load(MemoryRepository::new());
        store.apply_transient(|s| s.timer_duration = 15);
        assert_eq!(store.settings().timer_duration, 15);
        assert_eq!(store.repository().saves, 0);
        assert!(store.repository().load_settings().unwrap().is_none());
    }

    #[test]
    fn test_last_problem_requires_preserve_flag() {
        let mut store = SettingsStore::load(MemoryRepository::new());
        let problem = Problem::new(3, 4, Operation::Multiplication);
        store.remember_problem(&problem).unwrap();
        assert_eq!(store.last_problem(), Some(problem));

        store.update(|s| s.preserve_problems = false).unwrap();
        assert_eq!(store.last_problem(), None);
    }
}
