use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Settings;
use crate::engine::problem::Problem;
use crate::error::StoreError;
use crate::store::SettingsRepository;
use crate::store::schema::LastProblemData;

const SNAPSHOT_FILE: &str = "last_problem.json";

/// Settings as TOML under the config dir, the snapshot as JSON under the data dir.
pub struct FileRepository {
    settings_path: PathBuf,
    data_dir: PathBuf,
}

impl FileRepository {
    pub fn new() -> Result<Self, StoreError> {
        Self::with_settings_path(Settings::default_path())
    }

    /// Alternate settings file, snapshot still in the default data dir.
    pub fn with_settings_path(settings_path: PathBuf) -> Result<Self, StoreError> {
        Self::with_paths(settings_path, Self::default_data_dir())
    }

    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathdrill")
    }

    pub fn with_paths(settings_path: PathBuf, data_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            settings_path,
            data_dir,
        })
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    /// Write to a sibling `.tmp` file, sync, then rename over the target.
    fn write_atomic(path: &Path, content: &str) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

impl SettingsRepository for FileRepository {
    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        if !self.settings_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.settings_path)?;
        Settings::from_toml_str(&content).map(Some)
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        let content = settings.to_toml_string()?;
        Self::write_atomic(&self.settings_path, &content)?;
        debug!(path = %self.settings_path.display(), "settings saved");
        Ok(())
    }

    fn load_last_problem(&self) -> Option<Problem> {
        let path = self.snapshot_path();
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<LastProblemData>(&content) {
            Ok(data) => data.to_problem(),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable problem snapshot");
                None
            }
        }
    }

    fn save_last_problem(&mut self, problem: Option<&Problem>) -> Result<(), StoreError> {
        let path = self.snapshot_path();
        match problem {
            Some(problem) => {
                let json = serde_json::to_string_pretty(&LastProblemData::from(problem))?;
                Self::write_atomic(&path, &json)
            }
            None => {
                if path.exists() {
                    fs::remove_file(&path)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::problem::Operation;
    use tempfile::TempDir;

    fn make_test_repo() -> (TempDir, FileRepository) {
        let dir = TempDir::new().unwrap();
        let repo = FileRepository::with_paths(
            dir.path().join("config").join("settings.toml"),
            dir.path().join("data"),
        )
        .unwrap();
        (dir, repo)
    }

    #[test]
    fn test_missing_settings_file_loads_none() {
        let (_dir, repo) = make_test_repo();
        assert!(repo.load_settings().unwrap().is_none());
    }

    #[test]
    fn test_settings_round_trip_creates_parent_dirs() {
        let (_dir, mut repo) = make_test_repo();
        let mut settings = Settings::default();
        settings.generate_new_on_incorrect = true;
        settings.timer_duration = 15;
        repo.save_settings(&settings).unwrap();
        assert!(repo.settings_path().exists());
        assert_eq!(repo.load_settings().unwrap(), Some(settings));
    }

    #[test]
    fn test_corrupt_settings_file_is_an_error() {
        let (_dir, repo) = make_test_repo();
        fs::create_dir_all(repo.settings_path().parent().unwrap()).unwrap();
        fs::write(repo.settings_path(), "timer_duration = [").unwrap();
        assert!(matches!(repo.load_settings(), Err(StoreError::TomlDe(_))));
    }

    #[test]
    fn test_legacy_file_is_rewritten_on_save() {
        let (_dir, mut repo) = make_test_repo();
        fs::create_dir_all(repo.settings_path().parent().unwrap()).unwrap();
        fs::write(repo.settings_path(), "timerDuration = 30\n").unwrap();

        let settings = repo.load_settings().unwrap().unwrap();
        assert_eq!(settings.timer_duration, 30);
        repo.save_settings(&settings).unwrap();

        let content = fs::read_to_string(repo.settings_path()).unwrap();
        assert!(content.contains("schema_version = 2"));
        assert!(!content.contains("timerDuration"));
    }

    #[test]
    fn test_snapshot_round_trip_and_removal() {
        let (_dir, mut repo) = make_test_repo();
        assert_eq!(repo.load_last_problem(), None);

        let problem = Problem::new(143, 11, Operation::Division);
        repo.save_last_problem(Some(&problem)).unwrap();
        assert_eq!(repo.load_last_problem(), Some(problem));
        assert!(!repo.snapshot_path().with_extension("tmp").exists());

        repo.save_last_problem(None).unwrap();
        assert!(!repo.snapshot_path().exists());
        assert_eq!(repo.load_last_problem(), None);
    }

    #[test]
    fn test_garbage_snapshot_falls_back_to_none() {
        let (_dir, repo) = make_test_repo();
        fs::write(repo.snapshot_path(), "{ not json").unwrap();
        assert_eq!(repo.load_last_problem(), None);
    }
}
