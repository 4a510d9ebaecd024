use crate::config::Settings;
use crate::engine::problem::Problem;
use crate::error::StoreError;
use crate::store::SettingsRepository;
use crate::store::schema::LastProblemData;

/// Keeps everything in memory. Used when the data directories are unusable
/// and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    settings: Option<Settings>,
    last_problem: Option<LastProblemData>,
    pub saves: usize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: Some(settings),
            ..Self::default()
        }
    }

    /// Seeds a raw snapshot, including ones that will not decode.
    pub fn with_snapshot(mut self, data: LastProblemData) -> Self {
        self.last_problem = Some(data);
        self
    }
}

impl SettingsRepository for MemoryRepository {
    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(self.settings.clone())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.settings = Some(settings.clone());
        self.saves += 1;
        Ok(())
    }

    fn load_last_problem(&self) -> Option<Problem> {
        self.last_problem.as_ref().and_then(LastProblemData::to_problem)
    }

    fn save_last_problem(&mut self, problem: Option<&Problem>) -> Result<(), StoreError> {
        self.last_problem = problem.map(LastProblemData::from);
        Ok(())
    }
}
