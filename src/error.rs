use thiserror::Error;

/// Failures reading or writing persisted settings and snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("could not encode settings: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings edits the store refuses to apply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("at least one operation must stay enabled")]
    LastOperation,
}
