use std::path::PathBuf;

use crate::store::{LOGS_KEY, PROFILE_KEY};

/// Where and under which keys a session persists its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachConfig {
    pub data_dir: PathBuf,
    pub profile_key: String,
    pub logs_key: String,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".lean-coach"),
            profile_key: PROFILE_KEY.to_string(),
            logs_key: LOGS_KEY.to_string(),
        }
    }
}

impl CoachConfig {
    /// Defaults overridden by `COACH_DATA_DIR`, `COACH_PROFILE_KEY` and
    /// `COACH_LOGS_KEY`. A `.env` file in the working directory is loaded
    /// first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("COACH_DATA_DIR").filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = var("COACH_PROFILE_KEY").filter(|v| !v.is_empty()) {
            self.profile_key = key;
        }
        if let Some(key) = var("COACH_LOGS_KEY").filter(|v| !v.is_empty()) {
            self.logs_key = key;
        }
        tracing::debug!(
            data_dir = %self.data_dir.display(),
            profile_key = %self.profile_key,
            logs_key = %self.logs_key,
            "coach config resolved"
        );
    }
}
