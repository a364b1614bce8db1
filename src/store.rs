use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::{LogEntry, UserProfile};

pub const PROFILE_KEY: &str = "profile";
pub const LOGS_KEY: &str = "logs";

/// String key-value persistence backing the profile and the log.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process store, for tests and embedders that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Profile and daily log, written through to a [`KeyValueStore`] on every
/// change.
pub struct ProfileStore<S> {
    store: S,
    profile_key: String,
    logs_key: String,
    profile: UserProfile,
    logs: Vec<LogEntry>,
    has_saved_profile: bool,
}

impl<S: KeyValueStore> ProfileStore<S> {
    /// Load with the default keys.
    pub fn load(store: S) -> Result<Self> {
        Self::load_with_keys(store, PROFILE_KEY, LOGS_KEY)
    }

    pub fn load_with_keys(store: S, profile_key: &str, logs_key: &str) -> Result<Self> {
        let saved_profile = store.get(profile_key)?;
        let has_saved_profile = saved_profile.is_some();
        let profile = match saved_profile {
            Some(json) => serde_json::from_str(&json)
                .with_context(|| format!("Corrupt profile under key {:?}", profile_key))?,
            None => UserProfile::default(),
        };
        let logs = match store.get(logs_key)? {
            Some(json) => serde_json::from_str(&json)
                .with_context(|| format!("Corrupt log under key {:?}", logs_key))?,
            None => Vec::new(),
        };

        Ok(Self {
            store,
            profile_key: profile_key.to_string(),
            logs_key: logs_key.to_string(),
            profile,
            logs,
            has_saved_profile,
        })
    }

    /// Whether a profile was found in the store when it was loaded.
    pub fn has_saved_profile(&self) -> bool {
        self.has_saved_profile
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// All log entries, in the order their dates were first written.
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn log_for(&self, date: NaiveDate) -> Option<&LogEntry> {
        self.logs.iter().find(|l| l.date == date)
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Apply `f` to the profile and persist it.
    pub fn update_profile(&mut self, f: impl FnOnce(&mut UserProfile)) -> Result<()> {
        f(&mut self.profile);
        let json = serde_json::to_string(&self.profile)?;
        self.store
            .set(&self.profile_key, &json)
            .with_context(|| format!("Failed to save profile under key {:?}", self.profile_key))
    }

    /// Apply `f` to the entry for `date`, creating it at the end of the log if
    /// absent, and persist the log.
    pub fn update_log(&mut self, date: NaiveDate, f: impl FnOnce(&mut LogEntry)) -> Result<()> {
        let idx = match self.logs.iter().position(|l| l.date == date) {
            Some(idx) => idx,
            None => {
                self.logs.push(LogEntry::new(date));
                self.logs.len() - 1
            }
        };
        f(&mut self.logs[idx]);

        let json = serde_json::to_string(&self.logs)?;
        self.store
            .set(&self.logs_key, &json)
            .with_context(|| format!("Failed to save log under key {:?}", self.logs_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[test]
    fn update_log_upserts_by_date_in_insertion_order() {
        let mut store = ProfileStore::load(MemoryStore::new()).unwrap();
        store.update_log(day(3), |e| e.weight_kg = Some(80.0)).unwrap();
        store.update_log(day(1), |e| e.weight_kg = Some(81.0)).unwrap();
        store.update_log(day(3), |e| e.sleep_hours = Some(7.5)).unwrap();

        let dates: Vec<_> = store.logs().iter().map(|l| l.date).collect();
        assert_eq!(dates, vec![day(3), day(1)]);
        let third = store.log_for(day(3)).unwrap();
        assert_eq!(third.weight_kg, Some(80.0));
        assert_eq!(third.sleep_hours, Some(7.5));
    }

    #[test]
    fn writes_go_through_to_the_backing_store() {
        let mut store = ProfileStore::load(MemoryStore::new()).unwrap();
        assert!(!store.has_saved_profile());
        store.update_profile(|p| p.age = Some(33)).unwrap();
        store.update_log(day(2), |e| e.append_meal("arroz e feijão")).unwrap();

        let reloaded = ProfileStore::load(store.into_inner()).unwrap();
        assert!(reloaded.has_saved_profile());
        assert_eq!(reloaded.profile().age, Some(33));
        assert_eq!(
            reloaded.logs()[0].meal_log.as_deref(),
            Some("arroz e feijão")
        );
    }

    #[test]
    fn corrupt_profile_is_an_error() {
        let mut kv = MemoryStore::new();
        kv.set(PROFILE_KEY, "{not json").unwrap();
        let err = ProfileStore::load(kv).err().unwrap();
        assert!(err.to_string().contains("Corrupt profile"));
    }

    #[test]
    fn file_store_round_trips_and_reports_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut kv = FileStore::new(dir.path().join("data")).unwrap();
        assert_eq!(kv.get("profile").unwrap(), None);
        kv.set("profile", "{\"age\":40}").unwrap();
        assert_eq!(kv.get("profile").unwrap().as_deref(), Some("{\"age\":40}"));
        assert!(kv.dir().join("profile.json").exists());
    }
}
