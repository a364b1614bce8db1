pub mod commands;
pub mod config;
pub mod conversation;
pub mod metrics;
pub mod models;
pub mod report;
pub mod store;
pub mod templates;

pub use config::CoachConfig;
pub use conversation::{Reply, Session, State};
pub use metrics::{compute_energy_targets, EnergyTargets};
pub use models::{ActivityLevel, Approach, LogEntry, UserProfile};
pub use report::build_report;
pub use store::{FileStore, KeyValueStore, MemoryStore, ProfileStore};
