pub mod settings;

pub use settings::{InMemorySettingsStore, SettingsStore};
