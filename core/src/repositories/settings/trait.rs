//! Settings store trait for runtime-tunable values kept outside the code.

/// Read-only access to `section -> key -> value` settings
///
/// Implementations return `None` when a value is absent; parsing is left to
/// the caller or to the provided helpers.
pub trait SettingsStore: Send + Sync {
    /// Fetch a raw setting value
    fn get(&self, section: &str, key: &str) -> Option<String>;

    /// Fetch a setting and parse it as an integer
    ///
    /// Values that do not parse are treated as absent.
    fn get_i64(&self, section: &str, key: &str) -> Option<i64> {
        self.get(section, key)
            .and_then(|value| value.trim().parse().ok())
    }
}
