//! Configuration access port trait.

/// Read-only access to sectioned key/value settings.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// `None` when the key is absent; `Some(Err(_))` when present but not an unsigned integer.
    fn get_u64(&self, section: &str, key: &str) -> Option<Result<u64, String>> {
        self.get_string(section, key).map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| format!("'{}': {}", raw.trim(), e))
        })
    }
}
