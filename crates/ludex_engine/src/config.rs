//! Configuration for the sync engine.

/// Configuration for a [`crate::SyncMachine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the backend (e.g. "http://localhost:3000").
    pub base_url: String,
    /// Bearer token, when the deployment is authenticated.
    pub token: Option<String>,
    /// Owning user id; the local-fallback fetch filters mirrored records
    /// to this user when set.
    pub user_id: Option<i64>,
}

impl EngineConfig {
    /// Creates a configuration for the given backend URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            user_id: None,
        }
    }

    /// Sets the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the owning user id.
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = EngineConfig::new("http://localhost:3000")
            .with_token("t0ken")
            .with_user(7);

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.token.as_deref(), Some("t0ken"));
        assert_eq!(config.user_id, Some(7));
    }

    #[test]
    fn defaults_are_anonymous() {
        let config = EngineConfig::new("http://h");
        assert!(config.token.is_none());
        assert!(config.user_id.is_none());
    }
}
