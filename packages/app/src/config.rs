use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub firestore_project_id: String,
    pub firestore_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            firestore_project_id: env::var("FIRESTORE_PROJECT_ID")
                .context("FIRESTORE_PROJECT_ID must be set")?,
            firestore_api_key: env::var("FIRESTORE_API_KEY").ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutation cannot race another test in this file.
    #[test]
    fn loads_from_environment() {
        env::remove_var("FIRESTORE_PROJECT_ID");
        env::remove_var("FIRESTORE_API_KEY");
        assert!(Config::from_env().is_err());

        env::set_var("FIRESTORE_PROJECT_ID", "demo-project");
        let config = Config::from_env().unwrap();
        assert_eq!(config.firestore_project_id, "demo-project");
        assert!(config.firestore_api_key.is_none());

        env::remove_var("FIRESTORE_PROJECT_ID");
    }
}
