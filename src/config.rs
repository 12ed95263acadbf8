use anyhow::Result;
use compute::default_view_controller;
use dataset::Dataset;
use moka::future::Cache;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8050;

/// Runtime settings
///
/// Layered from defaults, `FORECASTBOARD_*` environment variables and the
/// plain `HOST` / `PORT` overrides, in that order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Static dataset file; the compiled-in figures are used when absent
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    /// Idle time after which a session is dropped
    pub session_ttl_secs: u64,
    /// Upper bound on live sessions
    pub session_capacity: u64,
}

impl Settings {
    /// Load settings from `.env` and the process environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Self::from_vars(std::env::vars().collect())?;
        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Build settings from an explicit set of environment variables
    pub fn from_vars(vars: ::config::Map<String, String>) -> Result<Self> {
        let host = vars.get("HOST").cloned();
        let port = vars.get("PORT").cloned();

        let settings = ::config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("session_ttl_secs", 1800)?
            .set_default("session_capacity", 10_000)?
            .add_source(::config::Environment::with_prefix("FORECASTBOARD").source(Some(vars)))
            .set_override_option("host", host)?
            .set_override_option("port", port)?
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dataset_path: None,
            session_ttl_secs: 1800,
            session_capacity: 10_000,
        }
    }
}

/// Build the dataset from `path`, or from the compiled-in figures.
pub fn load_dataset(path: Option<&Path>) -> Result<Dataset> {
    let dataset = match path {
        Some(path) => {
            info!("Loading dataset from {}", path.display());
            Dataset::from_path(path)?
        }
        None => {
            debug!("Using compiled-in dataset");
            Dataset::builtin()?
        }
    };
    Ok(dataset)
}

/// Initialize application state; integrity failures abort here.
pub fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    let dataset = load_dataset(settings.dataset_path.as_deref())?;
    let controller = default_view_controller(Arc::new(dataset));

    // Initialize session store
    let sessions = Cache::builder()
        .max_capacity(settings.session_capacity)
        .time_to_idle(Duration::from_secs(settings.session_ttl_secs))
        .build();

    Ok(AppState {
        controller: Arc::new(controller),
        sessions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.bind_address(), "0.0.0.0:8050");
        assert!(settings.dataset_path.is_none());
    }

    fn vars(pairs: &[(&str, &str)]) -> ::config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_vars_defaults() {
        let settings = Settings::from_vars(vars(&[("PATH", "/usr/bin")])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.port, 8050);
    }

    #[test]
    fn test_prefixed_variables_are_read() {
        let settings = Settings::from_vars(vars(&[
            ("FORECASTBOARD_PORT", "7000"),
            ("FORECASTBOARD_DATASET_PATH", "/srv/forecast.json"),
            ("FORECASTBOARD_SESSION_TTL_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(settings.port, 7000);
        assert_eq!(settings.dataset_path, Some(PathBuf::from("/srv/forecast.json")));
        assert_eq!(settings.session_ttl_secs, 60);
    }

    #[test]
    fn test_plain_port_and_host_win() {
        let settings = Settings::from_vars(vars(&[
            ("FORECASTBOARD_PORT", "7000"),
            ("PORT", "9000"),
            ("HOST", "127.0.0.1"),
        ]))
        .unwrap();
        assert_eq!(settings.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Settings::from_vars(vars(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn test_initialize_app_state_with_builtin_dataset() {
        let state = initialize_app_state(&Settings::default()).unwrap();
        assert_eq!(state.controller.dataset().list_tables().len(), 6);
        assert_eq!(state.sessions.entry_count(), 0);
    }

    #[test]
    fn test_missing_dataset_file_fails() {
        let settings = Settings {
            dataset_path: Some(PathBuf::from("/nonexistent/forecast.json")),
            ..Settings::default()
        };
        assert!(initialize_app_state(&settings).is_err());
    }
}
