use crate::presentation::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub filter: String,
}

impl TracingConfig {
    pub const DEFAULT_FILTER: &'static str = "info,chemimaster=debug,tower_http=debug";

    pub fn from_settings(settings: &LoggingSettings, environment: Environment) -> Self {
        let filter = if settings.level.trim().is_empty() {
            Self::DEFAULT_FILTER.to_string()
        } else {
            settings.level.clone()
        };

        Self {
            environment: environment.to_string(),
            json_format: settings.enable_json || environment == Environment::Prod,
            filter,
        }
    }
}
