mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    AdminSettings, DEFAULT_ADMIN_PASSWORD, DEFAULT_BYPASS_CODE, DEFAULT_LICENSE_PREFIX,
    DEFAULT_LICENSE_SECRET, DEFAULT_LICENSE_VALIDITY_DAYS, DEFAULT_SYSTEM_PROMPT, LicenseSettings,
    LlmProvider, LlmSettings, LoggingSettings, ServerSettings, SessionSettings, Settings,
};
