use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

pub const DEFAULT_LICENSE_PREFIX: &str = "CHEM";
pub const DEFAULT_LICENSE_SECRET: &str = "chem_master_secret_2025";
pub const DEFAULT_LICENSE_VALIDITY_DAYS: u64 = 30;
pub const DEFAULT_BYPASS_CODE: &str = "ADMIN-TEST";
pub const DEFAULT_ADMIN_PASSWORD: &str = "24434";

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are "ChemiMaster AI", a world-class expert in Chemistry and Chemical Engineering.
Respond in Persian (Farsi).
Rules:
1. Accuracy: Provide technically correct and highly detailed scientific information.
2. Formatting: ALWAYS use LaTeX for chemical formulas, reactions, and math (e.g., $H_2SO_4$, $\Delta G$).
3. Calculations: Show all steps of mathematical problems clearly.
4. Scope: Organic, Inorganic, Physical, Analytical Chemistry, and Unit Operations.
If the question is not related to chemistry or chemical engineering, reply only with:
«ببخشید، فقط سؤالات شیمی و مهندسی شیمی جواب می‌دم. لطفاً در این زمینه بپرس.»
and nothing else."#;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub license: LicenseSettings,
    pub admin: AdminSettings,
    pub llm: LlmSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseSettings {
    pub prefix: String,
    pub secret: String,
    pub validity_days: u64,
    /// Literal accepted in place of a license. Empty disables it.
    #[serde(default)]
    pub bypass_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSettings {
    pub password: String,
}

/// Selects the default base URL. `compatible` has none and needs `base_url`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openai")]
    OpenAi,
    Compatible,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: String,
    pub chat_model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub system_prompt: String,
    pub sse_keep_alive_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub idle_ttl_minutes: u64,
    pub max_sessions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Defaults, then `appsettings.{environment}.toml` if present, then
    /// `APP_*` variables with `__` between sections (`APP_LLM__API_KEY`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder(Environment::Local)?.build()?.try_deserialize()
    }

    fn builder(
        environment: Environment,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default("license.prefix", DEFAULT_LICENSE_PREFIX)?
            .set_default("license.secret", DEFAULT_LICENSE_SECRET)?
            .set_default("license.validity_days", DEFAULT_LICENSE_VALIDITY_DAYS as i64)?
            .set_default("license.bypass_code", DEFAULT_BYPASS_CODE)?
            .set_default("admin.password", DEFAULT_ADMIN_PASSWORD)?
            .set_default("llm.provider", "deepseek")?
            .set_default("llm.api_key", "")?
            .set_default("llm.chat_model", "deepseek-chat")?
            .set_default("llm.max_tokens", 4096_i64)?
            .set_default("llm.temperature", 0.7_f64)?
            .set_default("llm.system_prompt", DEFAULT_SYSTEM_PROMPT)?
            .set_default("llm.sse_keep_alive_seconds", 15_i64)?
            .set_default("session.idle_ttl_minutes", 120_i64)?
            .set_default("session.max_sessions", 10_000_i64)?
            .set_default("logging.level", "")?
            .set_default("logging.enable_json", environment == Environment::Prod)
    }
}
