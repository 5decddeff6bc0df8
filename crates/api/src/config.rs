use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub session: SessionConfig,
    /// Chat-completion service used by the AI assistant
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Allowed browser origins. Empty allows any origin (development only).
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Requests per client per minute; 0 disables rate limiting
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds (default: 86400 = 24 hours)
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,

    /// How often expired sessions are swept
    #[serde(default = "default_prune_interval")]
    pub prune_interval_secs: u64,

    /// Set the `Secure` cookie attribute; enable behind HTTPS
    #[serde(default)]
    pub secure_cookie: bool,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the chat-completion service. Empty runs in fallback mode.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_ai_base_url")]
    pub base_url: String,

    #[serde(default = "default_ai_model")]
    pub model: String,

    /// Upper bound on a single completion call
    #[serde(default = "default_ai_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            timeout_ms: default_ai_timeout_ms(),
        }
    }
}

impl AiConfig {
    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Well-known accounts created on startup.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_bootstrap_enabled")]
    pub enabled: bool,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    #[serde(default = "default_staff_password")]
    pub staff_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: default_bootstrap_enabled(),
            admin_password: default_admin_password(),
            staff_password: default_staff_password(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    300
}
fn default_session_ttl() -> u64 {
    86400
}
fn default_prune_interval() -> u64 {
    300
}
fn default_cookie_name() -> String {
    "carehome.sid".to_string()
}
fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_ai_model() -> String {
    "gpt-4o".to_string()
}
fn default_ai_timeout_ms() -> u64 {
    15000
}
fn default_bootstrap_enabled() -> bool {
    true
}
fn default_admin_password() -> String {
    "admin123".to_string()
}
fn default_staff_password() -> String {
    "staff123".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with CH__ prefix
    /// 4. OPENAI_API_KEY, when CH__AI__API_KEY is not set
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CH").separator("__"));

        if std::env::var_os("CH__AI__API_KEY").is_none() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                builder = builder.set_override("ai.api_key", key)?;
            }
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds entirely from embedded defaults so tests do not depend on
    /// the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 5000
            request_timeout_secs = 30

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_minute = 300
            hsts_enabled = false

            [session]
            ttl_secs = 86400
            prune_interval_secs = 300
            secure_cookie = false
            cookie_name = "carehome.sid"

            [ai]
            base_url = "https://api.openai.com/v1"
            model = "gpt-4o"
            timeout_ms = 15000

            [bootstrap]
            enabled = true
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.session.ttl_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "session.ttl_secs must be greater than 0".to_string(),
            ));
        }

        if self.ai.timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "ai.timeout_ms must be greater than 0".to_string(),
            ));
        }

        // The AI call must give up before the request does
        if self.ai.timeout_ms >= self.server.request_timeout_secs.saturating_mul(1000) {
            return Err(ConfigValidationError::InvalidValue(
                "ai.timeout_ms must be shorter than server.request_timeout_secs".to_string(),
            ));
        }

        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigValidationError::InvalidValue(
                "session.cookie_name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
