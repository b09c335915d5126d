use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub jwt: JwtSettings,
    /// Roster of users allowed to log in. Admin accounts are marked by role.
    #[serde(default)]
    pub users: Vec<UserSeed>,
    /// Postgres connection string for the durable audit sink. When absent
    /// the service runs with the in-memory sink only.
    #[serde(default)]
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings for the generation orchestrator.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Candidate models, most preferred first.
    pub models: Vec<String>,
    /// Configured credentials, in rotation order. Keys are resolved from
    /// the named environment variables at startup.
    pub credentials: Vec<CredentialConfig>,
    /// Sampling temperature passed to the provider.
    pub temperature: f32,
    /// Base URL of the generative provider API.
    pub provider_base_url: String,
    /// Upper bound for a single provider attempt, in seconds.
    pub attempt_timeout_secs: u64,
    /// Minimum gap between two non-refinement generations from the same
    /// user, in seconds.
    pub debounce_secs: u64,
}

/// One configured credential: a human label plus the environment variable
/// holding the actual key.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialConfig {
    pub label: String,
    pub env: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    pub expiration_hours: u64,
}

/// A user seeded into the in-memory roster at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSeed {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    /// Initial password; teachers change it after first login.
    pub password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            models: vec![
                "gemini-2.5-flash".to_string(),
                "gemini-2.0-flash".to_string(),
                "gemini-1.5-flash".to_string(),
                "gemini-1.5-pro".to_string(),
                "gemini-2.0-flash-lite-preview-02-05".to_string(),
            ],
            credentials: vec![
                CredentialConfig {
                    label: "Laura".to_string(),
                    env: "API_KEY_1".to_string(),
                },
                CredentialConfig {
                    label: "México".to_string(),
                    env: "API_KEY_2".to_string(),
                },
                CredentialConfig {
                    label: "Yarelis".to_string(),
                    env: "API_KEY_3".to_string(),
                },
            ],
            temperature: 0.7,
            provider_base_url: "https://generativelanguage.googleapis.com".to_string(),
            attempt_timeout_secs: 45,
            debounce_secs: 8,
        }
    }
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
