//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CredentialConfig, GenerationConfig, JwtSettings, LogFormat, LoggingConfig,
    ServerConfig, UserSeed,
};
