//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `delivery` - OTP delivery channels (SMTP, HTTP SMS provider, deep links)
//! - `environment` - Environment detection and logging configuration
//! - `otp` - Verification session lifetime and attempt limits
//! - `server` - HTTP server configuration
//!
//! Values are layered: built-in defaults for the detected environment, then an
//! optional `config.<environment>.toml` file, then `TRINCK__*` environment
//! variables (double underscore separates nesting levels, e.g.
//! `TRINCK__SERVER__PORT=9090`).

pub mod delivery;
pub mod environment;
pub mod otp;
pub mod server;

use serde::{Deserialize, Serialize};

pub use delivery::{
    DeepLinkConfig, DeliveryConfig, HttpSmsConfig, RegisteredContactConfig, SmtpConfig,
};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{OtpConfig, MAX_EXPIRATION_MINUTES};
pub use server::ServerConfig;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "TRINCK";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Verification session configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Delivery channel configuration
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Built-in defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        let server = match environment {
            Environment::Development => ServerConfig::new("127.0.0.1", 8080),
            Environment::Staging | Environment::Production => ServerConfig::new("0.0.0.0", 8080),
        };

        Self {
            environment,
            server,
            otp: OtpConfig::default(),
            delivery: DeliveryConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration from defaults, the environment's config file and
    /// `TRINCK__*` variables.
    ///
    /// A `.env` file is read first if present.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        Self::load_layered(environment, Some(environment.config_file()))
    }

    /// Load configuration for an explicit environment and optional file.
    pub fn load_layered(
        environment: Environment,
        file: Option<&str>,
    ) -> Result<Self, config::ConfigError> {
        let defaults = Self::for_environment(environment);

        let mut builder = config::Config::builder().add_source(config::Config::try_from(&defaults)?);

        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()
            .and_then(|config| {
                config.otp.validate().map_err(config::ConfigError::Message)?;
                Ok(config)
            })
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
