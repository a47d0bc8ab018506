//! [`Config`]-related definitions.

use std::{str::FromStr as _, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::{domain::user, infra::directory};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Model artifact configuration.
    pub artifact: Artifact,

    /// Dataset configuration.
    pub dataset: Dataset,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [JWT] secret.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    #[default("secret".to_owned())]
    pub jwt_secret: String,

    /// Duration a created user session remains valid for.
    #[default(time::Duration::from_secs(30 * 60))]
    #[serde(with = "humantime_serde")]
    pub session_ttl: time::Duration,

    /// [`User`] accounts to provision the server with.
    ///
    /// [`User`]: service::domain::User
    #[default(vec![Account::default()])]
    pub accounts: Vec<Account>,
}

impl From<&Service> for service::Config {
    fn from(value: &Service) -> Self {
        Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                value.jwt_secret.as_bytes(),
            ),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                value.jwt_secret.as_bytes(),
            ),
            session_ttl: value.session_ttl,
        }
    }
}

/// Provisioned [`User`] account configuration.
///
/// [`User`]: service::domain::User
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Account {
    /// Email of the account.
    #[default("demo@example.com".to_owned())]
    pub email: String,

    /// Name of the account.
    #[default("Demo".to_owned())]
    pub name: String,

    /// Password of the account.
    #[default("demo-password".to_owned())]
    pub password: String,

    /// Role of the account.
    #[default("BUYER".to_owned())]
    pub role: String,
}

impl TryFrom<Account> for directory::Seed {
    type Error = ConfigError;

    fn try_from(value: Account) -> Result<Self, Self::Error> {
        let Account {
            email,
            name,
            password,
            role,
        } = value;

        let email = user::Email::new(email.as_str()).ok_or_else(|| {
            ConfigError::Message(format!("invalid account email: {email}"))
        })?;
        let name = user::Name::new(name).ok_or_else(|| {
            ConfigError::Message("invalid account name".to_owned())
        })?;
        let password = user::Password::new(password).ok_or_else(|| {
            ConfigError::Message("invalid account password".to_owned())
        })?;
        let role = user::Role::from_str(&role).map_err(|e| {
            ConfigError::Message(format!("invalid account role: {e}"))
        })?;

        Ok(Self {
            email,
            name,
            password: secrecy::SecretBox::init_with(move || password),
            role,
        })
    }
}

/// Model artifact configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Artifact {
    /// Path to the trained model artifact.
    #[default("artifact.json".to_owned())]
    pub path: String,
}

/// Dataset configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Dataset {
    /// Path to the properties dataset.
    #[default("dataset.csv".to_owned())]
    pub path: String,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
