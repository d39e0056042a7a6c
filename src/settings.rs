//! Handles the application settings via a config file and environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Contains the application settings.
///
/// The application settings are set with an optional TOML config file.
/// Settings specified in the config file can be overwritten by environment
/// variables with the prefix `PARTY_PLANNER_` followed by the field names,
/// separated by an underscore `_`.
///
/// Two bare environment variables are honored on top of that:
///
/// * `DATABASE_URL` (required) - connection URL for the postgres database.
///   Loading the settings fails when it is set neither in the environment
///   nor in the config file.
/// * `JWT_SECRET_KEY` (optional) - signing key for issued access tokens.
///   Falls back to an insecure built-in default when unset.
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: Database,
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub jwt: Jwt,
}

impl Settings {
    /// Creates a new Settings instance from the provided TOML file and the
    /// environment (See struct level docs for more details).
    pub fn load(file_name: &str) -> Result<Self, ConfigError> {
        let mut cfg = Config::new();

        cfg.merge(File::with_name(file_name).required(false))?;

        let env = Environment::with_prefix("PARTY_PLANNER").separator("_");

        cfg.merge(env)?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            cfg.set("database.url", url)?;
        }

        if let Ok(secret) = std::env::var("JWT_SECRET_KEY") {
            cfg.set("jwt.secret", secret)?;
        }

        cfg.try_into()
    }
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub url: String,
    #[serde(rename = "maxconnections", default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub cors: Cors,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            cors: Cors::default(),
        }
    }
}

/// Settings for CORS (Cross Origin Resource Sharing)
///
/// An empty `allowed_origin` list allows any origin.
#[derive(Default, Clone, Debug, Deserialize)]
pub struct Cors {
    #[serde(default)]
    pub allowed_origin: Vec<String>,
}

/// Settings for the access token signing key
#[derive(Debug, Deserialize)]
pub struct Jwt {
    #[serde(default = "default_jwt_secret")]
    pub secret: String,
}

impl Default for Jwt {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_http_port() -> u16 {
    8000
}

fn default_jwt_secret() -> String {
    "temporary_secret".to_string()
}
