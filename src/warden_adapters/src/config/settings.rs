use axum::http::HeaderValue;
use config::{
    Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, builder::DefaultState,
};
use secrecy::Secret;
use serde::Deserialize;
use warden_core::{DEFAULT_ROLE, RoleName, UserError};

use super::constants::{SETTINGS_FILE, defaults, env, prod};
use crate::{csrf::CsrfConfig, session::JwtSessionConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityServiceSettings {
    pub server: ServerSettings,
    pub session: SessionSettings,
    pub csrf: CsrfSettings,
    pub registration: RegistrationSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub allowed_origins: Option<AllowedOrigins>,
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub secret: Secret<String>,
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsrfSettings {
    pub secret: Secret<String>,
    pub ttl_seconds: i64,
    pub header_name: String,
    pub enforce: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationSettings {
    pub default_role: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<Secret<String>>,
}

/// Account created at start-up when no user of that name exists yet.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdminSettings {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Secret<String>,
}

/// Origins allowed to make credentialed cross-origin requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new(origins: Vec<String>) -> Self {
        Self(origins)
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        origin
            .to_str()
            .map(|origin| self.0.iter().any(|allowed| allowed == origin))
            .unwrap_or(false)
    }
}

impl SecurityServiceSettings {
    /// Load settings from defaults, `config/settings.json` and `WARDEN__*`
    /// environment variables, later sources overriding earlier ones.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::with_defaults()?
            .add_source(File::new(SETTINGS_FILE, FileFormat::Json).required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    pub fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.address", prod::APP_ADDRESS)?
            .set_default("session.cookie_name", defaults::SESSION_COOKIE_NAME)?
            .set_default("session.ttl_seconds", defaults::SESSION_TTL_SECONDS)?
            .set_default("csrf.ttl_seconds", defaults::CSRF_TTL_SECONDS)?
            .set_default("csrf.header_name", defaults::CSRF_HEADER_NAME)?
            .set_default("csrf.enforce", false)?
            .set_default("registration.default_role", DEFAULT_ROLE)
    }

    pub fn environment() -> Environment {
        Environment::with_prefix(env::ENV_PREFIX)
            .prefix_separator(env::ENV_SEPARATOR)
            .separator(env::ENV_SEPARATOR)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("allowed_origins")
    }

    pub fn session_config(&self) -> JwtSessionConfig {
        JwtSessionConfig {
            cookie_name: self.session.cookie_name.clone(),
            secret: self.session.secret.clone(),
            ttl_in_seconds: self.session.ttl_seconds,
        }
    }

    pub fn csrf_config(&self) -> CsrfConfig {
        CsrfConfig {
            secret: self.csrf.secret.clone(),
            ttl_in_seconds: self.csrf.ttl_seconds,
        }
    }

    pub fn default_role(&self) -> Result<RoleName, UserError> {
        RoleName::parse(self.registration.default_role.clone())
    }
}
