pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    AllowedOrigins, BootstrapAdminSettings, CsrfSettings, DatabaseSettings, RegistrationSettings,
    SecurityServiceSettings, ServerSettings, SessionSettings,
};
