pub mod env {
    pub const ENV_PREFIX: &str = "WARDEN";
    pub const ENV_SEPARATOR: &str = "__";
    pub const SESSION_SECRET_ENV_VAR: &str = "WARDEN__SESSION__SECRET";
    pub const CSRF_SECRET_ENV_VAR: &str = "WARDEN__CSRF__SECRET";
    pub const DATABASE_URL_ENV_VAR: &str = "WARDEN__DATABASE__URL";
}

pub const SETTINGS_FILE: &str = "config/settings";
pub const API_ROOT: &str = "/api/v1/security";

pub mod defaults {
    pub const SESSION_COOKIE_NAME: &str = "session";
    pub const SESSION_TTL_SECONDS: i64 = 60 * 60 * 24;
    pub const CSRF_TTL_SECONDS: i64 = 3600;
    pub const CSRF_HEADER_NAME: &str = "X-CSRFToken";
}

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:8088";
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
}
