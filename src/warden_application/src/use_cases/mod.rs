pub mod fetch_csrf_token;
pub mod login;
pub mod register_user;
