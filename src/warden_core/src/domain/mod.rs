pub mod audit;
pub mod caller;
pub mod csrf_token;
pub mod email;
pub mod password;
pub mod role;
pub mod session;
pub mod user;
pub mod username;
