pub mod jwt_session;

pub use jwt_session::{
    JwtSessionConfig, JwtSessionValidator, SessionClaims, SessionError, create_session_cookie,
    extract_token, generate_session_token, validate_session_token,
};
