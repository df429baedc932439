pub mod error;

pub use error::{
    ApiError, ErrorResponse, FORBIDDEN, INVALID_LOGIN, NOT_AUTHORIZED, NOT_JSON, UNDECODABLE_JSON,
};
