pub mod use_cases;

pub use use_cases::{
    fetch_csrf_token::FetchCsrfTokenUseCase,
    login::{LoginError, LoginUseCase},
    register_user::{RegisterUserCommand, RegisterUserError, RegisterUserUseCase, RoleSelection},
};
