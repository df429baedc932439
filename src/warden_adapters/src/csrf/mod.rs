pub mod signed_csrf_provider;

pub use signed_csrf_provider::{CsrfConfig, SignedCsrfTokenProvider};
