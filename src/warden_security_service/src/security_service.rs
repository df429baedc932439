use axum::{
    Router,
    http::{
        HeaderName, HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE, InvalidHeaderName},
        request,
    },
    routing::{get, post},
};
use thiserror::Error;
use warden_adapters::{
    JwtSessionValidator, SignedCsrfTokenProvider,
    config::{API_ROOT, AllowedOrigins, SecurityServiceSettings},
};
use warden_axum::{
    CsrfGuard, SecurityLayers,
    routes::{LoginState, RegisterState, csrf_token, login, register},
};
use warden_core::{AuditLogger, Permission, SECURITY_RESOURCE, UserDirectory, UserError};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

#[derive(Debug, Error)]
pub enum SecurityServiceError {
    #[error("Invalid default role: {0}")]
    InvalidDefaultRole(#[from] UserError),

    #[error("Invalid CSRF header name: {0}")]
    InvalidCsrfHeader(#[from] InvalidHeaderName),
}

/// The security API: CSRF token, user registration and login routes
pub struct SecurityService {
    router: Router,
    csrf_header: HeaderName,
}

impl SecurityService {
    /// Create a SecurityService around a user directory and an audit logger
    ///
    /// # Arguments
    /// * `directory` - User directory shared by every route (must be Clone)
    /// * `audit_logger` - Receives one event per endpoint call (must be Clone)
    /// * `settings` - Session, CSRF and registration settings
    ///
    /// # Errors
    /// Fails when the configured default role is not a valid role name or
    /// the CSRF header name is not a valid header name
    ///
    /// # Note on Architecture
    /// Each route gets only the state it needs; the middleware chain is
    /// attached per route so unknown paths fall through to a plain 404.
    pub fn new<D, L>(
        directory: D,
        audit_logger: L,
        settings: &SecurityServiceSettings,
    ) -> Result<Self, SecurityServiceError>
    where
        D: UserDirectory + Clone + 'static,
        L: AuditLogger + Clone + 'static,
    {
        let default_role = settings.default_role()?;
        let csrf_header = HeaderName::try_from(settings.csrf.header_name.as_str())?;
        let session = settings.session_config();
        let provider = SignedCsrfTokenProvider::new(settings.csrf_config());

        let csrf_guard = settings
            .csrf
            .enforce
            .then(|| CsrfGuard::new(provider.clone(), settings.csrf.header_name.clone()));
        let layers = SecurityLayers::new(
            JwtSessionValidator::new(directory.clone(), session.clone()),
            csrf_guard,
            audit_logger,
        );

        // CSRF token needs the token provider
        let csrf_routes = layers
            .protect(
                Router::new().route("/csrf_token/", get(csrf_token::<SignedCsrfTokenProvider>)),
                Permission::read(SECURITY_RESOURCE),
                "SecurityApi.csrf_token",
            )
            .with_state(provider);

        // Register needs the directory and the default role
        let register_routes = layers
            .protect(
                Router::new().route("/register/", post(register::<D>)),
                Permission::post(SECURITY_RESOURCE),
                "SecurityApi.register_user",
            )
            .with_state(RegisterState {
                directory: directory.clone(),
                default_role,
            });

        // Login is open and only audited
        let login_routes = layers
            .audited(
                Router::new().route("/login/", post(login::<D>)),
                "SecurityApi.login",
            )
            .with_state(LoginState { directory, session });

        let api = Router::new()
            .merge(csrf_routes)
            .merge(register_routes)
            .merge(login_routes);

        Ok(Self {
            router: Router::new().nest(API_ROOT, api),
            csrf_header,
        })
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the SecurityService into a router that can be mounted on another router
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION, self.csrf_header.clone()])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the security service as a standalone server
    ///
    /// # Arguments
    /// * `listener` - TCP listener to bind the server to
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Security service listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
