//! Middleware guarding the security routes.
//!
//! Layered per route, outermost first: audit, panic catcher, authenticate,
//! CSRF protection (when enforced), permission gate, handler.

use std::{any::Any, time::Instant};

use axum::{
    Router,
    extract::{OriginalUri, Request, State},
    http::{Method, request::Parts},
    middleware::{Next, from_fn_with_state},
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;
use warden_adapters::{
    ApiError,
    http::{FORBIDDEN, NOT_AUTHORIZED},
};
use warden_core::{
    AuditEvent, AuditLogger, AuthValidator, Caller, CsrfTokenProvider, Permission, Username,
};

/// Resolves the caller and stores it in the request extensions.
///
/// On success the caller's username is also copied to the response
/// extensions so the audit layer can record who made the call.
pub async fn authenticate<V>(
    State(validator): State<V>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    V: AuthValidator<Claims = Caller, RequestParts = Parts>,
    ApiError: From<V::Error>,
{
    let (mut parts, body) = req.into_parts();
    let caller = validator.validate(&parts).await?;
    let username = caller.username().clone();

    parts.extensions.insert(caller);
    let mut response = next.run(Request::from_parts(parts, body)).await;
    response.extensions_mut().insert(username);

    Ok(response)
}

/// Answers 403 unless one of the caller's roles grants `permission`.
pub async fn require_permission(
    State(permission): State<Permission>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = req
        .extensions()
        .get::<Caller>()
        .ok_or_else(|| ApiError::Unauthorized(NOT_AUTHORIZED.to_string()))?;

    if !caller.has_permission(&permission) {
        tracing::warn!(
            username = %caller.username(),
            required_permission = %permission,
            "Permission denied"
        );
        return Err(ApiError::Forbidden(FORBIDDEN.to_string()));
    }

    Ok(next.run(req).await)
}

/// CSRF provider plus the header the token is read from.
#[derive(Clone)]
pub struct CsrfGuard<P> {
    provider: P,
    header_name: String,
}

impl<P> CsrfGuard<P> {
    pub fn new(provider: P, header_name: impl Into<String>) -> Self {
        Self {
            provider,
            header_name: header_name.into(),
        }
    }
}

fn is_state_changing(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}

/// Checks the CSRF token of state-changing requests against the caller's session.
pub async fn csrf_protect<P>(
    State(guard): State<CsrfGuard<P>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    P: CsrfTokenProvider + Clone + 'static,
{
    if is_state_changing(req.method()) {
        let caller = req
            .extensions()
            .get::<Caller>()
            .ok_or_else(|| ApiError::Unauthorized(NOT_AUTHORIZED.to_string()))?;
        let token = req
            .headers()
            .get(guard.header_name.as_str())
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        guard.provider.validate(caller.session_id(), token)?;
    }

    Ok(next.run(req).await)
}

/// Audit logger plus the action name recorded for a route.
#[derive(Clone)]
pub struct AuditState<L> {
    logger: L,
    action: &'static str,
}

impl<L> AuditState<L> {
    pub fn new(logger: L, action: &'static str) -> Self {
        Self { logger, action }
    }
}

/// Records one audit event per call, whatever the outcome.
pub async fn audit<L>(State(state): State<AuditState<L>>, req: Request, next: Next) -> Response
where
    L: AuditLogger + Clone + 'static,
{
    let started = Instant::now();
    let method = req.method().to_string();
    // Nested routers see a stripped URI
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| req.uri().path(), |uri| uri.path())
        .to_owned();

    let response = next.run(req).await;

    let event = AuditEvent {
        action: state.action,
        username: response
            .extensions()
            .get::<Username>()
            .map(|username| username.as_str().to_owned()),
        method,
        path,
        status: response.status().as_u16(),
        duration: started.elapsed(),
    };
    state.logger.log(event).await;

    response
}

/// Turns a handler panic into the generic 500 body.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    ApiError::Internal(format!("Handler panicked: {detail}")).into_response()
}

/// The collaborators every protected route is layered with.
#[derive(Clone)]
pub struct SecurityLayers<V, P, L> {
    validator: V,
    csrf: Option<CsrfGuard<P>>,
    audit_logger: L,
}

impl<V, P, L> SecurityLayers<V, P, L>
where
    V: AuthValidator<Claims = Caller, RequestParts = Parts>,
    ApiError: From<V::Error>,
    P: CsrfTokenProvider + Clone + 'static,
    L: AuditLogger + Clone + 'static,
{
    pub fn new(validator: V, csrf: Option<CsrfGuard<P>>, audit_logger: L) -> Self {
        Self {
            validator,
            csrf,
            audit_logger,
        }
    }

    /// Audit, authenticate, CSRF when enforced, then require `permission`.
    pub fn protect<S>(
        &self,
        router: Router<S>,
        permission: Permission,
        action: &'static str,
    ) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let mut router = router.route_layer(from_fn_with_state(permission, require_permission));

        if let Some(guard) = &self.csrf {
            router = router.route_layer(from_fn_with_state(guard.clone(), csrf_protect::<P>));
        }

        let router = router.route_layer(from_fn_with_state(
            self.validator.clone(),
            authenticate::<V>,
        ));
        self.audited(router, action)
    }

    /// Audit only, for routes open to anonymous callers.
    ///
    /// Panics below the audit layer become a 500 that is still audited.
    pub fn audited<S>(&self, router: Router<S>, action: &'static str) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router
            .route_layer(CatchPanicLayer::custom(handle_panic))
            .route_layer(from_fn_with_state(
                AuditState::new(self.audit_logger.clone(), action),
                audit::<L>,
            ))
    }
}
