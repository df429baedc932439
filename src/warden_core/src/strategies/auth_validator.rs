use async_trait::async_trait;

/// Trait for validating session credentials in middleware.
///
/// Validators extract authentication information from HTTP requests,
/// verify tokens/sessions, and produce the identity protected routes run as.
///
/// # Implementation Note
///
/// The validator receives `RequestParts` (headers, method, URI, extensions) rather
/// than the full `Request` to avoid issues with non-`Sync` request bodies.
/// This is sufficient since validators only need headers to extract tokens.
#[async_trait]
pub trait AuthValidator: Clone + Send + Sync + 'static {
    /// The identity extracted from a valid session.
    ///
    /// This will be made available to protected route handlers via extensions.
    type Claims: Clone + Send + Sync + 'static;

    /// The request parts type this validator operates on.
    ///
    /// Typically `http::request::Parts` containing headers, method, URI, etc.
    type RequestParts;

    /// Errors that can occur during validation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Validate authentication from the request parts.
    ///
    /// This method:
    /// 1. Extracts the token from request parts (bearer header or session cookie)
    /// 2. Validates the token (signature, expiration)
    /// 3. Resolves the identity the route handler will see
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No session token is present
    /// - The token is invalid or expired
    /// - The account behind the token no longer exists or is inactive
    /// - Directory lookup fails
    async fn validate(&self, parts: &Self::RequestParts) -> Result<Self::Claims, Self::Error>;
}
