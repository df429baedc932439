//! Framework-agnostic HTTP traits for the security endpoints.
//!
//! The handlers in `warden_adapters` are written against these traits; web
//! frameworks implement them on newtype wrappers of their own request and
//! response types.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  warden_core: Defines HTTP traits        │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  warden_axum: Newtype wrappers           │
//! │  struct AxumRequest { parts, body }      │
//! │  impl ApiRequest for AxumRequest { }     │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  Handlers use ApiRequest trait methods   │
//! │  (generic over framework)                │
//! └──────────────────────────────────────────┘
//! ```

/// Trait for HTTP requests consumed by the security handlers.
///
/// # Implementation Notes
///
/// - Return `&str` / `&[u8]` references directly from the framework's data structures
/// - Case-insensitive header lookup should be handled by implementor
pub trait ApiRequest {
    /// Get a header value by name.
    ///
    /// Header lookup should be case-insensitive (RFC 9110).
    /// Returns `None` if the header doesn't exist or isn't valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;

    /// Get a cookie value by name.
    fn cookie(&self, name: &str) -> Option<&str>;

    /// Get the HTTP method (GET, POST, etc.)
    fn method(&self) -> &str;

    /// Get the request path
    fn path(&self) -> &str;

    /// The raw request body.
    fn body(&self) -> &[u8];

    /// Whether the body is declared as JSON.
    ///
    /// True for the `application/json` mimetype and for any
    /// `application/<subtype>+json`; parameters such as `charset` are ignored.
    fn is_json(&self) -> bool {
        let Some(content_type) = self.header("content-type") else {
            return false;
        };
        let mimetype = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        mimetype == "application/json"
            || (mimetype.starts_with("application/") && mimetype.ends_with("+json"))
    }
}

/// Trait for building HTTP responses.
///
/// # Design
///
/// This follows the builder pattern, allowing method chaining:
/// ```ignore
/// builder
///     .status(200)
///     .header("cache-control", "no-store")
///     .json_body(json!({"result": token}))
///     .build()
/// ```
pub trait ApiResponseBuilder: Sized {
    /// The final response type produced by this builder
    type Response;

    /// Set the HTTP status code
    fn status(self, code: u16) -> Self;

    /// Add an HTTP header
    fn header(self, name: &str, value: &str) -> Self;

    /// Add a Set-Cookie header
    ///
    /// The cookie_value should be a complete cookie string like:
    /// `"session=token; HttpOnly; Secure; SameSite=Lax; Path=/"`
    fn cookie(self, cookie_value: &str) -> Self {
        self.header("set-cookie", cookie_value)
    }

    /// Set a JSON body with Content-Type header
    fn json_body(self, body: serde_json::Value) -> Self;

    /// Build the final response
    fn build(self) -> Self::Response;
}

/// Helper methods for the response shapes the API uses.
pub trait ApiResponseHelpers: ApiResponseBuilder {
    /// Create a 200 OK JSON response
    fn ok_json(self, body: serde_json::Value) -> Self::Response {
        self.status(200).json_body(body).build()
    }
}

// Blanket implementation for all ApiResponseBuilder types
impl<T: ApiResponseBuilder> ApiResponseHelpers for T {}
