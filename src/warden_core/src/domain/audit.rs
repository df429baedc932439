use std::time::Duration;

/// One audited call of a security endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub action: &'static str,
    pub username: Option<String>,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration: Duration,
}
