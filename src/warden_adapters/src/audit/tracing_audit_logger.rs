use async_trait::async_trait;
use warden_core::{AuditEvent, AuditLogger};

/// Writes audit events to the `audit` tracing target.
#[derive(Debug, Default, Clone)]
pub struct TracingAuditLogger;

impl TracingAuditLogger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditLogger for TracingAuditLogger {
    async fn log(&self, event: AuditEvent) {
        tracing::info!(
            target: "audit",
            action = event.action,
            username = event.username.as_deref().unwrap_or("anonymous"),
            method = %event.method,
            path = %event.path,
            status = event.status,
            duration_ms = event.duration.as_millis() as u64,
            "{}",
            event.action
        );
    }
}
