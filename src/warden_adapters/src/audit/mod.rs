pub mod tracing_audit_logger;

pub use tracing_audit_logger::TracingAuditLogger;
