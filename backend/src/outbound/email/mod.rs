//! Outbound mail adapter.

mod tracing_mailer;

pub use tracing_mailer::TracingMailer;
