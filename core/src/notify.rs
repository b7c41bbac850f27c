//! User-facing notifications for store outcomes.

/// Receives one message per user-visible outcome.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Routes notifications into the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "recharge.notify", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "recharge.notify", "{}", message);
    }
}
