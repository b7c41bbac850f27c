use recharge_core::api::Notifier;

/// Prints outcome messages to stderr so they stay out of piped output.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        tracing::debug!(target: "recharge.notify", "{}", message);
        eprintln!("✓ {message}");
    }

    fn error(&self, message: &str) {
        tracing::debug!(target: "recharge.notify", "{}", message);
        eprintln!("✗ {message}");
    }
}
