//! User-visible confirmations.

/// Receives short status messages meant for the user.
pub trait Notifier: Send + Sync {
    /// Shows a message.
    fn notify(&self, message: &str);
}

/// Emits messages as `info` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(target: "fenceline::notify", "{message}");
    }
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        self(message);
    }
}
