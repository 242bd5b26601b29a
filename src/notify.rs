// Contract with the transient-notification (toast) subsystem. The forms
// report every terminal outcome here; nothing in this core renders anything.

pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

// Default sink that routes notifications to the log stream. Useful for
// headless runs and as a stand-in until a real toast layer is wired up.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!("notification: {}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!("notification: {}", message);
    }
}
