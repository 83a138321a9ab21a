use tracing::{info, warn};

/// How loudly a notification should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Destructive,
}

/// A transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: &str, description: &str, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity,
        }
    }

    pub fn saved() -> Self {
        Self::new(
            "Saved!",
            "Your journal was saved and analyzed",
            Severity::Normal,
        )
    }

    pub fn partially_saved() -> Self {
        Self::new(
            "Partially Saved",
            "Saved your journal but couldn't analyze it",
            Severity::Destructive,
        )
    }

    pub fn save_failed() -> Self {
        Self::new(
            "Error",
            "Couldn't save your journal. Try again?",
            Severity::Destructive,
        )
    }
}

/// Somewhere notifications can be shown. Fire and forget.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Collects notifications in call order
impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Notifier for headless runs: prints to stdout and mirrors to the log
#[derive(Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Normal => info!("{}: {}", notification.title, notification.description),
            Severity::Destructive => warn!("{}: {}", notification.title, notification.description),
        }
        println!("{} - {}", notification.title, notification.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_messages() {
        assert_eq!(Notification::saved().severity, Severity::Normal);
        assert_eq!(Notification::partially_saved().title, "Partially Saved");
        assert_eq!(
            Notification::partially_saved().severity,
            Severity::Destructive
        );

        let failed = Notification::save_failed();
        assert_eq!(failed.title, "Error");
        assert_eq!(failed.description, "Couldn't save your journal. Try again?");
        assert_eq!(failed.severity, Severity::Destructive);
    }

    #[test]
    fn vec_notifier_keeps_call_order() {
        let mut seen: Vec<Notification> = Vec::new();
        seen.notify(Notification::saved());
        seen.notify(Notification::save_failed());
        assert_eq!(seen[0].title, "Saved!");
        assert_eq!(seen[1].title, "Error");
    }
}
