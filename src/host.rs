//! Collaborators the editor calls out to: notifications and confirmations.
//!
//! The editor never talks to global UI state; the host passes these in.

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A fire-and-forget message for the toast layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, "Success", message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, "Error", message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, "Info", message)
    }
}

/// Receives notifications. Must not block.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Sink that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => {
                log::warn!("{}: {}", notification.title, notification.message)
            }
            _ => log::info!("{}: {}", notification.title, notification.message),
        }
    }
}

/// Sink that queues notifications until the host drains them.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    pending: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queued notifications, oldest first.
    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    /// Take all queued notifications.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    /// Number of queued notifications at the given level.
    pub fn count(&self, level: NotificationLevel) -> usize {
        self.pending.iter().filter(|n| n.level == level).count()
    }
}

impl NotificationSink for NotificationQueue {
    fn notify(&mut self, notification: Notification) {
        self.pending.push(notification);
    }
}

/// Yes/no prompt shown before irreversible actions.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Prompt that always gives the same answer (headless hosts, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmPrompt for FixedAnswer {
    fn confirm(&mut self, message: &str) -> bool {
        log::debug!("Confirm '{}' -> {}", message, self.0);
        self.0
    }
}

impl<F: FnMut(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = NotificationQueue::new();
        queue.notify(Notification::success("a"));
        queue.notify(Notification::error("b"));

        assert_eq!(queue.count(NotificationLevel::Error), 1);
        let drained = queue.drain();
        assert_eq!(drained[0].message, "a");
        assert_eq!(drained[1].title, "Error");
        assert!(queue.pending().is_empty());
    }

    #[test]
    fn test_closure_prompt() {
        let mut asked = Vec::new();
        let mut prompt = |message: &str| {
            asked.push(message.to_string());
            false
        };
        assert!(!prompt.confirm("Delete?"));
        assert_eq!(asked, ["Delete?"]);
    }
}
