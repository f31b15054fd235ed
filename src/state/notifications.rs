use std::time::{Duration, Instant};

/// Default lifetime of a notification
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Transient notification with expiry
#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

/// Single-slot notification area; a new notification replaces the current one
#[derive(Debug)]
pub struct Notifier {
    current: Option<Notification>,
    duration: Duration,
}

impl Notifier {
    pub fn new(duration: Duration) -> Self {
        Self { current: None, duration }
    }

    pub fn notify(&mut self, text: impl Into<String>, kind: NotificationKind) {
        self.current = Some(Notification {
            text: text.into(),
            kind,
            expires_at: Instant::now() + self.duration,
        });
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drop the notification if it has expired; returns true when one was removed
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self.current.as_ref().map(|n| now >= n.expires_at).unwrap_or(false);
        if expired {
            self.current = None;
        }
        expired
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_replaces_previous() {
        let mut notifier = Notifier::default();
        notifier.notify("first", NotificationKind::Info);
        notifier.notify("second", NotificationKind::Error);

        let current = notifier.current().unwrap();
        assert_eq!(current.text, "second");
        assert_eq!(current.kind, NotificationKind::Error);
    }

    #[test]
    fn test_expire_clears_expired() {
        let mut notifier = Notifier::new(Duration::ZERO);
        notifier.notify("gone", NotificationKind::Success);

        assert!(notifier.expire(Instant::now() + Duration::from_millis(1)));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn test_expire_keeps_active() {
        let mut notifier = Notifier::new(Duration::from_secs(10));
        notifier.notify("active", NotificationKind::Success);

        assert!(!notifier.expire(Instant::now()));
        assert_eq!(notifier.current().unwrap().text, "active");
    }

    #[test]
    fn test_expire_without_notification() {
        let mut notifier = Notifier::default();
        assert!(!notifier.expire(Instant::now()));
    }

    #[test]
    fn test_dismiss() {
        let mut notifier = Notifier::default();
        notifier.notify("bye", NotificationKind::Warning);
        notifier.dismiss();
        assert!(notifier.current().is_none());
    }
}
