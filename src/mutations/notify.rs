use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Info,
}

/// A transient, non-blocking toast surfaced to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}

/// Sink for user-visible notifications. The UI shell renders these as
/// toasts; headless embeddings can log them.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Fallback notifier that writes toasts to the log.
#[derive(Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => log::warn!("toast: {}", notification.message),
            NotificationKind::Info => log::info!("toast: {}", notification.message),
        }
    }
}
