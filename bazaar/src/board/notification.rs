//! Transient notification overlay.

/// Outcome class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A user-visible message about the most recent action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NotificationKind::Error,
        }
    }
}

/// Holds at most one pending notification; raising replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSlot {
    pending: Option<Notification>,
}

impl NotificationSlot {
    pub fn raise(&mut self, notification: Notification) {
        self.pending = Some(notification);
    }

    pub fn dismiss(&mut self) {
        self.pending = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.pending.as_ref()
    }
}
