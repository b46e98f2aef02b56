//! Notifier port: user-facing toasts.

use homeserver_domain::notification::Notification;

/// Delivers notifications to whatever front end is attached.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<T: Notifier> Notifier for std::sync::Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}
