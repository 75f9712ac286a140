use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;
use tracing::debug;

use super::messages::{Notification, NotificationLevel};

pub type SubscriberId = u64;

#[derive(Default)]
struct HubInner {
    next_id: SubscriberId,
    subscribers: HashMap<SubscriberId, mpsc::UnboundedSender<Notification>>,
}

/// Publish/subscribe registry for notifications
///
/// Cloning the hub shares the same subscriber set.
#[derive(Clone, Default)]
pub struct NotificationHub {
    inner: Arc<Mutex<HubInner>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber; dropping the returned handle unregisters it
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();

        let id = {
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.subscribers.insert(id, tx);
            id
        };

        debug!("Notification subscriber {} registered", id);

        Subscription {
            id,
            rx,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Remove a subscriber; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.lock().subscribers.remove(&id).is_some();
        if removed {
            debug!("Notification subscriber {} unregistered", id);
        }
        removed
    }

    /// Deliver to every live subscriber; returns how many received it
    pub fn publish(&self, notification: Notification) -> usize {
        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|_, tx| tx.send(notification.clone()).is_ok());
        inner.subscribers.len()
    }

    pub fn notify(
        &self,
        session_id: Option<&str>,
        level: NotificationLevel,
        title: &str,
        message: impl Into<String>,
    ) -> usize {
        let mut notification = Notification::new(level, title, message);
        if let Some(session_id) = session_id {
            notification = notification.for_session(session_id);
        }
        self.publish(notification)
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        // A panic while holding the lock leaves the map consistent
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A registered listener
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::UnboundedReceiver<Notification>,
    hub: Weak<Mutex<HubInner>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next notification; `None` once unsubscribed
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.subscribers.remove(&self.id);
        }
    }
}
