// In memory implementation of the NotificationSource port.
//
// Purpose
// - Drive the dispatcher in tests and local runs without a database.
//
// Responsibilities
// - Track which targets are connected. Listening requires a connected target.
// - Fan each notified payload out to every listener on the channel.
// - Dropping a target's connection closes its listeners, which invalidates their handles.

use crate::shared::infrastructure::notification_source::{
    NotificationSource, NotificationSourceError, Subscription, SubscriptionHandle,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, mpsc};

struct Listener {
    target: String,
    channel: String,
    sender: mpsc::UnboundedSender<String>,
}

#[derive(Default)]
pub struct InMemoryNotificationSource {
    connected: Mutex<HashSet<String>>,
    listeners: Mutex<Vec<Listener>>,
    next_handle: AtomicU64,
    is_offline: bool,
}

impl InMemoryNotificationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn connect(&self, target: &str) {
        self.connected.lock().await.insert(target.to_string());
    }

    pub async fn disconnect(&self, target: &str) {
        self.connected.lock().await.remove(target);
        self.listeners
            .lock()
            .await
            .retain(|listener| listener.target != target);
    }

    /// Delivers `payload` to every live listener on `channel` and returns how many received it.
    pub async fn notify(&self, channel: &str, payload: &str) -> usize {
        let mut listeners = self.listeners.lock().await;
        listeners.retain(|listener| !listener.sender.is_closed());
        listeners
            .iter()
            .filter(|listener| listener.channel == channel)
            .filter(|listener| listener.sender.send(payload.to_string()).is_ok())
            .count()
    }

    /// Listeners whose receiving side is still open.
    pub async fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .await
            .iter()
            .filter(|listener| !listener.sender.is_closed())
            .count()
    }
}

#[async_trait::async_trait]
impl NotificationSource for InMemoryNotificationSource {
    async fn listen(
        &self,
        target: &str,
        channel: &str,
    ) -> Result<Subscription, NotificationSourceError> {
        if self.is_offline {
            return Err(NotificationSourceError::Backend(
                "Notification source offline".into(),
            ));
        }
        if !self.connected.lock().await.contains(target) {
            return Err(NotificationSourceError::NotConnected(target.to_string()));
        }

        let (sender, payloads) = mpsc::unbounded_channel();
        self.listeners.lock().await.push(Listener {
            target: target.to_string(),
            channel: channel.to_string(),
            sender,
        });
        let handle = SubscriptionHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        Ok(Subscription {
            handle,
            channel: channel.to_string(),
            payloads,
        })
    }
}
