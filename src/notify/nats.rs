use anyhow::{Context, Result};
use async_nats::Client;
use futures::stream::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::hub::Subscription;
use super::messages::Notification;

/// Mirrors hub notifications onto `interview.notify.<session_id>`
pub struct NatsForwarder {
    client: Client,
}

impl NatsForwarder {
    /// Connect to NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }

    pub async fn publish(&self, notification: &Notification) -> Result<()> {
        let subject = notification.subject();
        let payload = serde_json::to_vec(notification)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish notification")?;

        info!("Forwarded {:?} notification to {}", notification.level, subject);

        Ok(())
    }

    /// Forward everything the subscription receives until it is closed
    pub fn spawn(self, mut subscription: Subscription) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Notification forwarder started");

            while let Some(notification) = subscription.recv().await {
                if let Err(e) = self.publish(&notification).await {
                    error!("Failed to forward notification: {}", e);
                }
            }

            info!("Notification forwarder stopped");
        })
    }

    /// Notifications for one session (or all sessions when `None`)
    pub async fn subscribe(
        &self,
        session_id: Option<&str>,
    ) -> Result<impl Stream<Item = Notification>> {
        let subject = match session_id {
            Some(id) => format!("interview.notify.{}", id),
            None => "interview.notify.>".to_string(),
        };

        info!("Subscribing to notifications on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject)
            .await
            .context("Failed to subscribe to notifications")?;

        Ok(subscriber.filter_map(|msg| async move {
            match serde_json::from_slice::<Notification>(&msg.payload) {
                Ok(notification) => Some(notification),
                Err(e) => {
                    warn!("Failed to parse notification message: {}", e);
                    None
                }
            }
        }))
    }
}
