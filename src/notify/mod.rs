pub mod models;
pub mod platform;
pub use models::*;
pub use platform::*;

use std::sync::Arc;

use anyhow::{Error, Result, anyhow, bail};

use crate::citycare::{CityCareApi, SubscribePushRequest, UnsubscribePushRequest};

/// Push notification subscription for a single device registration.
///
/// Subscribing and unsubscribing touch two places, the local push
/// manager and the CityCare server, and each method tries to leave
/// both agreeing with each other when something goes wrong halfway.
/// None of the methods here fail, they report what happened through
/// the returned outcome and log the details.
pub struct PushNotifications {
    permission: Arc<dyn NotificationPermission>,
    push_manager: Arc<dyn PushManager>,
    api: Arc<dyn CityCareApi>,
    vapid_public_key: Option<String>,
}

impl PushNotifications {
    pub fn new(
        permission: Arc<dyn NotificationPermission>,
        push_manager: Arc<dyn PushManager>,
        api: Arc<dyn CityCareApi>,
        vapid_public_key: Option<&str>,
    ) -> Self {
        Self {
            permission,
            push_manager,
            api,
            vapid_public_key: vapid_public_key.map(|k| k.to_string()),
        }
    }

    pub fn is_notification_available(&self) -> bool {
        self.permission.is_available()
    }

    pub fn is_notification_granted(&self) -> bool {
        self.permission.permission() == PermissionState::Granted
    }

    pub async fn request_notification_permission(&self) -> PermissionOutcome {
        if !self.is_notification_available() {
            tracing::error!("Notification API unsupported");
            return PermissionOutcome::Unsupported;
        }

        if self.is_notification_granted() {
            return PermissionOutcome::Granted;
        }

        let status = match self.permission.request_permission().await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("request_notification_permission: error: {}", e);
                PermissionState::Default
            }
        };

        match status {
            PermissionState::Granted => PermissionOutcome::Granted,
            PermissionState::Denied => PermissionOutcome::Denied,
            PermissionState::Default => PermissionOutcome::Dismissed,
        }
    }

    pub async fn get_push_subscription(&self) -> Result<Option<Box<dyn PushSubscription>>, Error> {
        self.push_manager.get_subscription().await
    }

    pub async fn is_current_push_subscription_available(&self) -> Result<bool, Error> {
        Ok(self.get_push_subscription().await?.is_some())
    }

    pub fn generate_subscribe_options(&self) -> Result<SubscribeOptions, Error> {
        let key = self
            .vapid_public_key
            .as_deref()
            .ok_or_else(|| anyhow!("Missing VAPID public key"))?;
        SubscribeOptions::new(key)
    }

    pub async fn subscribe(&self) -> PushOutcome {
        let permission = self.request_notification_permission().await;
        if !permission.is_granted() {
            return PushOutcome::Permission(permission);
        }

        match self.is_current_push_subscription_available().await {
            Ok(true) => return PushOutcome::AlreadySubscribed,
            Ok(false) => {}
            Err(e) => {
                tracing::error!("subscribe: error: {}", e);
                return PushOutcome::SubscribeFailed;
            }
        }

        tracing::info!("Subscribing to push notifications");

        let subscription = match self.create_subscription().await {
            Ok(subscription) => subscription,
            Err(e) => {
                tracing::error!("subscribe: error: {}", e);
                return PushOutcome::SubscribeFailed;
            }
        };

        if let Err(e) = self.register_with_server(subscription.as_ref()).await {
            tracing::error!("subscribe: error: {}", e);
            rollback(subscription.as_ref()).await;
            return PushOutcome::SubscribeFailed;
        }

        PushOutcome::Subscribed
    }

    pub async fn unsubscribe(&self) -> PushOutcome {
        match self.try_unsubscribe().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("unsubscribe: error: {}", e);
                PushOutcome::UnsubscribeFailed
            }
        }
    }

    async fn create_subscription(&self) -> Result<Box<dyn PushSubscription>, Error> {
        let options = self.generate_subscribe_options()?;
        self.push_manager.subscribe(&options).await
    }

    async fn register_with_server(&self, subscription: &dyn PushSubscription) -> Result<(), Error> {
        let request = SubscribePushRequest::from(subscription.to_json());
        let resp = self.api.subscribe_push_notification(&request).await?;
        if !resp.ok {
            bail!("Server rejected push subscription: {}", resp.message);
        }
        tracing::debug!("Registered push subscription {}", request.endpoint);
        Ok(())
    }

    async fn try_unsubscribe(&self) -> Result<PushOutcome, Error> {
        let Some(subscription) = self.get_push_subscription().await? else {
            return Ok(PushOutcome::NotSubscribed);
        };

        let json = subscription.to_json();
        let resp = self
            .api
            .unsubscribe_push_notification(&UnsubscribePushRequest {
                endpoint: json.endpoint.clone(),
            })
            .await?;

        if !resp.ok {
            tracing::error!("unsubscribe: response: {}", resp.message);
            return Ok(PushOutcome::UnsubscribeFailed);
        }

        let unsubscribed = match subscription.unsubscribe().await {
            Ok(unsubscribed) => unsubscribed,
            Err(e) => {
                tracing::error!("unsubscribe: local unsubscribe error: {}", e);
                false
            }
        };

        if !unsubscribed {
            // The server already forgot this device but the push
            // manager still holds the subscription. Put it back.
            self.reregister(json).await;
            return Ok(PushOutcome::UnsubscribeFailed);
        }

        Ok(PushOutcome::Unsubscribed)
    }

    async fn reregister(&self, json: PushSubscriptionJson) {
        let request = SubscribePushRequest::from(json);
        match self.api.subscribe_push_notification(&request).await {
            Ok(resp) if resp.ok => {
                tracing::info!("Re-registered push subscription {}", request.endpoint)
            }
            Ok(resp) => tracing::error!("reregister: response: {}", resp.message),
            Err(e) => tracing::error!("reregister: error: {}", e),
        }
    }
}

async fn rollback(subscription: &dyn PushSubscription) {
    match subscription.unsubscribe().await {
        Ok(true) => tracing::debug!("Rolled back push subscription"),
        Ok(false) => tracing::error!("rollback: push manager kept the subscription"),
        Err(e) => tracing::error!("rollback: error: {}", e),
    }
}
