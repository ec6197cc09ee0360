//! Capabilities the notification helpers need from the platform they
//! run on. A browser exposes these through `Notification` and the
//! service worker's push manager; the terminal app backs them with a
//! local device file.

use anyhow::{Error, Result};
use async_trait::async_trait;

use super::models::{PermissionState, PushSubscriptionJson, SubscribeOptions};

#[async_trait]
pub trait NotificationPermission: Send + Sync {
    fn is_available(&self) -> bool;

    fn permission(&self) -> PermissionState;

    /// Ask the user for permission to show notifications.
    async fn request_permission(&self) -> Result<PermissionState, Error>;
}

#[async_trait]
pub trait PushManager: Send + Sync {
    /// The active subscription for this registration, if there is one.
    async fn get_subscription(&self) -> Result<Option<Box<dyn PushSubscription>>, Error>;

    async fn subscribe(&self, options: &SubscribeOptions)
    -> Result<Box<dyn PushSubscription>, Error>;
}

#[async_trait]
pub trait PushSubscription: Send + Sync {
    fn to_json(&self) -> PushSubscriptionJson;

    /// Returns false when the push manager refused to drop the
    /// subscription.
    async fn unsubscribe(&self) -> Result<bool, Error>;
}
