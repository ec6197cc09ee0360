use anyhow::{Error, Result, bail};
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

// VAPID keys are distributed as url-safe base64, usually without
// padding, but some servers hand them out padded.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// Uncompressed P-256 point: 0x04 || X || Y
const APPLICATION_SERVER_KEY_LEN: usize = 65;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PushSubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// The serialized form of a push subscription, the same shape a
/// browser produces with `PushSubscription.toJSON()`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscriptionJson {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
    pub keys: PushSubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscribeOptions {
    pub user_visible_only: bool,
    pub application_server_key: Vec<u8>,
}

impl SubscribeOptions {
    pub fn new(vapid_public_key: &str) -> Result<Self, Error> {
        Ok(Self {
            user_visible_only: true,
            application_server_key: decode_application_server_key(vapid_public_key)?,
        })
    }
}

/// Decode a base64 encoded VAPID public key into the raw bytes the
/// push service expects.
pub fn decode_application_server_key(key: &str) -> Result<Vec<u8>, Error> {
    let normalized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    let bytes = URL_SAFE_LENIENT.decode(normalized)?;
    if bytes.len() != APPLICATION_SERVER_KEY_LEN || bytes[0] != 0x04 {
        bail!(
            "Application server key must be an uncompressed P-256 public key ({} bytes given)",
            bytes.len()
        );
    }
    Ok(bytes)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    Granted,
    Denied,
    // The prompt was closed without an answer
    Dismissed,
    Unsupported,
}

impl PermissionOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionOutcome::Granted)
    }

    pub fn message(&self) -> &'static str {
        match self {
            PermissionOutcome::Granted => "Notification permission granted",
            PermissionOutcome::Denied => "Notification permission denied",
            PermissionOutcome::Dismissed => "Notification permission prompt closed or ignored",
            PermissionOutcome::Unsupported => "Notifications are not supported on this device",
        }
    }
}

/// What happened when (un)subscribing, handed back to the caller in
/// place of a blocking alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Permission(PermissionOutcome),
    AlreadySubscribed,
    Subscribed,
    SubscribeFailed,
    NotSubscribed,
    Unsubscribed,
    UnsubscribeFailed,
}

impl PushOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PushOutcome::Subscribed | PushOutcome::Unsubscribed)
    }

    pub fn message(&self) -> &'static str {
        match self {
            PushOutcome::Permission(outcome) => outcome.message(),
            PushOutcome::AlreadySubscribed => "Already subscribed to push notifications",
            PushOutcome::Subscribed => "Push notification subscription enabled",
            PushOutcome::SubscribeFailed => "Failed to enable push notification subscription",
            PushOutcome::NotSubscribed => {
                "Can not unsubscribe from push notifications without an existing subscription"
            }
            PushOutcome::Unsubscribed => "Push notification subscription disabled",
            PushOutcome::UnsubscribeFailed => "Failed to disable push notification subscription",
        }
    }
}
