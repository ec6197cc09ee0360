use std::sync::Arc;

use crate::core::AppConfig;
use crate::device::{DeviceFile, DevicePermission, DevicePushManager, TerminalPrompt};
use crate::notify::{PushNotifications, PushOutcome, PushSubscriptionJson, PushSubscriptionKeys};

fn push_registration(config: &AppConfig) -> Option<PushSubscriptionJson> {
    match (&config.push_endpoint, &config.push_p256dh, &config.push_auth) {
        (Some(endpoint), Some(p256dh), Some(auth)) => Some(PushSubscriptionJson {
            endpoint: endpoint.clone(),
            expiration_time: None,
            keys: PushSubscriptionKeys {
                p256dh: p256dh.clone(),
                auth: auth.clone(),
            },
        }),
        (None, None, None) => None,
        _ => {
            tracing::warn!("Ignoring incomplete push service registration");
            None
        }
    }
}

fn push_notifications(config: &AppConfig) -> PushNotifications {
    let device = Arc::new(DeviceFile::new(config.device_path()));
    PushNotifications::new(
        Arc::new(DevicePermission::new(device.clone(), Arc::new(TerminalPrompt))),
        Arc::new(DevicePushManager::new(device, push_registration(config))),
        super::api(config),
        config.vapid_public_key.as_deref(),
    )
}

fn report(outcome: PushOutcome) {
    if outcome.is_success() {
        println!("{}", outcome.message());
    } else {
        eprintln!("{}", outcome.message());
    }
}

pub async fn subscribe(config: &AppConfig) {
    report(push_notifications(config).subscribe().await);
}

pub async fn unsubscribe(config: &AppConfig) {
    report(push_notifications(config).unsubscribe().await);
}
