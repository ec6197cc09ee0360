//! Notification permission and push manager for the terminal app.
//!
//! A browser keeps both in its own profile. Here they live in a small
//! JSON file under the storage path so a subscription survives
//! between runs of the CLI.

use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Error, Result, bail};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde::{Deserialize, Serialize};

use crate::notify::{
    NotificationPermission, PermissionState, PushManager, PushSubscription, PushSubscriptionJson,
    SubscribeOptions,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct StoredSubscription {
    subscription: PushSubscriptionJson,
    // base64url, the key the subscription was created for
    application_server_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct DeviceState {
    permission: Option<PermissionState>,
    subscription: Option<StoredSubscription>,
}

pub struct DeviceFile {
    path: PathBuf,
}

impl DeviceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<DeviceState, Error> {
        self.parse(tokio::fs::read_to_string(&self.path).await)
    }

    // For the synchronous permission probe, which can't await
    fn load_blocking(&self) -> Result<DeviceState, Error> {
        self.parse(std::fs::read_to_string(&self.path))
    }

    fn parse(&self, contents: io::Result<String>) -> Result<DeviceState, Error> {
        match contents {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Corrupt device file {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DeviceState::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, state: &DeviceState) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(state)?).await?;
        Ok(())
    }
}

/// Asks the user a yes/no style question. `None` means they walked
/// away without answering.
pub trait Prompt: Send + Sync {
    fn ask(&self, question: &str) -> Result<Option<String>, Error>;
}

pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&self, question: &str) -> Result<Option<String>, Error> {
        let mut rl = DefaultEditor::new()?;
        match rl.readline(question) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

pub struct DevicePermission {
    device: Arc<DeviceFile>,
    prompt: Arc<dyn Prompt>,
}

impl DevicePermission {
    pub fn new(device: Arc<DeviceFile>, prompt: Arc<dyn Prompt>) -> Self {
        Self { device, prompt }
    }
}

fn parse_answer(answer: Option<&str>) -> PermissionState {
    match answer.map(|a| a.trim().to_lowercase()).as_deref() {
        Some("y") | Some("yes") => PermissionState::Granted,
        Some("n") | Some("no") => PermissionState::Denied,
        _ => PermissionState::Default,
    }
}

#[async_trait]
impl NotificationPermission for DevicePermission {
    fn is_available(&self) -> bool {
        true
    }

    fn permission(&self) -> PermissionState {
        match self.device.load_blocking() {
            Ok(state) => state.permission.unwrap_or(PermissionState::Default),
            Err(e) => {
                tracing::error!("permission: error: {}", e);
                PermissionState::Default
            }
        }
    }

    async fn request_permission(&self) -> Result<PermissionState, Error> {
        let mut state = self.device.load().await?;
        // Like a browser, never ask again once the user said no or yes
        if let Some(permission) = state.permission
            && permission != PermissionState::Default
        {
            return Ok(permission);
        }

        let prompt = Arc::clone(&self.prompt);
        let answer = tokio::task::spawn_blocking(move || {
            prompt.ask("Allow CityCare to send you notifications? [y/n] ")
        })
        .await??;

        let permission = parse_answer(answer.as_deref());
        if permission != PermissionState::Default {
            state.permission = Some(permission);
            self.device.save(&state).await?;
        }
        Ok(permission)
    }
}

pub struct DevicePushManager {
    device: Arc<DeviceFile>,
    // What the push service issued for this device, if configured
    registration: Option<PushSubscriptionJson>,
}

impl DevicePushManager {
    pub fn new(device: Arc<DeviceFile>, registration: Option<PushSubscriptionJson>) -> Self {
        Self {
            device,
            registration,
        }
    }

    fn handle(&self, subscription: PushSubscriptionJson) -> Box<dyn PushSubscription> {
        Box::new(DeviceSubscription {
            device: Arc::clone(&self.device),
            json: subscription,
        })
    }
}

#[async_trait]
impl PushManager for DevicePushManager {
    async fn get_subscription(&self) -> Result<Option<Box<dyn PushSubscription>>, Error> {
        let state = self.device.load().await?;
        Ok(state.subscription.map(|s| self.handle(s.subscription)))
    }

    async fn subscribe(
        &self,
        options: &SubscribeOptions,
    ) -> Result<Box<dyn PushSubscription>, Error> {
        if !options.user_visible_only {
            bail!("Push subscriptions must be user visible");
        }

        let key = URL_SAFE_NO_PAD.encode(&options.application_server_key);
        let mut state = self.device.load().await?;

        if let Some(existing) = &state.subscription {
            if existing.application_server_key != key {
                bail!("A subscription with a different application server key already exists");
            }
            return Ok(self.handle(existing.subscription.clone()));
        }

        let Some(registration) = self.registration.clone() else {
            bail!(
                "No push service registration configured, set CITYCARE_PUSH_ENDPOINT, CITYCARE_PUSH_P256DH and CITYCARE_PUSH_AUTH"
            );
        };

        state.subscription = Some(StoredSubscription {
            subscription: registration.clone(),
            application_server_key: key,
        });
        self.device.save(&state).await?;

        Ok(self.handle(registration))
    }
}

struct DeviceSubscription {
    device: Arc<DeviceFile>,
    json: PushSubscriptionJson,
}

#[async_trait]
impl PushSubscription for DeviceSubscription {
    fn to_json(&self) -> PushSubscriptionJson {
        self.json.clone()
    }

    async fn unsubscribe(&self) -> Result<bool, Error> {
        let mut state = self.device.load().await?;
        let is_active = state
            .subscription
            .as_ref()
            .is_some_and(|s| s.subscription.endpoint == self.json.endpoint);
        if !is_active {
            return Ok(false);
        }
        state.subscription = None;
        self.device.save(&state).await?;
        Ok(true)
    }
}
