use std::env;
use std::path::{Path, PathBuf};

use super::session::Session;

const DEFAULT_API_BASE_URL: &str = "https://citycare-api.dicoding.dev/v1";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub storage_path: String,
    pub access_token: Option<String>,
    pub vapid_public_key: Option<String>,
    pub map_service_api_key: Option<String>,
    // Push service registration handed to this device. A browser gets
    // these from its push service, the terminal app has to be told.
    pub push_endpoint: Option<String>,
    pub push_p256dh: Option<String>,
    pub push_auth: Option<String>,
}

impl AppConfig {
    pub fn bookmarks_path(&self) -> PathBuf {
        Path::new(&self.storage_path).join("bookmarks.json")
    }

    pub fn device_path(&self) -> PathBuf {
        Path::new(&self.storage_path).join("device.json")
    }

    pub fn session_path(&self) -> PathBuf {
        Path::new(&self.storage_path).join("session.json")
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("CITYCARE_STORAGE_PATH").unwrap_or("./".to_string());
        let api_base_url =
            env::var("CITYCARE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let vapid_public_key = optional_env("CITYCARE_VAPID_PUBLIC_KEY");
        let map_service_api_key = optional_env("CITYCARE_MAP_SERVICE_API_KEY");
        let push_endpoint = optional_env("CITYCARE_PUSH_ENDPOINT");
        let push_p256dh = optional_env("CITYCARE_PUSH_P256DH");
        let push_auth = optional_env("CITYCARE_PUSH_AUTH");

        let mut config = Self {
            api_base_url,
            storage_path,
            access_token: None,
            vapid_public_key,
            map_service_api_key,
            push_endpoint,
            push_p256dh,
            push_auth,
        };

        // An explicit token wins over whatever `login` saved
        config.access_token = optional_env("CITYCARE_ACCESS_TOKEN").or_else(|| {
            match Session::load(&config.session_path()) {
                Ok(session) => session.map(|s| s.access_token),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable session: {}", e);
                    None
                }
            }
        });

        config
    }
}
