use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::{PushSubscriptionJson, PushSubscriptionKeys};

/// Every call to the CityCare API is normalized into this envelope.
/// `ok` is false when the server rejected the request, in which case
/// `message` is the human readable reason and `data` is usually empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            ok: true,
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            ok: false,
            message: message.to_string(),
            data: None,
        }
    }

    /// Takes the payload out of a successful response. A response that
    /// says it succeeded but carries nothing is treated as an error.
    pub fn into_data(self) -> Result<T> {
        self.data
            .ok_or_else(|| anyhow!("Response is missing data: {}", self.message))
    }
}

impl ApiResponse<()> {
    pub fn acknowledged(message: &str) -> Self {
        Self {
            ok: true,
            message: message.to_string(),
            data: None,
        }
    }
}

// Shape of the JSON body returned by the API. The `ok` flag of the
// envelope comes from the HTTP status, not the body.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiBody<T> {
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A report as it comes back from the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawReport {
    pub id: String,
    pub title: String,
    pub description: String,
    pub damage_level: String,
    #[serde(default)]
    pub evidence_images: Vec<String>,
    pub location: Coordinates,
    pub reporter: User,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
}

/// A report ready to be rendered, produced by a `ReportMapper`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub description: String,
    pub damage_level: String,
    pub evidence_images: Vec<String>,
    pub location: Location,
    pub reporter: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn from_raw(raw: RawReport, place_name: String) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            damage_level: raw.damage_level,
            evidence_images: raw.evidence_images,
            location: Location {
                latitude: raw.location.latitude,
                longitude: raw.location.longitude,
                place_name,
            },
            reporter: raw.reporter,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub commenter: User,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    #[serde(alias = "userId")]
    pub id: String,
    pub name: String,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscribePushRequest {
    pub endpoint: String,
    pub keys: PushSubscriptionKeys,
}

impl From<PushSubscriptionJson> for SubscribePushRequest {
    fn from(json: PushSubscriptionJson) -> Self {
        Self {
            endpoint: json.endpoint,
            keys: json.keys,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnsubscribePushRequest {
    pub endpoint: String,
}
