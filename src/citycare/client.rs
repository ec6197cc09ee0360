//! HTTP client for the CityCare REST API

use anyhow::{Context, Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::models::{
    ApiBody, ApiResponse, Comment, LoginRequest, LoginResult, NewComment, RawReport,
    SubscribePushRequest, UnsubscribePushRequest,
};

/// Everything the pages and notification helpers need from the
/// server. An `Err` means the call itself blew up (network, garbage
/// body); a rejection by the server is an `Ok` envelope with `ok`
/// set to false.
#[async_trait]
pub trait CityCareApi: Send + Sync {
    async fn get_all_reports(&self) -> Result<ApiResponse<Vec<RawReport>>, Error>;

    async fn get_report_by_id(&self, id: &str) -> Result<ApiResponse<RawReport>, Error>;

    async fn get_all_comments_by_report_id(
        &self,
        report_id: &str,
    ) -> Result<ApiResponse<Vec<Comment>>, Error>;

    async fn store_new_comment_by_report_id(
        &self,
        report_id: &str,
        comment: &NewComment,
    ) -> Result<ApiResponse<Comment>, Error>;

    async fn send_comment_to_report_owner_via_notification(
        &self,
        report_id: &str,
        comment_id: &str,
    ) -> Result<ApiResponse<()>, Error>;

    async fn send_report_to_me_via_notification(
        &self,
        report_id: &str,
    ) -> Result<ApiResponse<()>, Error>;

    async fn subscribe_push_notification(
        &self,
        subscription: &SubscribePushRequest,
    ) -> Result<ApiResponse<()>, Error>;

    async fn unsubscribe_push_notification(
        &self,
        subscription: &UnsubscribePushRequest,
    ) -> Result<ApiResponse<()>, Error>;

    async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse<LoginResult>, Error>;
}

pub struct HttpCityCareApi {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpCityCareApi {
    pub fn new(base_url: &str, access_token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            access_token: access_token.map(|t| t.to_string()),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid CityCare API URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("CityCare API URL can not be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, Error> {
        let url = self.endpoint(segments)?;
        let mut builder = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>, Error> {
        let (ok, message, data) = self.send_raw(builder).await?;
        let data = match data {
            Some(value) if ok && !value.is_null() => Some(
                serde_json::from_value(value).context("Unexpected data in CityCare response")?,
            ),
            _ => None,
        };
        Ok(ApiResponse { ok, message, data })
    }

    // Endpoints that only acknowledge a request. Whatever data they
    // return is ignored.
    async fn send_ack(&self, builder: RequestBuilder) -> Result<ApiResponse<()>, Error> {
        let (ok, message, _data) = self.send_raw(builder).await?;
        Ok(ApiResponse {
            ok,
            message,
            data: None,
        })
    }

    async fn send_raw(
        &self,
        builder: RequestBuilder,
    ) -> Result<(bool, String, Option<Value>), Error> {
        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        let body: ApiBody<Value> = serde_json::from_str(&text)
            .with_context(|| format!("Unexpected response from CityCare API ({})", status))?;
        tracing::debug!("CityCare API responded {}: {}", status, body.message);
        Ok((status.is_success(), body.message, body.data))
    }
}

#[async_trait]
impl CityCareApi for HttpCityCareApi {
    async fn get_all_reports(&self) -> Result<ApiResponse<Vec<RawReport>>, Error> {
        let req = self.request(Method::GET, &["reports"])?;
        self.send(req).await
    }

    async fn get_report_by_id(&self, id: &str) -> Result<ApiResponse<RawReport>, Error> {
        let req = self.request(Method::GET, &["reports", id])?;
        self.send(req).await
    }

    async fn get_all_comments_by_report_id(
        &self,
        report_id: &str,
    ) -> Result<ApiResponse<Vec<Comment>>, Error> {
        let req = self.request(Method::GET, &["reports", report_id, "comments"])?;
        self.send(req).await
    }

    async fn store_new_comment_by_report_id(
        &self,
        report_id: &str,
        comment: &NewComment,
    ) -> Result<ApiResponse<Comment>, Error> {
        let req = self
            .request(Method::POST, &["reports", report_id, "comments"])?
            .json(comment);
        self.send(req).await
    }

    async fn send_comment_to_report_owner_via_notification(
        &self,
        report_id: &str,
        comment_id: &str,
    ) -> Result<ApiResponse<()>, Error> {
        let req = self.request(
            Method::POST,
            &["reports", report_id, "comments", comment_id, "notify"],
        )?;
        self.send_ack(req).await
    }

    async fn send_report_to_me_via_notification(
        &self,
        report_id: &str,
    ) -> Result<ApiResponse<()>, Error> {
        let req = self.request(Method::POST, &["reports", report_id, "notify-me"])?;
        self.send_ack(req).await
    }

    async fn subscribe_push_notification(
        &self,
        subscription: &SubscribePushRequest,
    ) -> Result<ApiResponse<()>, Error> {
        let req = self
            .request(Method::POST, &["notifications", "subscribe"])?
            .json(subscription);
        self.send_ack(req).await
    }

    async fn unsubscribe_push_notification(
        &self,
        subscription: &UnsubscribePushRequest,
    ) -> Result<ApiResponse<()>, Error> {
        let req = self
            .request(Method::DELETE, &["notifications", "subscribe"])?
            .json(subscription);
        self.send_ack(req).await
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse<LoginResult>, Error> {
        let req = self.request(Method::POST, &["login"])?.json(credentials);
        self.send(req).await
    }
}
