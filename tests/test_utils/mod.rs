//! Test doubles for integration tests. Each fake records what it was
//! asked to do so tests can assert on the exact sequence of calls.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use citycare::bookmark::BookmarkStore;
use citycare::citycare::{
    ApiResponse, CityCareApi, Comment, Coordinates, LoginRequest, LoginResult, NewComment,
    RawReport, Report, ReportMapper, SubscribePushRequest, UnsubscribePushRequest, User,
};
use citycare::notify::{
    NotificationPermission, PermissionState, PushManager, PushSubscription, PushSubscriptionJson,
    PushSubscriptionKeys, SubscribeOptions,
};
use citycare::pages::{HomeView, ReportDetailView};

/// A canned API reply. `Err` stands in for a network failure.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(ApiResponse<T>),
    Err(String),
}

impl<T> Reply<T> {
    pub fn ok(message: &str, data: T) -> Self {
        Reply::Ok(ApiResponse::success(message, data))
    }

    pub fn rejected(message: &str) -> Self {
        Reply::Ok(ApiResponse::failure(message))
    }

    pub fn error(message: &str) -> Self {
        Reply::Err(message.to_string())
    }
}

impl Reply<()> {
    pub fn ack(message: &str) -> Self {
        Reply::Ok(ApiResponse::acknowledged(message))
    }
}

impl<T> Default for Reply<T> {
    fn default() -> Self {
        Reply::Err(String::from("unexpected call"))
    }
}

impl<T: Clone> Reply<T> {
    fn result(&self) -> Result<ApiResponse<T>, Error> {
        match self {
            Reply::Ok(resp) => Ok(resp.clone()),
            Reply::Err(message) => Err(anyhow!(message.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    GetAllReports,
    GetReport(String),
    GetComments(String),
    StoreComment(String, String),
    NotifyOwner(String, String),
    NotifyMe(String),
    Subscribe(SubscribePushRequest),
    Unsubscribe(String),
    Login(String),
}

#[derive(Default)]
pub struct FakeApi {
    pub reports: Reply<Vec<RawReport>>,
    pub report: Reply<RawReport>,
    pub comments: Reply<Vec<Comment>>,
    pub store_comment: Reply<Comment>,
    pub notify_owner: Reply<()>,
    pub notify_me: Reply<()>,
    pub subscribe: Reply<()>,
    pub unsubscribe: Reply<()>,
    pub login: Reply<LoginResult>,
    pub calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, f: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls().iter().filter(|c| f(c)).count()
    }
}

#[async_trait]
impl CityCareApi for FakeApi {
    async fn get_all_reports(&self) -> Result<ApiResponse<Vec<RawReport>>, Error> {
        self.record(ApiCall::GetAllReports);
        self.reports.result()
    }

    async fn get_report_by_id(&self, id: &str) -> Result<ApiResponse<RawReport>, Error> {
        self.record(ApiCall::GetReport(id.to_string()));
        self.report.result()
    }

    async fn get_all_comments_by_report_id(
        &self,
        report_id: &str,
    ) -> Result<ApiResponse<Vec<Comment>>, Error> {
        self.record(ApiCall::GetComments(report_id.to_string()));
        self.comments.result()
    }

    async fn store_new_comment_by_report_id(
        &self,
        report_id: &str,
        comment: &NewComment,
    ) -> Result<ApiResponse<Comment>, Error> {
        self.record(ApiCall::StoreComment(
            report_id.to_string(),
            comment.body.clone(),
        ));
        self.store_comment.result()
    }

    async fn send_comment_to_report_owner_via_notification(
        &self,
        report_id: &str,
        comment_id: &str,
    ) -> Result<ApiResponse<()>, Error> {
        self.record(ApiCall::NotifyOwner(
            report_id.to_string(),
            comment_id.to_string(),
        ));
        self.notify_owner.result()
    }

    async fn send_report_to_me_via_notification(
        &self,
        report_id: &str,
    ) -> Result<ApiResponse<()>, Error> {
        self.record(ApiCall::NotifyMe(report_id.to_string()));
        self.notify_me.result()
    }

    async fn subscribe_push_notification(
        &self,
        subscription: &SubscribePushRequest,
    ) -> Result<ApiResponse<()>, Error> {
        self.record(ApiCall::Subscribe(subscription.clone()));
        self.subscribe.result()
    }

    async fn unsubscribe_push_notification(
        &self,
        subscription: &UnsubscribePushRequest,
    ) -> Result<ApiResponse<()>, Error> {
        self.record(ApiCall::Unsubscribe(subscription.endpoint.clone()));
        self.unsubscribe.result()
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse<LoginResult>, Error> {
        self.record(ApiCall::Login(credentials.email.clone()));
        self.login.result()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    ShowMapLoading,
    HideMapLoading,
    InitialMap,
    ShowReportDetailLoading,
    HideReportDetailLoading,
    ReportDetailError(String),
    ReportDetailAndInitialMap(String, Report),
    ShowCommentsLoading,
    HideCommentsLoading,
    Comments(String, Vec<Comment>),
    CommentsError(String),
    ShowSubmitLoading,
    HideSubmitLoading,
    PostCommentFailed(String),
    PostCommentSucceeded(String, Comment),
    RenderSaveButton,
    RenderRemoveButton,
    SavedToBookmark(String),
    SaveToBookmarkFailed(String),
    RemovedFromBookmark(String),
    RemoveFromBookmarkFailed(String),
    ShowLoading,
    HideLoading,
    ReportsList(String, Vec<Report>),
    ReportsListError(String),
}

#[derive(Default)]
pub struct RecordingView {
    pub fail_map: bool,
    pub calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn failing_map() -> Self {
        Self {
            fail_map: true,
            ..Default::default()
        }
    }

    fn record(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, f: impl Fn(&ViewCall) -> bool) -> usize {
        self.calls().iter().filter(|c| f(c)).count()
    }

    async fn map(&self) -> Result<(), Error> {
        self.record(ViewCall::InitialMap);
        if self.fail_map {
            return Err(anyhow!("map tiles unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ReportDetailView for RecordingView {
    fn show_map_loading(&self) {
        self.record(ViewCall::ShowMapLoading);
    }

    fn hide_map_loading(&self) {
        self.record(ViewCall::HideMapLoading);
    }

    async fn initial_map(&self) -> Result<(), Error> {
        self.map().await
    }

    fn show_report_detail_loading(&self) {
        self.record(ViewCall::ShowReportDetailLoading);
    }

    fn hide_report_detail_loading(&self) {
        self.record(ViewCall::HideReportDetailLoading);
    }

    fn populate_report_detail_error(&self, message: &str) {
        self.record(ViewCall::ReportDetailError(message.to_string()));
    }

    fn populate_report_detail_and_initial_map(&self, message: &str, report: &Report) {
        self.record(ViewCall::ReportDetailAndInitialMap(
            message.to_string(),
            report.clone(),
        ));
    }

    fn show_comments_loading(&self) {
        self.record(ViewCall::ShowCommentsLoading);
    }

    fn hide_comments_loading(&self) {
        self.record(ViewCall::HideCommentsLoading);
    }

    fn populate_report_detail_comments(&self, message: &str, comments: &[Comment]) {
        self.record(ViewCall::Comments(message.to_string(), comments.to_vec()));
    }

    fn populate_comments_list_error(&self, message: &str) {
        self.record(ViewCall::CommentsError(message.to_string()));
    }

    fn show_submit_loading_button(&self) {
        self.record(ViewCall::ShowSubmitLoading);
    }

    fn hide_submit_loading_button(&self) {
        self.record(ViewCall::HideSubmitLoading);
    }

    fn post_new_comment_failed(&self, message: &str) {
        self.record(ViewCall::PostCommentFailed(message.to_string()));
    }

    fn post_new_comment_successfully(&self, message: &str, comment: &Comment) {
        self.record(ViewCall::PostCommentSucceeded(
            message.to_string(),
            comment.clone(),
        ));
    }

    fn render_save_button(&self) {
        self.record(ViewCall::RenderSaveButton);
    }

    fn render_remove_button(&self) {
        self.record(ViewCall::RenderRemoveButton);
    }

    fn save_to_bookmark_successfully(&self, message: &str) {
        self.record(ViewCall::SavedToBookmark(message.to_string()));
    }

    fn save_to_bookmark_failed(&self, message: &str) {
        self.record(ViewCall::SaveToBookmarkFailed(message.to_string()));
    }

    fn remove_from_bookmark_successfully(&self, message: &str) {
        self.record(ViewCall::RemovedFromBookmark(message.to_string()));
    }

    fn remove_from_bookmark_failed(&self, message: &str) {
        self.record(ViewCall::RemoveFromBookmarkFailed(message.to_string()));
    }
}

#[async_trait]
impl HomeView for RecordingView {
    fn show_map_loading(&self) {
        self.record(ViewCall::ShowMapLoading);
    }

    fn hide_map_loading(&self) {
        self.record(ViewCall::HideMapLoading);
    }

    async fn initial_map(&self) -> Result<(), Error> {
        self.map().await
    }

    fn show_loading(&self) {
        self.record(ViewCall::ShowLoading);
    }

    fn hide_loading(&self) {
        self.record(ViewCall::HideLoading);
    }

    fn populate_reports_list(&self, message: &str, reports: &[Report]) {
        self.record(ViewCall::ReportsList(message.to_string(), reports.to_vec()));
    }

    fn populate_reports_list_error(&self, message: &str) {
        self.record(ViewCall::ReportsListError(message.to_string()));
    }
}

/// Maps reports with a fixed place name so tests can tell mapped
/// reports apart from raw ones.
#[derive(Default)]
pub struct FakeMapper {
    pub fail: bool,
    pub mapped: AtomicUsize,
}

pub const MAPPED_PLACE_NAME: &str = "Gambir, Jakarta Pusat";

#[async_trait]
impl ReportMapper for FakeMapper {
    async fn map_report(&self, raw: RawReport) -> Result<Report, Error> {
        self.mapped.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("geocoder exploded"));
        }
        Ok(Report::from_raw(raw, MAPPED_PLACE_NAME.to_string()))
    }
}

#[derive(Default)]
pub struct MemoryBookmarks {
    pub fail: bool,
    reports: Mutex<HashMap<String, Report>>,
}

impl MemoryBookmarks {
    pub fn with_report(report: Report) -> Self {
        let store = Self::default();
        store
            .reports
            .lock()
            .unwrap()
            .insert(report.id.clone(), report);
        store
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.reports.lock().unwrap().contains_key(id)
    }

    fn check(&self) -> Result<(), Error> {
        if self.fail {
            return Err(anyhow!("bookmark storage unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for MemoryBookmarks {
    async fn get_report_by_id(&self, id: &str) -> Result<Option<Report>, Error> {
        self.check()?;
        Ok(self.reports.lock().unwrap().get(id).cloned())
    }

    async fn put_report(&self, report: &Report) -> Result<(), Error> {
        self.check()?;
        self.reports
            .lock()
            .unwrap()
            .insert(report.id.clone(), report.clone());
        Ok(())
    }

    async fn remove_report(&self, id: &str) -> Result<bool, Error> {
        self.check()?;
        Ok(self.reports.lock().unwrap().remove(id).is_some())
    }

    async fn get_all_reports(&self) -> Result<Vec<Report>, Error> {
        self.check()?;
        Ok(self.reports.lock().unwrap().values().cloned().collect())
    }
}

pub struct FakePermission {
    pub available: bool,
    pub state: Mutex<PermissionState>,
    // What the user picks when prompted
    pub answer: PermissionState,
    pub prompts: AtomicUsize,
}

impl FakePermission {
    pub fn new(state: PermissionState, answer: PermissionState) -> Self {
        Self {
            available: true,
            state: Mutex::new(state),
            answer,
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionState::Granted, PermissionState::Granted)
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::granted()
        }
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationPermission for FakePermission {
    fn is_available(&self) -> bool {
        self.available
    }

    fn permission(&self) -> PermissionState {
        *self.state.lock().unwrap()
    }

    async fn request_permission(&self) -> Result<PermissionState, Error> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().unwrap() = self.answer;
        Ok(self.answer)
    }
}

/// Shared between the push manager and the subscriptions it hands
/// out, the same way a browser registration owns its subscription.
pub struct PushState {
    pub active: Mutex<Option<PushSubscriptionJson>>,
    // What `unsubscribe` on a subscription handle returns
    pub unsubscribe_result: Mutex<Result<bool, String>>,
    pub unsubscribe_calls: AtomicUsize,
}

pub struct FakePushManager {
    pub state: Arc<PushState>,
    pub issued: PushSubscriptionJson,
    pub subscribe_error: Option<String>,
    pub subscribe_calls: AtomicUsize,
    pub last_options: Mutex<Option<SubscribeOptions>>,
}

impl FakePushManager {
    pub fn new() -> Self {
        Self {
            state: Arc::new(PushState {
                active: Mutex::new(None),
                unsubscribe_result: Mutex::new(Ok(true)),
                unsubscribe_calls: AtomicUsize::new(0),
            }),
            issued: subscription_json("https://push.example.com/new"),
            subscribe_error: None,
            subscribe_calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn with_active(json: PushSubscriptionJson) -> Self {
        let manager = Self::new();
        *manager.state.active.lock().unwrap() = Some(json);
        manager
    }

    pub fn active(&self) -> Option<PushSubscriptionJson> {
        self.state.active.lock().unwrap().clone()
    }

    pub fn set_unsubscribe_result(&self, result: Result<bool, String>) {
        *self.state.unsubscribe_result.lock().unwrap() = result;
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.state.unsubscribe_calls.load(Ordering::SeqCst)
    }

    fn handle(&self, json: PushSubscriptionJson) -> Box<dyn PushSubscription> {
        Box::new(FakeSubscription {
            state: Arc::clone(&self.state),
            json,
        })
    }
}

#[async_trait]
impl PushManager for FakePushManager {
    async fn get_subscription(&self) -> Result<Option<Box<dyn PushSubscription>>, Error> {
        Ok(self.active().map(|json| self.handle(json)))
    }

    async fn subscribe(
        &self,
        options: &SubscribeOptions,
    ) -> Result<Box<dyn PushSubscription>, Error> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(options.clone());
        if let Some(message) = &self.subscribe_error {
            return Err(anyhow!(message.clone()));
        }
        *self.state.active.lock().unwrap() = Some(self.issued.clone());
        Ok(self.handle(self.issued.clone()))
    }
}

struct FakeSubscription {
    state: Arc<PushState>,
    json: PushSubscriptionJson,
}

#[async_trait]
impl PushSubscription for FakeSubscription {
    fn to_json(&self) -> PushSubscriptionJson {
        self.json.clone()
    }

    async fn unsubscribe(&self) -> Result<bool, Error> {
        self.state.unsubscribe_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.state.unsubscribe_result.lock().unwrap().clone();
        match result {
            Ok(true) => {
                *self.state.active.lock().unwrap() = None;
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(message) => Err(anyhow!(message)),
        }
    }
}

pub fn subscription_json(endpoint: &str) -> PushSubscriptionJson {
    PushSubscriptionJson {
        endpoint: endpoint.to_string(),
        expiration_time: None,
        keys: PushSubscriptionKeys {
            p256dh: String::from("BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM"),
            auth: String::from("tBHItJI5svbpez7KI4CCXg"),
        },
    }
}

/// A well formed VAPID public key (65 byte uncompressed P-256 point).
pub fn vapid_public_key() -> String {
    use base64::Engine as _;
    let mut key = vec![0x04];
    key.extend((0..64u8).map(|i| i.wrapping_mul(7)));
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(key)
}

pub fn user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
    }
}

pub fn raw_report(id: &str) -> RawReport {
    RawReport {
        id: id.to_string(),
        title: String::from("Jalan berlubang di depan sekolah"),
        description: String::from("Lubang sedalam 20cm membahayakan pengendara motor"),
        damage_level: String::from("major"),
        evidence_images: vec![String::from("https://example.com/evidence/1.jpg")],
        location: Coordinates {
            latitude: -6.175392,
            longitude: 106.827153,
        },
        reporter: user("user-1", "Dimas Saputra"),
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap(),
        updated_at: None,
    }
}

pub fn mapped_report(id: &str) -> Report {
    Report::from_raw(raw_report(id), MAPPED_PLACE_NAME.to_string())
}

pub fn comment(id: &str, body: &str) -> Comment {
    Comment {
        id: id.to_string(),
        body: body.to_string(),
        commenter: user("user-2", "Ayu Lestari"),
        created_at: Utc.with_ymd_and_hms(2025, 3, 2, 10, 30, 0).unwrap(),
    }
}
