use std::sync::Arc;

use anyhow::{Error, Result};
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use super::view::ReportDetailView;
use crate::bookmark::BookmarkStore;
use crate::citycare::{CityCareApi, NewComment, ReportMapper};

/// Drives the report detail page: fetches the report and its
/// comments, posts new comments and keeps the save button in sync
/// with the bookmark store.
///
/// Every public method swallows its own errors. Failures end up in
/// one of the view's error callbacks (or only in the logs for the
/// notification side effects) and every loading indicator that gets
/// shown is hidden again no matter how the call ended.
pub struct ReportDetailPresenter {
    report_id: String,
    view: Arc<dyn ReportDetailView>,
    api: Arc<dyn CityCareApi>,
    mapper: Arc<dyn ReportMapper>,
    bookmarks: Arc<dyn BookmarkStore>,
    // Fire-and-forget side effects spawned by `post_new_comment`
    background: Mutex<JoinSet<()>>,
}

impl ReportDetailPresenter {
    pub fn new(
        report_id: &str,
        view: Arc<dyn ReportDetailView>,
        api: Arc<dyn CityCareApi>,
        mapper: Arc<dyn ReportMapper>,
        bookmarks: Arc<dyn BookmarkStore>,
    ) -> Self {
        Self {
            report_id: report_id.to_string(),
            view,
            api,
            mapper,
            bookmarks,
            background: Mutex::new(JoinSet::new()),
        }
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    pub async fn show_report_detail_map(&self) {
        self.view.show_map_loading();
        if let Err(e) = self.view.initial_map().await {
            tracing::error!("show_report_detail_map: error: {}", e);
        }
        self.view.hide_map_loading();
    }

    pub async fn show_report_detail(&self) {
        self.view.show_report_detail_loading();
        if let Err(e) = self.try_show_report_detail().await {
            tracing::error!("show_report_detail: error: {}", e);
            self.view.populate_report_detail_error(&e.to_string());
        }
        self.view.hide_report_detail_loading();
    }

    async fn try_show_report_detail(&self) -> Result<(), Error> {
        let resp = self.api.get_report_by_id(&self.report_id).await?;

        if !resp.ok {
            tracing::error!("show_report_detail: response: {}", resp.message);
            self.view.populate_report_detail_error(&resp.message);
            return Ok(());
        }

        let message = resp.message.clone();
        let report = self.mapper.map_report(resp.into_data()?).await?;
        tracing::debug!("Loaded report {}", report.id);

        self.view
            .populate_report_detail_and_initial_map(&message, &report);
        Ok(())
    }

    pub async fn get_comments_list(&self) {
        self.view.show_comments_loading();
        if let Err(e) = self.try_get_comments_list().await {
            tracing::error!("get_comments_list: error: {}", e);
            self.view.populate_comments_list_error(&e.to_string());
        }
        self.view.hide_comments_loading();
    }

    async fn try_get_comments_list(&self) -> Result<(), Error> {
        let resp = self
            .api
            .get_all_comments_by_report_id(&self.report_id)
            .await?;

        if !resp.ok {
            tracing::error!("get_comments_list: response: {}", resp.message);
            self.view.populate_comments_list_error(&resp.message);
            return Ok(());
        }

        let comments = resp.data.unwrap_or_default();
        self.view
            .populate_report_detail_comments(&resp.message, &comments);
        Ok(())
    }

    pub async fn post_new_comment(&self, comment: NewComment) {
        self.view.show_submit_loading_button();
        if let Err(e) = self.try_post_new_comment(&comment).await {
            tracing::error!("post_new_comment: error: {}", e);
            self.view.post_new_comment_failed(&e.to_string());
        }
        self.view.hide_submit_loading_button();
    }

    async fn try_post_new_comment(&self, comment: &NewComment) -> Result<(), Error> {
        let resp = self
            .api
            .store_new_comment_by_report_id(&self.report_id, comment)
            .await?;

        if !resp.ok {
            tracing::error!("post_new_comment: response: {}", resp.message);
            self.view.post_new_comment_failed(&resp.message);
            return Ok(());
        }

        let message = resp.message.clone();
        let created = resp.into_data()?;

        // Don't wait on the owner being notified
        let mut background = self.background.lock().await;
        while let Some(res) = background.try_join_next() {
            log_background_result(res);
        }
        background.spawn(notify_report_owner(
            Arc::clone(&self.api),
            self.report_id.clone(),
            created.id.clone(),
        ));
        drop(background);

        self.view.post_new_comment_successfully(&message, &created);
        Ok(())
    }

    pub async fn notify_report_owner(&self, comment_id: &str) {
        notify_report_owner(
            Arc::clone(&self.api),
            self.report_id.clone(),
            comment_id.to_string(),
        )
        .await
    }

    pub async fn notify_me(&self) {
        match self
            .api
            .send_report_to_me_via_notification(&self.report_id)
            .await
        {
            Ok(resp) if resp.ok => tracing::info!("notify_me: {}", resp.message),
            Ok(resp) => tracing::error!("notify_me: response: {}", resp.message),
            Err(e) => tracing::error!("notify_me: error: {}", e),
        }
    }

    pub async fn show_save_button(&self) {
        if self.is_report_saved().await {
            self.view.render_remove_button();
            return;
        }

        self.view.render_save_button();
    }

    async fn is_report_saved(&self) -> bool {
        match self.bookmarks.get_report_by_id(&self.report_id).await {
            Ok(saved) => saved.is_some(),
            Err(e) => {
                tracing::error!("is_report_saved: error: {}", e);
                false
            }
        }
    }

    pub async fn save_report(&self) {
        if let Err(e) = self.try_save_report().await {
            tracing::error!("save_report: error: {}", e);
            self.view.save_to_bookmark_failed(&e.to_string());
        }
        self.show_save_button().await;
    }

    async fn try_save_report(&self) -> Result<(), Error> {
        let resp = self.api.get_report_by_id(&self.report_id).await?;

        if !resp.ok {
            tracing::error!("save_report: response: {}", resp.message);
            self.view.save_to_bookmark_failed(&resp.message);
            return Ok(());
        }

        let report = self.mapper.map_report(resp.into_data()?).await?;
        self.bookmarks.put_report(&report).await?;
        self.view
            .save_to_bookmark_successfully("Report saved to bookmarks");
        Ok(())
    }

    pub async fn remove_report(&self) {
        match self.bookmarks.remove_report(&self.report_id).await {
            Ok(true) => self
                .view
                .remove_from_bookmark_successfully("Report removed from bookmarks"),
            Ok(false) => self
                .view
                .remove_from_bookmark_failed("Report is not in bookmarks"),
            Err(e) => {
                tracing::error!("remove_report: error: {}", e);
                self.view.remove_from_bookmark_failed(&e.to_string());
            }
        }
        self.show_save_button().await;
    }

    /// Number of background side effects not yet collected. Finished
    /// ones are collected on the next `post_new_comment` or `settle`.
    pub async fn background_tasks(&self) -> usize {
        self.background.lock().await.len()
    }

    /// Wait for any side effects still running in the background.
    pub async fn settle(&self) {
        let mut background = self.background.lock().await;
        while let Some(res) = background.join_next().await {
            log_background_result(res);
        }
    }
}

impl Drop for ReportDetailPresenter {
    fn drop(&mut self) {
        // Leave pending notifications running instead of aborting them
        self.background.get_mut().detach_all();
    }
}

fn log_background_result(res: Result<(), tokio::task::JoinError>) {
    if let Err(e) = res {
        tracing::error!("background task failed: {}", e);
    }
}

// Best effort, a failure here must never reach whoever posted the
// comment.
async fn notify_report_owner(api: Arc<dyn CityCareApi>, report_id: String, comment_id: String) {
    match api
        .send_comment_to_report_owner_via_notification(&report_id, &comment_id)
        .await
    {
        Ok(resp) if resp.ok => tracing::info!("notify_report_owner: {}", resp.message),
        Ok(resp) => tracing::error!("notify_report_owner: response: {}", resp.message),
        Err(e) => tracing::error!("notify_report_owner: error: {}", e),
    }
}
