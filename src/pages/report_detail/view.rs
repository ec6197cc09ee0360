use anyhow::{Error, Result};
use async_trait::async_trait;

use crate::citycare::{Comment, Report};

/// The rendering side of the report detail page. Everything except
/// the map is synchronous and infallible, the presenter decides what
/// to show and when.
#[async_trait]
pub trait ReportDetailView: Send + Sync {
    fn show_map_loading(&self);
    fn hide_map_loading(&self);
    async fn initial_map(&self) -> Result<(), Error>;

    fn show_report_detail_loading(&self);
    fn hide_report_detail_loading(&self);
    fn populate_report_detail_error(&self, message: &str);
    fn populate_report_detail_and_initial_map(&self, message: &str, report: &Report);

    fn show_comments_loading(&self);
    fn hide_comments_loading(&self);
    fn populate_report_detail_comments(&self, message: &str, comments: &[Comment]);
    fn populate_comments_list_error(&self, message: &str);

    fn show_submit_loading_button(&self);
    fn hide_submit_loading_button(&self);
    fn post_new_comment_failed(&self, message: &str);
    fn post_new_comment_successfully(&self, message: &str, comment: &Comment);

    fn render_save_button(&self);
    fn render_remove_button(&self);
    fn save_to_bookmark_successfully(&self, message: &str);
    fn save_to_bookmark_failed(&self, message: &str);
    fn remove_from_bookmark_successfully(&self, message: &str);
    fn remove_from_bookmark_failed(&self, message: &str);
}
