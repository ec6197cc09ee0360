use anyhow::{Error, Result};
use async_trait::async_trait;

use crate::citycare::Report;

#[async_trait]
pub trait HomeView: Send + Sync {
    fn show_map_loading(&self);
    fn hide_map_loading(&self);
    async fn initial_map(&self) -> Result<(), Error>;

    fn show_loading(&self);
    fn hide_loading(&self);
    fn populate_reports_list(&self, message: &str, reports: &[Report]);
    fn populate_reports_list_error(&self, message: &str);
}
