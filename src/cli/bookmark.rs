use anyhow::Result;

use crate::core::AppConfig;

use super::view::print_saved_reports;

pub async fn save(config: &AppConfig, id: &str) {
    let presenter = super::report_detail_presenter(config, id);
    presenter.save_report().await;
}

pub async fn unsave(config: &AppConfig, id: &str) {
    let presenter = super::report_detail_presenter(config, id);
    presenter.remove_report().await;
}

pub async fn list(config: &AppConfig) -> Result<()> {
    let reports = super::bookmarks(config).get_all_reports().await?;
    print_saved_reports(&reports);
    Ok(())
}
