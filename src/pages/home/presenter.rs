use std::sync::Arc;

use anyhow::{Error, Result};

use super::view::HomeView;
use crate::citycare::{CityCareApi, ReportMapper};

/// Lists every report on the home page.
pub struct HomePresenter {
    view: Arc<dyn HomeView>,
    api: Arc<dyn CityCareApi>,
    mapper: Arc<dyn ReportMapper>,
}

impl HomePresenter {
    pub fn new(
        view: Arc<dyn HomeView>,
        api: Arc<dyn CityCareApi>,
        mapper: Arc<dyn ReportMapper>,
    ) -> Self {
        Self { view, api, mapper }
    }

    pub async fn show_reports_list_map(&self) {
        self.view.show_map_loading();
        if let Err(e) = self.view.initial_map().await {
            tracing::error!("show_reports_list_map: error: {}", e);
        }
        self.view.hide_map_loading();
    }

    pub async fn initial_gallery_and_map(&self) {
        self.view.show_loading();
        if let Err(e) = self.try_initial_gallery_and_map().await {
            tracing::error!("initial_gallery_and_map: error: {}", e);
            self.view.populate_reports_list_error(&e.to_string());
        }
        self.view.hide_loading();
    }

    async fn try_initial_gallery_and_map(&self) -> Result<(), Error> {
        self.show_reports_list_map().await;

        let resp = self.api.get_all_reports().await?;

        if !resp.ok {
            tracing::error!("initial_gallery_and_map: response: {}", resp.message);
            self.view.populate_reports_list_error(&resp.message);
            return Ok(());
        }

        let mut reports = Vec::new();
        for raw in resp.data.unwrap_or_default() {
            reports.push(self.mapper.map_report(raw).await?);
        }

        self.view.populate_reports_list(&resp.message, &reports);
        Ok(())
    }
}
