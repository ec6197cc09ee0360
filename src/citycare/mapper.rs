use std::sync::Arc;

use anyhow::{Error, Result};
use async_trait::async_trait;

use super::models::{RawReport, Report};
use crate::maptiler::Geocoder;

/// Turns API payloads into reports the views can render.
#[async_trait]
pub trait ReportMapper: Send + Sync {
    async fn map_report(&self, raw: RawReport) -> Result<Report, Error>;
}

/// Resolves the place name of a report's location. Geocoding is
/// best effort and falls back to the raw coordinates.
#[derive(Clone, Default)]
pub struct ApiReportMapper {
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl ApiReportMapper {
    pub fn new(geocoder: Option<Arc<dyn Geocoder>>) -> Self {
        Self { geocoder }
    }

    async fn place_name(&self, latitude: f64, longitude: f64) -> String {
        let Some(geocoder) = &self.geocoder else {
            return coordinate_label(latitude, longitude);
        };
        match geocoder.place_name(latitude, longitude).await {
            Ok(name) => name,
            Err(e) => {
                tracing::error!("place_name: error: {}", e);
                coordinate_label(latitude, longitude)
            }
        }
    }
}

#[async_trait]
impl ReportMapper for ApiReportMapper {
    async fn map_report(&self, raw: RawReport) -> Result<Report, Error> {
        let place_name = self
            .place_name(raw.location.latitude, raw.location.longitude)
            .await;
        Ok(Report::from_raw(raw, place_name))
    }
}

fn coordinate_label(latitude: f64, longitude: f64) -> String {
    format!("{}, {}", latitude, longitude)
}
