use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::citycare::Report;

/// Reports the user saved for later.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn get_report_by_id(&self, id: &str) -> Result<Option<Report>, Error>;

    /// Saving a report that is already saved replaces it.
    async fn put_report(&self, report: &Report) -> Result<(), Error>;

    /// Returns false if there was nothing to remove.
    async fn remove_report(&self, id: &str) -> Result<bool, Error>;

    async fn get_all_reports(&self) -> Result<Vec<Report>, Error>;
}

/// Keeps bookmarks in a single JSON file keyed by report id.
pub struct JsonFileBookmarks {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl JsonFileBookmarks {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<BTreeMap<String, Report>, Error> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Corrupt bookmarks file {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, reports: &BTreeMap<String, Report>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(reports)?;
        tokio::fs::write(&tmp_path, contents).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for JsonFileBookmarks {
    async fn get_report_by_id(&self, id: &str) -> Result<Option<Report>, Error> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(id))
    }

    async fn put_report(&self, report: &Report) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let mut reports = self.read_all().await?;
        reports.insert(report.id.clone(), report.clone());
        self.write_all(&reports).await
    }

    async fn remove_report(&self, id: &str) -> Result<bool, Error> {
        let _guard = self.lock.lock().await;
        let mut reports = self.read_all().await?;
        if reports.remove(id).is_none() {
            return Ok(false);
        }
        self.write_all(&reports).await?;
        Ok(true)
    }

    async fn get_all_reports(&self) -> Result<Vec<Report>, Error> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.into_values().collect())
    }
}
