//! Typed operations on journal entries and general values.

use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;

use super::{ApiClient, ApiError};
use crate::models::{CreateGratitudeEntryDto, GeneralValues, GratitudeEntry, ValueOptions};

impl ApiClient {
    /// Fetch all entries of the signed-in user
    pub async fn list_entries(&self) -> Result<Vec<GratitudeEntry>> {
        let entries: Vec<GratitudeEntry> = self.get("/entries").await?;
        debug!("Fetched {} entries", entries.len());
        Ok(entries)
    }

    pub async fn create_entry(&self, entry: &CreateGratitudeEntryDto) -> Result<GratitudeEntry> {
        self.post("/entries", entry).await
    }

    pub async fn get_entry(&self, id: &str) -> Result<GratitudeEntry> {
        self.get(&format!("/entries/{}", id)).await
    }

    pub async fn delete_entry(&self, id: &str) -> Result<()> {
        self.delete(&format!("/entries/{}", id)).await
    }

    /// Fetch the entry written for `date`, or `None` when that day is empty
    pub async fn get_entry_by_date(&self, date: NaiveDate) -> Result<Option<GratitudeEntry>> {
        let path = format!("/entries/date/{}", date.format("%Y-%m-%d"));
        match self.get(&path).await {
            Ok(entry) => Ok(Some(entry)),
            Err(e) if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_not_found) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch the configurable value lists (emotions, habits)
    pub async fn general_values(&self) -> Result<Vec<GeneralValues>> {
        self.get("/general-values").await
    }

    /// Fetch the value lists already split per category
    pub async fn value_options(&self) -> Result<ValueOptions> {
        let values = self.general_values().await?;
        Ok(ValueOptions::from_general_values(&values))
    }
}
