use std::sync::Arc;

use tokio::sync::OnceCell;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;
use shared_http::JsonClient;

use crate::error::DirectoryError;
use crate::models::{Doctor, DoctorRecord};

/// Read-only view over the remote doctors feed.
///
/// The feed is fetched on first use and kept for the life of the process.
/// A failed fetch is not cached, so the next caller tries again.
pub struct DoctorDirectory {
    client: JsonClient,
    source_url: String,
    doctors: OnceCell<Arc<Vec<Doctor>>>,
}

impl DoctorDirectory {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: JsonClient::new(),
            source_url: config.doctors_api_url.clone(),
            doctors: OnceCell::new(),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Fetch and normalize the feed, bypassing the cache.
    pub async fn fetch_doctors(&self) -> Result<Vec<Doctor>, DirectoryError> {
        debug!("Fetching doctors from {}", self.source_url);

        let records: Vec<Value> = self.client.get_json(&self.source_url).await
            .map_err(|e| {
                error!("Error fetching doctors: {}", e);
                DirectoryError::Fetch(e.to_string())
            })?;

        let doctors = normalize_records(records);
        info!("Loaded {} doctors", doctors.len());

        Ok(doctors)
    }

    /// Cached doctor list, fetched on first call.
    pub async fn doctors(&self) -> Result<Arc<Vec<Doctor>>, DirectoryError> {
        self.doctors
            .get_or_try_init(|| async { self.fetch_doctors().await.map(Arc::new) })
            .await
            .cloned()
    }

    /// Get doctor by ID
    pub async fn get_doctor_by_id(&self, id: &str) -> Result<Doctor, DirectoryError> {
        let doctors = self.doctors().await?;

        doctors.iter()
            .find(|doctor| doctor.id == id)
            .cloned()
            .ok_or_else(|| {
                error!("Error fetching doctor with ID {}: not found", id);
                DirectoryError::NotFound(id.to_string())
            })
    }
}

/// Normalize raw feed entries. An entry that is not a record at all is
/// skipped with a warning; synthetic ids still count it so `doc-N` keeps
/// matching the entry's position in the feed.
pub fn normalize_records(records: Vec<Value>) -> Vec<Doctor> {
    records.into_iter()
        .enumerate()
        .filter_map(|(position, value)| {
            match serde_json::from_value::<DoctorRecord>(value) {
                Ok(record) => Some(record.into_doctor(position)),
                Err(e) => {
                    warn!("Skipping unreadable doctor record at position {}: {}", position, e);
                    None
                }
            }
        })
        .collect()
}
