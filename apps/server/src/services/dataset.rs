// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Apartment dataset loaded once at startup.

use super::cache::DiskCache;
use crate::error::ApiError;
use homecraft_core::{ApartmentDataset, ApartmentRecord, ApartmentStatistics};
use std::path::Path;
use std::time::Instant;

/// Read-only dataset plus a fingerprint of its source bytes.
#[derive(Debug)]
pub struct DatasetService {
    dataset: ApartmentDataset,
    fingerprint: String,
}

impl DatasetService {
    /// Parse a dataset from CSV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ApiError> {
        let fingerprint = DiskCache::generate_key(bytes);
        let dataset = ApartmentDataset::from_reader(bytes)?;
        Ok(Self {
            dataset,
            fingerprint,
        })
    }

    /// Load the CSV at `path` on the blocking thread pool.
    pub async fn load(path: &str) -> Result<Self, ApiError> {
        let path = path.to_string();
        let start = Instant::now();

        let service = tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(Path::new(&path))
                .map_err(|e| ApiError::Dataset(homecraft_core::Error::Io(e)))?;
            Self::from_bytes(&bytes)
        })
        .await??;

        tracing::info!(
            rows = service.dataset.row_count(),
            skipped = service.dataset.skipped_rows(),
            apartments = service.dataset.apartment_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Dataset loaded"
        );

        Ok(service)
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn apartment_ids(&self, limit: usize) -> Vec<String> {
        self.dataset.apartment_ids(limit)
    }

    pub fn apartment(&self, apartment_id: &str) -> Result<ApartmentRecord, ApiError> {
        self.dataset
            .apartment(apartment_id)
            .ok_or_else(|| ApiError::NotFound(apartment_id.to_string()))
    }

    pub fn statistics(&self, apartment_id: &str) -> Result<ApartmentStatistics, ApiError> {
        self.dataset
            .statistics(apartment_id)
            .ok_or_else(|| ApiError::NotFound(apartment_id.to_string()))
    }
}
