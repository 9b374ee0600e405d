// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSV apartment dataset
//!
//! Rows are grouped by `apartment_id` at load time. Geometry is decoded
//! lazily when an apartment is requested, so one malformed WKT cell only
//! drops its own row.

use crate::error::{Error, Result};
use crate::model::{
    ApartmentEntity, ApartmentRecord, ApartmentStatistics, EntityKind, Subtype, DEFAULT_ELEVATION,
    DEFAULT_HEIGHT,
};
use crate::wkt::parse_geometry;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Columns that must be present in the header
const REQUIRED_COLUMNS: [&str; 3] = ["apartment_id", "entity_type", "geom"];

/// One raw CSV row; extra columns are ignored
#[derive(Debug, Clone, Deserialize)]
struct DatasetRow {
    apartment_id: Option<String>,
    entity_type: Option<String>,
    entity_subtype: Option<String>,
    geom: Option<String>,
    elevation: Option<f64>,
    height: Option<f64>,
    zoning: Option<String>,
    roomtype: Option<String>,
    area_id: Option<f64>,
    unit_id: Option<f64>,
}

/// In-memory apartment dataset
#[derive(Debug, Default)]
pub struct ApartmentDataset {
    /// Distinct apartment ids in first-seen order
    ids: Vec<String>,
    rows: FxHashMap<String, Vec<DatasetRow>>,
    row_count: usize,
    skipped_rows: usize,
}

impl ApartmentDataset {
    /// Load a dataset from a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading apartment dataset");
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a dataset from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::MissingColumn(column));
            }
        }

        let mut dataset = Self::default();

        for (line, result) in csv_reader.deserialize::<DatasetRow>().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!(line = line + 2, error = %e, "Skipping unreadable row");
                    dataset.skipped_rows += 1;
                    continue;
                }
            };

            let Some(apartment_id) = row.apartment_id.clone().filter(|id| !id.is_empty()) else {
                dataset.skipped_rows += 1;
                continue;
            };

            dataset.row_count += 1;
            match dataset.rows.get_mut(&apartment_id) {
                Some(rows) => rows.push(row),
                None => {
                    dataset.ids.push(apartment_id.clone());
                    dataset.rows.insert(apartment_id, vec![row]);
                }
            }
        }

        tracing::info!(
            rows = dataset.row_count,
            skipped = dataset.skipped_rows,
            apartments = dataset.ids.len(),
            "Loaded apartment dataset"
        );

        Ok(dataset)
    }

    /// Number of rows with an apartment id
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of rows dropped while loading
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn apartment_count(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, apartment_id: &str) -> bool {
        self.rows.contains_key(apartment_id)
    }

    /// First `limit` distinct apartment ids, in dataset order
    pub fn apartment_ids(&self, limit: usize) -> Vec<String> {
        self.ids.iter().take(limit).cloned().collect()
    }

    /// Decode all entities of one apartment
    ///
    /// Returns `None` for an unknown id. Rows with unreadable geometry or an
    /// unknown entity type are skipped.
    pub fn apartment(&self, apartment_id: &str) -> Option<ApartmentRecord> {
        let rows = self.rows.get(apartment_id)?;
        let mut record = ApartmentRecord::new(apartment_id);

        for row in rows {
            match decode_row(row) {
                Ok(Some(entity)) => record.push(entity),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(apartment_id = %apartment_id, error = %e, "Error parsing row");
                }
            }
        }

        Some(record)
    }

    pub fn statistics(&self, apartment_id: &str) -> Option<ApartmentStatistics> {
        self.apartment(apartment_id).map(|record| record.statistics())
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn decode_row(row: &DatasetRow) -> Result<Option<ApartmentEntity>> {
    let Some(kind) = row.entity_type.as_deref().and_then(EntityKind::parse) else {
        return Ok(None);
    };

    let geometry = parse_geometry(row.geom.as_deref().unwrap_or_default())?;

    Ok(Some(ApartmentEntity {
        entity_type: kind,
        entity_subtype: Subtype::parse(row.entity_subtype.as_deref().unwrap_or_default()),
        coordinates: geometry.exterior_coords(),
        elevation: row.elevation.unwrap_or(DEFAULT_ELEVATION),
        height: row.height.unwrap_or(DEFAULT_HEIGHT),
        zoning: non_empty(&row.zoning),
        roomtype: non_empty(&row.roomtype),
        area_id: row.area_id.map(|id| id as i64),
        unit_id: row.unit_id.map(|id| id as i64),
    }))
}
