// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use homecraft_core::ApartmentRecord;
use serde::{Deserialize, Serialize};

/// Full apartment record (`GET /apartment/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApartmentResponse {
    #[serde(flatten)]
    pub record: ApartmentRecord,
    /// Number of areas, separators and openings.
    pub total_elements: usize,
}

impl From<ApartmentRecord> for ApartmentResponse {
    fn from(record: ApartmentRecord) -> Self {
        let total_elements = record.total_elements();
        Self {
            record,
            total_elements,
        }
    }
}
