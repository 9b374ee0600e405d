// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Apartment to GLB conversion.

use homecraft_core::ApartmentRecord;
use homecraft_geometry::{align_scene, build_elements, encode_glb, record_metadata, BuildMode};
use std::time::Instant;

/// Extrude, align and encode every element of an apartment.
pub fn render_glb(record: &ApartmentRecord) -> homecraft_geometry::Result<Vec<u8>> {
    let start = Instant::now();

    let mut elements = build_elements(record_metadata(record), BuildMode::Extruded);
    let alignment = align_scene(&mut elements);
    let glb = encode_glb(&elements, &record.apartment_id)?;

    tracing::info!(
        apartment_id = %record.apartment_id,
        elements = elements.len(),
        rotation_deg = alignment.rotation.to_degrees(),
        bytes = glb.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Generated GLB"
    );

    Ok(glb)
}
