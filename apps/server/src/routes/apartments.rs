// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Apartment endpoints.

use crate::error::ApiError;
use crate::services::{render_glb, DiskCache};
use crate::types::{ApartmentResponse, ListQuery};
use crate::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use homecraft_core::{ApartmentList, ApartmentPolygons, ApartmentStatistics};

/// GET /apartments - First `limit` apartment ids in dataset order.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ApartmentList> {
    let limit = query.limit.unwrap_or(state.config.default_list_limit);
    Json(ApartmentList::new(state.dataset.apartment_ids(limit)))
}

/// GET /apartment/:id - Full apartment record.
pub async fn get_apartment(
    State(state): State<AppState>,
    Path(apartment_id): Path<String>,
) -> Result<Json<ApartmentResponse>, ApiError> {
    let record = state.dataset.apartment(&apartment_id)?;
    Ok(Json(record.into()))
}

/// GET /apartment/:id/polygons - Raw polygons for client-side extrusion.
pub async fn get_polygons(
    State(state): State<AppState>,
    Path(apartment_id): Path<String>,
) -> Result<Json<ApartmentPolygons>, ApiError> {
    let record = state.dataset.apartment(&apartment_id)?;
    Ok(Json(record.to_polygons()))
}

/// GET /apartment/:id/stats - Element counts and room types.
pub async fn get_stats(
    State(state): State<AppState>,
    Path(apartment_id): Path<String>,
) -> Result<Json<ApartmentStatistics>, ApiError> {
    Ok(Json(state.dataset.statistics(&apartment_id)?))
}

/// GET|HEAD /apartment/:id/glb - Apartment as a binary glTF model.
///
/// HEAD is answered by the same handler; axum strips the body.
pub async fn get_glb(
    State(state): State<AppState>,
    Path(apartment_id): Path<String>,
) -> Result<Response, ApiError> {
    let record = state.dataset.apartment(&apartment_id)?;
    let cache_key = DiskCache::artifact_key(state.dataset.fingerprint(), "glb", &apartment_id);

    let glb = match state.cache.get_bytes(&cache_key).await? {
        Some(cached) => {
            tracing::info!(apartment_id = %apartment_id, "GLB cache HIT");
            cached
        }
        None => {
            tracing::debug!(apartment_id = %apartment_id, "GLB cache MISS - generating");

            // Extrusion and encoding are CPU-bound
            let glb = tokio::task::spawn_blocking(move || render_glb(&record)).await??;

            let cache = state.cache.clone();
            let data = glb.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.set_bytes(&cache_key, &data).await {
                    tracing::error!(error = %e, "Failed to cache GLB");
                }
            });

            glb
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "model/gltf-binary")
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=apartment_{}.glb", apartment_id),
        )
        .header(header::CONTENT_LENGTH, glb.len())
        .body(Body::from(glb))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
