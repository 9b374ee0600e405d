// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check and service information endpoints.

use axum::Json;
use serde::Serialize;

const SERVICE: &str = "homecraft-server";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: SERVICE,
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    let endpoint = |method: &'static str, path: &'static str, description: &'static str| EndpointInfo {
        method,
        path,
        description,
    };

    Json(ApiInfoResponse {
        service: SERVICE,
        version: env!("CARGO_PKG_VERSION"),
        description: "Apartment floor-plan geometry service",
        endpoints: vec![
            endpoint("GET", "/api/v1/health", "Health check endpoint"),
            endpoint("GET", "/apartments", "List apartment ids (?limit=N)"),
            endpoint("GET", "/apartment/{id}", "Apartment record as JSON"),
            endpoint("GET", "/apartment/{id}/polygons", "Raw polygons for client-side extrusion"),
            endpoint("GET", "/apartment/{id}/glb", "Apartment as a GLB 3D model"),
            endpoint("GET", "/apartment/{id}/stats", "Element counts and room types"),
        ],
    })
}
