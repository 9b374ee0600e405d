// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Errors surfaced to the viewer's error banner
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid apartment payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Invalid API base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Apartment {0} has no renderable elements")]
    EmptyApartment(String),
}
