// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Apartment loading with cooperative cancellation
//!
//! Network fetches are the only suspension points. After each one the
//! viewer's [`CancellationToken`] is checked; a viewer torn down while a
//! request was in flight never sees its result.

use crate::error::{Result, ViewerError};
use crate::state::{ApartmentSnapshot, Viewer};
use homecraft_core::{ApartmentList, ApartmentPolygons};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Token to cancel in-flight loads
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Build a new token, initially not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark this token and all its clones as cancelled
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a load that was not an error
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Loaded(T),
    /// The viewer went away while waiting; the result was dropped
    Cancelled,
}

impl<T> LoadOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoadOutcome::Cancelled)
    }
}

/// Where apartment payloads come from
#[allow(async_fn_in_trait)]
pub trait ApartmentSource {
    async fn list_apartments(&self, limit: usize) -> Result<ApartmentList>;

    async fn fetch_polygons(&self, apartment_id: &str) -> Result<ApartmentPolygons>;
}

/// [`ApartmentSource`] backed by the REST API
#[derive(Debug, Clone)]
pub struct HttpApartmentSource {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpApartmentSource {
    /// Client for the API rooted at `base_url`, which may carry a path prefix
    pub fn new(base_url: &str) -> Result<Self> {
        let invalid = |reason: String| ViewerError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a base URL".into()));
        }

        Ok(Self {
            base_url: parsed,
            http: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL plus `segments`, each percent-encoded as one path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ViewerError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a base URL".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let resp = self.http.get(url.clone()).send().await?;

        if !resp.status().is_success() {
            return Err(ViewerError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl ApartmentSource for HttpApartmentSource {
    async fn list_apartments(&self, limit: usize) -> Result<ApartmentList> {
        let mut url = self.endpoint(&["apartments"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    async fn fetch_polygons(&self, apartment_id: &str) -> Result<ApartmentPolygons> {
        let url = self.endpoint(&["apartment", apartment_id, "polygons"])?;
        self.get_json(url).await
    }
}

/// Fetch an apartment and show it in `viewer`
///
/// Failures go to the viewer's error banner and are returned. Cancelling
/// the viewer's token during the fetch (teardown does) yields
/// [`LoadOutcome::Cancelled`] and leaves the viewer untouched.
pub async fn load_apartment<S: ApartmentSource>(
    viewer: &mut Viewer,
    source: &S,
    apartment_id: &str,
) -> Result<LoadOutcome<usize>> {
    let token = viewer.cancellation_token();
    if token.is_cancelled() {
        return Ok(LoadOutcome::Cancelled);
    }

    let fetched = source.fetch_polygons(apartment_id).await;
    if token.is_cancelled() {
        tracing::debug!(apartment_id, "Load cancelled, discarding result");
        return Ok(LoadOutcome::Cancelled);
    }

    let polygons = match fetched {
        Ok(polygons) if polygons.is_empty() => {
            Err(ViewerError::EmptyApartment(apartment_id.to_string()))
        }
        other => other,
    };

    match polygons {
        Ok(polygons) => {
            viewer.set_snapshot(ApartmentSnapshot::new(polygons));
            Ok(LoadOutcome::Loaded(viewer.mesh_count()))
        }
        Err(e) => {
            viewer.set_error(e.to_string());
            Err(e)
        }
    }
}

/// List apartment ids, honoring cancellation like [`load_apartment`]
pub async fn list_apartments<S: ApartmentSource>(
    viewer: &mut Viewer,
    source: &S,
    limit: usize,
) -> Result<LoadOutcome<ApartmentList>> {
    let token = viewer.cancellation_token();
    if token.is_cancelled() {
        return Ok(LoadOutcome::Cancelled);
    }

    let listed = source.list_apartments(limit).await;
    if token.is_cancelled() {
        return Ok(LoadOutcome::Cancelled);
    }

    match listed {
        Ok(list) => Ok(LoadOutcome::Loaded(list)),
        Err(e) => {
            viewer.set_error(e.to_string());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let root = HttpApartmentSource::new("http://localhost:8000/").unwrap();
        assert_eq!(
            root.endpoint(&["apartment", "apt-1", "polygons"]).unwrap().as_str(),
            "http://localhost:8000/apartment/apt-1/polygons"
        );

        let prefixed = HttpApartmentSource::new("http://localhost:8000/api/").unwrap();
        assert_eq!(
            prefixed.endpoint(&["apartments"]).unwrap().as_str(),
            "http://localhost:8000/api/apartments"
        );
    }

    #[test]
    fn test_apartment_ids_are_percent_encoded() {
        let source = HttpApartmentSource::new("http://localhost:8000").unwrap();
        let url = source
            .endpoint(&["apartment", "a/b c#1?x", "polygons"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/apartment/a%2Fb%20c%231%3Fx/polygons"
        );
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(matches!(
            HttpApartmentSource::new("not a url"),
            Err(ViewerError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpApartmentSource::new("mailto:viewer@example.com"),
            Err(ViewerError::InvalidUrl { .. })
        ));
    }
}
