// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loader behaviour against an in-memory apartment source.

use homecraft_core::{ApartmentList, ApartmentPolygons, PolygonRecord, Subtype};
use homecraft_viewer::{
    list_apartments, load_apartment, ApartmentSource, CancellationToken, LoadOutcome, Result,
    ViewMode, Viewer, ViewerError,
};
use std::cell::Cell;

#[derive(Default)]
struct FakeSource {
    fail_with_status: Option<u16>,
    empty: bool,
    /// Cancelled while the "request" is in flight
    cancel_during_fetch: Option<CancellationToken>,
    calls: Cell<usize>,
}

fn record(coords: Vec<[f64; 2]>, subtype: Subtype) -> PolygonRecord {
    PolygonRecord {
        coordinates: coords,
        elevation: 0.0,
        height: 2.6,
        subtype,
        id: None,
        roomtype: None,
        zoning: None,
    }
}

fn apartment(id: &str) -> ApartmentPolygons {
    ApartmentPolygons {
        apartment_id: id.to_string(),
        areas: vec![
            record(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0]], Subtype::Bedroom),
            record(vec![[4.0, 0.0], [6.0, 0.0], [6.0, 3.0], [4.0, 3.0]], Subtype::Bathroom),
        ],
        separators: vec![record(
            vec![[0.0, -0.2], [6.0, -0.2], [6.0, 0.0], [0.0, 0.0]],
            Subtype::Wall,
        )],
        openings: vec![record(
            vec![[1.0, -0.2], [2.0, -0.2], [2.0, 0.0], [1.0, 0.0]],
            Subtype::Door,
        )],
    }
}

impl FakeSource {
    fn respond<T>(&self, value: T) -> Result<T> {
        self.calls.set(self.calls.get() + 1);
        if let Some(token) = &self.cancel_during_fetch {
            token.cancel();
        }
        match self.fail_with_status {
            Some(status) => Err(ViewerError::Status {
                status,
                url: "http://test/apartment".into(),
            }),
            None => Ok(value),
        }
    }
}

impl ApartmentSource for FakeSource {
    async fn list_apartments(&self, limit: usize) -> Result<ApartmentList> {
        let ids = ["apt-1", "apt-2", "apt-3"]
            .iter()
            .take(limit)
            .map(|s| s.to_string())
            .collect();
        self.respond(ApartmentList::new(ids))
    }

    async fn fetch_polygons(&self, apartment_id: &str) -> Result<ApartmentPolygons> {
        let mut polygons = apartment(apartment_id);
        if self.empty {
            polygons.areas.clear();
            polygons.separators.clear();
            polygons.openings.clear();
        }
        self.respond(polygons)
    }
}

#[tokio::test]
async fn loads_into_viewer() {
    let mut viewer = Viewer::new(1.0);
    let source = FakeSource::default();

    let outcome = load_apartment(&mut viewer, &source, "apt-1").await.unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded(4));
    assert_eq!(viewer.mesh_count(), 4);
    assert_eq!(viewer.snapshot().unwrap().apartment_id(), "apt-1");
    assert!(viewer.error_banner().is_none());
    assert!(viewer.render_frame().is_some());
}

#[tokio::test]
async fn http_error_sets_banner() {
    let mut viewer = Viewer::new(1.0);
    let source = FakeSource {
        fail_with_status: Some(404),
        ..Default::default()
    };

    let err = load_apartment(&mut viewer, &source, "missing").await.unwrap_err();
    assert!(matches!(err, ViewerError::Status { status: 404, .. }));
    assert!(viewer.error_banner().unwrap().contains("404"));
    assert_eq!(viewer.mesh_count(), 0);
}

#[tokio::test]
async fn empty_apartment_is_an_error() {
    let mut viewer = Viewer::new(1.0);
    let source = FakeSource {
        empty: true,
        ..Default::default()
    };

    let err = load_apartment(&mut viewer, &source, "apt-1").await.unwrap_err();
    assert!(matches!(err, ViewerError::EmptyApartment(_)));
    assert!(viewer.error_banner().is_some());
}

#[tokio::test]
async fn teardown_during_fetch_discards_result() {
    let mut viewer = Viewer::new(1.0);
    let source = FakeSource {
        cancel_during_fetch: Some(viewer.cancellation_token()),
        ..Default::default()
    };

    let outcome = load_apartment(&mut viewer, &source, "apt-1").await.unwrap();
    assert!(outcome.is_cancelled());
    assert_eq!(viewer.mesh_count(), 0);
    assert!(viewer.snapshot().is_none());
}

#[tokio::test]
async fn teardown_during_failing_fetch_is_silent() {
    let mut viewer = Viewer::new(1.0);
    let source = FakeSource {
        fail_with_status: Some(500),
        cancel_during_fetch: Some(viewer.cancellation_token()),
        ..Default::default()
    };

    let outcome = load_apartment(&mut viewer, &source, "apt-1").await.unwrap();
    assert_eq!(outcome, LoadOutcome::Cancelled);
    assert!(viewer.error_banner().is_none());
}

#[tokio::test]
async fn disposed_viewer_does_not_fetch() {
    let mut viewer = Viewer::new(1.0);
    viewer.dispose();
    let source = FakeSource::default();

    let outcome = load_apartment(&mut viewer, &source, "apt-1").await.unwrap();
    assert!(outcome.is_cancelled());
    assert_eq!(source.calls.get(), 0);
    assert!(viewer.render_frame().is_none());
}

#[tokio::test]
async fn reload_after_mode_switch_keeps_mode() {
    let mut viewer = Viewer::new(1.0);
    let source = FakeSource::default();

    load_apartment(&mut viewer, &source, "apt-1").await.unwrap();
    viewer.set_view_mode(ViewMode::Perspective);
    load_apartment(&mut viewer, &source, "apt-2").await.unwrap();

    assert_eq!(viewer.mode(), ViewMode::Perspective);
    assert!(viewer.nodes().iter().all(|n| !n.element.double_sided));
    assert_eq!(viewer.snapshot().unwrap().apartment_id(), "apt-2");
}

#[tokio::test]
async fn lists_apartment_ids() {
    let mut viewer = Viewer::new(1.0);
    let source = FakeSource::default();

    match list_apartments(&mut viewer, &source, 2).await.unwrap() {
        LoadOutcome::Loaded(list) => {
            assert_eq!(list.apartment_ids, vec!["apt-1", "apt-2"]);
            assert_eq!(list.total, 2);
        }
        LoadOutcome::Cancelled => panic!("listing was not cancelled"),
    }
}
