// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Home Craft Core
//!
//! Apartment floor-plan dataset handling: the shared data model, a
//! [nom](https://docs.rs/nom)-based WKT polygon parser and a CSV loader that
//! groups rows per apartment.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use homecraft_core::ApartmentDataset;
//!
//! let dataset = ApartmentDataset::from_path("mds_V2_5.372k.csv")?;
//! for id in dataset.apartment_ids(10) {
//!     let record = dataset.apartment(&id).unwrap();
//!     println!("{}: {} elements", id, record.total_elements());
//! }
//! ```
//!
//! The polygon payload returned by [`ApartmentRecord::to_polygons`] is the
//! same structure the viewer consumes over HTTP.

pub mod dataset;
pub mod error;
pub mod model;
pub mod wkt;

pub use dataset::ApartmentDataset;
pub use error::{Error, Result};
pub use model::{
    ApartmentEntity, ApartmentList, ApartmentPolygons, ApartmentRecord, ApartmentStatistics,
    EntityKind, PolygonRecord, Subtype, DEFAULT_ELEVATION, DEFAULT_HEIGHT,
};
pub use wkt::{parse_geometry, Geometry, Polygon};
