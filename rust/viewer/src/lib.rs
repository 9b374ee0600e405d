// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Home Craft Viewer
//!
//! Rendering-agnostic core of the apartment viewer. It owns the scene for
//! one apartment, switches between plan, perspective and isometric views,
//! filters element categories, answers pointer picks and produces a draw
//! list with camera matrices for every frame. Drawing is left to the host.
//!
//! ```rust,ignore
//! use homecraft_viewer::{load_apartment, HttpApartmentSource, ViewMode, Viewer};
//!
//! let source = HttpApartmentSource::new("http://localhost:8000")?;
//! let mut viewer = Viewer::new(16.0 / 9.0);
//! load_apartment(&mut viewer, &source, "apt-1").await?;
//! viewer.set_view_mode(ViewMode::Perspective);
//! if let Some(frame) = viewer.render_frame() {
//!     // hand frame.items to the renderer
//! }
//! ```

pub mod camera;
pub mod error;
pub mod loader;
pub mod picking;
pub mod state;

pub use camera::{OrbitCamera, Projection};
pub use error::{Result, ViewerError};
pub use loader::{
    list_apartments, load_apartment, ApartmentSource, CancellationToken, HttpApartmentSource,
    LoadOutcome,
};
pub use picking::{pick, Hit, Ray};
pub use state::{
    ApartmentSnapshot, DrawItem, Frame, Helper, HelperKind, SceneNode, Selection, Toggle,
    ViewMode, Viewer, Visibility,
};
