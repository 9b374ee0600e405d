// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service modules for dataset access, GLB conversion and caching.

pub mod cache;
pub mod dataset;
pub mod glb;

pub use cache::DiskCache;
pub use dataset::DatasetService;
pub use glb::render_glb;
