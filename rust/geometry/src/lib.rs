//! Home Craft Geometry Processing
//!
//! Turns apartment floor-plan polygons into meshes using earcutr
//! triangulation and nalgebra for transformations. Scenes are Z-up: plans
//! live in the X-Y plane and elevation runs along +Z.
//!
//! ```rust,ignore
//! use homecraft_geometry::{align_scene, build_elements, encode_glb, record_metadata, BuildMode};
//!
//! let mut elements = build_elements(record_metadata(&record), BuildMode::Extruded);
//! align_scene(&mut elements);
//! let glb = encode_glb(&elements, &record.apartment_id)?;
//! ```

pub mod alignment;
pub mod error;
pub mod extrusion;
pub mod gltf;
pub mod mesh;
pub mod scene;
pub mod styling;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};

pub use alignment::{align_scene, compute_alignment, AlignmentTransform};
pub use error::{Error, Result};
pub use extrusion::{build_flat_mesh, extrude_ring};
pub use gltf::encode_glb;
pub use mesh::{Aabb, Mesh};
pub use scene::{
    build_elements, element_name, polygons_metadata, record_metadata, scene_bounds, BuildMode,
    ElementMetadata, SceneElement,
};
pub use styling::{plan_layer_offset, style_for, ElementStyle, Rgba};
pub use triangulation::triangulate_polygon;
