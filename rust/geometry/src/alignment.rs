// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene auto-alignment
//!
//! One rigid transform per apartment: a rotation about +Z that puts the
//! dominant wall direction on a coordinate axis, followed by a translation
//! that centers the rotated bounds horizontally and grounds them at Z = 0.

use crate::extrusion::prepare_ring;
use crate::mesh::Aabb;
use crate::scene::SceneElement;
use homecraft_core::EntityKind;
use nalgebra::{Matrix4, Vector3};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Edges shorter than this carry no direction
const MIN_EDGE_LENGTH: f64 = 1e-9;

/// Rotation about +Z followed by a translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentTransform {
    /// Radians, counter-clockwise seen from above
    pub rotation: f64,
    pub translation: Vector3<f64>,
}

impl AlignmentTransform {
    pub fn identity() -> Self {
        Self {
            rotation: 0.0,
            translation: Vector3::zeros(),
        }
    }

    pub fn rotation_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_rotation(Vector3::z() * self.rotation)
    }

    /// `T * R`
    pub fn to_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.translation) * self.rotation_matrix()
    }
}

impl Default for AlignmentTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Fold an angle into `[-45°, 45°)`
///
/// Walls at right angles to each other share a folded angle.
#[inline]
pub fn normalize_quarter_turn(angle: f64) -> f64 {
    (angle + FRAC_PI_4).rem_euclid(FRAC_PI_2) - FRAC_PI_4
}

/// Folded direction of every non-degenerate separator edge
///
/// Rings are walked cyclically, so an open ring still contributes its
/// closing edge.
pub fn wall_edge_angles(elements: &[SceneElement]) -> Vec<f64> {
    let mut angles = Vec::new();

    for element in elements.iter().filter(|e| e.kind() == EntityKind::Separator) {
        let ring = prepare_ring(&element.metadata.coordinates);
        let n = ring.len();
        let edges = if n < 3 { n.saturating_sub(1) } else { n };

        for i in 0..edges {
            let d = ring[(i + 1) % n] - ring[i];
            if d.norm() <= MIN_EDGE_LENGTH {
                continue;
            }
            angles.push(normalize_quarter_turn(d.y.atan2(d.x)));
        }
    }

    angles
}

/// Upper median of the folded wall angles
pub fn dominant_wall_angle(angles: &[f64]) -> Option<f64> {
    if angles.is_empty() {
        return None;
    }
    let mut sorted = angles.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(sorted[sorted.len() / 2])
}

fn bounds_under(elements: &[SceneElement], transform: &Matrix4<f64>) -> Aabb {
    elements
        .iter()
        .filter(|e| !e.mesh.is_empty())
        .fold(Aabb::empty(), |acc, e| {
            acc.union(&e.mesh.transformed_bounds(transform))
        })
}

/// Compute the alignment of a scene without modifying it
pub fn compute_alignment(elements: &[SceneElement]) -> AlignmentTransform {
    let angles = wall_edge_angles(elements);

    let rotation = match dominant_wall_angle(&angles) {
        Some(angle) => -angle,
        None => {
            let extent = bounds_under(elements, &Matrix4::identity()).extent();
            if extent.y > extent.x {
                FRAC_PI_2
            } else {
                0.0
            }
        }
    };

    let mut transform = AlignmentTransform {
        rotation,
        translation: Vector3::zeros(),
    };

    // Bounds must be measured after rotating
    let rotated = bounds_under(elements, &transform.rotation_matrix());
    if !rotated.is_empty() {
        let center = rotated.center();
        transform.translation = Vector3::new(-center.x, -center.y, -rotated.min.z);
    }

    tracing::debug!(
        rotation_deg = rotation.to_degrees(),
        wall_edges = angles.len(),
        "Computed scene alignment"
    );

    transform
}

/// Align a scene in place and return the transform that was applied
pub fn align_scene(elements: &mut [SceneElement]) -> AlignmentTransform {
    let transform = compute_alignment(elements);
    let matrix = transform.to_matrix();
    for element in elements.iter_mut() {
        element.mesh.apply_transform(&matrix);
    }
    transform
}
