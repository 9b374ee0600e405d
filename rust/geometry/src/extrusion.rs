// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat and extruded meshes from floor-plan rings
//!
//! Rings live in the X-Y plane; Z is up. Both builders are infallible: a ring
//! that cannot be meshed produces an empty [`Mesh`] and a warning so the rest
//! of an apartment still renders.

use crate::mesh::Mesh;
use crate::triangulation::{
    fan_triangulate, orient_counter_clockwise, signed_area2, triangulate_polygon,
};
use nalgebra::{Point2, Point3, Vector3};

/// Points closer than this are treated as duplicates
const DUPLICATE_EPSILON: f64 = 1e-9;

/// Convert source coordinates into a clean counter-clockwise ring
///
/// Drops the closing vertex of a closed ring and consecutive duplicates.
pub fn prepare_ring(coordinates: &[[f64; 2]]) -> Vec<Point2<f64>> {
    let mut ring: Vec<Point2<f64>> = Vec::with_capacity(coordinates.len());

    for c in coordinates {
        let p = Point2::new(c[0], c[1]);
        if let Some(last) = ring.last() {
            if (p - *last).norm() <= DUPLICATE_EPSILON {
                continue;
            }
        }
        ring.push(p);
    }

    while ring.len() > 1 {
        let closing = (ring[0] - ring[ring.len() - 1]).norm() <= DUPLICATE_EPSILON;
        if !closing {
            break;
        }
        ring.pop();
    }

    if signed_area2(&ring) < 0.0 {
        ring.reverse();
    }

    ring
}

/// Triangulate a prepared ring, falling back to a fan when earcut gives up
fn cap_indices(ring: &[Point2<f64>]) -> Vec<usize> {
    let mut indices = match triangulate_polygon(ring) {
        Ok(indices) => indices,
        Err(e) => {
            tracing::warn!(points = ring.len(), error = %e, "Falling back to fan triangulation");
            fan_triangulate(ring.len())
        }
    };
    orient_counter_clockwise(ring, &mut indices);
    indices
}

/// Mesh a ring as a flat polygon at height `z`
///
/// One vertex per ring point, all normals +Z. The caller renders it
/// double-sided.
pub fn build_flat_mesh(coordinates: &[[f64; 2]], z: f64) -> Mesh {
    let ring = prepare_ring(coordinates);
    if ring.len() < 3 {
        tracing::warn!(points = ring.len(), "Degenerate polygon, emitting empty mesh");
        return Mesh::new();
    }

    let indices = cap_indices(&ring);
    let mut mesh = Mesh::with_capacity(ring.len(), indices.len());
    let up = Vector3::z();

    for p in &ring {
        mesh.add_vertex(Point3::new(p.x, p.y, z), up);
    }
    for tri in indices.chunks_exact(3) {
        mesh.add_triangle(tri[0] as u32, tri[1] as u32, tri[2] as u32);
    }

    mesh
}

/// Extrude a ring into a closed prism from `elevation` to `elevation + height`
///
/// Vertices `0..n` form the bottom ring and `n..2n` the top ring. The
/// bottom cap is wound clockwise seen from above so it faces down; each edge
/// contributes two side triangles. Normals come from the final topology.
///
/// A negative height extrudes downward from `elevation`. A zero height still
/// yields the full prism with coincident caps.
pub fn extrude_ring(coordinates: &[[f64; 2]], elevation: f64, height: f64) -> Mesh {
    let ring = prepare_ring(coordinates);
    if ring.len() < 3 {
        tracing::warn!(points = ring.len(), "Degenerate polygon, emitting empty mesh");
        return Mesh::new();
    }
    if !(elevation.is_finite() && height.is_finite()) {
        tracing::warn!(elevation, height, "Non-finite extrusion range, emitting empty mesh");
        return Mesh::new();
    }

    let n = ring.len();
    let indices = cap_indices(&ring);
    let (bottom, top) = if height < 0.0 {
        (elevation + height, elevation)
    } else {
        (elevation, elevation + height)
    };

    let mut mesh = Mesh::with_capacity(n * 2, indices.len() * 2 + n * 6);

    for p in &ring {
        mesh.add_vertex(Point3::new(p.x, p.y, bottom), Vector3::zeros());
    }
    for p in &ring {
        mesh.add_vertex(Point3::new(p.x, p.y, top), Vector3::zeros());
    }

    let n32 = n as u32;

    // Bottom cap, reversed
    for tri in indices.chunks_exact(3) {
        mesh.add_triangle(tri[0] as u32, tri[2] as u32, tri[1] as u32);
    }

    // Top cap
    for tri in indices.chunks_exact(3) {
        mesh.add_triangle(n32 + tri[0] as u32, n32 + tri[1] as u32, n32 + tri[2] as u32);
    }

    // Side walls
    for i in 0..n32 {
        let j = (i + 1) % n32;
        mesh.add_triangle(i, j, n32 + j);
        mesh.add_triangle(i, n32 + j, n32 + i);
    }

    mesh.compute_vertex_normals();
    mesh
}
