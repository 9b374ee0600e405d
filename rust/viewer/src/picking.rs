// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ray picking against scene meshes
//!
//! Broad phase: slab test against each mesh's bounds. Narrow phase:
//! Möller–Trumbore against every triangle of the surviving meshes. Both are
//! double-sided so flat plan meshes can be hit from either side.

use homecraft_geometry::{Aabb, Mesh, Point3, Vector3};

const PARALLEL_EPSILON: f64 = 1e-12;

/// Half-line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    /// Unit length
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Ray from `origin` towards `direction`; `None` if the direction is zero
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Option<Self> {
        let direction = direction.try_normalize(PARALLEL_EPSILON)?;
        Some(Self { origin, direction })
    }

    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Nearest intersection found by [`pick`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the candidate that was hit
    pub index: usize,
    pub distance: f64,
    pub point: Point3<f64>,
}

/// Slab-method ray/AABB intersection, returns the entry distance
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    if aabb.is_empty() {
        return None;
    }

    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if dir.abs() < PARALLEL_EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

/// Möller–Trumbore ray/triangle intersection, returns the hit distance
pub fn ray_triangle(
    ray: &Ray,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < PARALLEL_EPSILON {
        return None; // ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > PARALLEL_EPSILON).then_some(t)
}

/// Nearest intersection of `ray` with one mesh
pub fn ray_mesh(ray: &Ray, mesh: &Mesh) -> Option<f64> {
    ray_aabb(ray, &mesh.bounds())?;

    mesh.triangles()
        .filter_map(|[a, b, c]| ray_triangle(ray, &a, &b, &c))
        .min_by(|a, b| a.total_cmp(b))
}

/// Nearest hit among indexed candidate meshes
pub fn pick<'a, I>(ray: &Ray, candidates: I) -> Option<Hit>
where
    I: IntoIterator<Item = (usize, &'a Mesh)>,
{
    candidates
        .into_iter()
        .filter_map(|(index, mesh)| {
            ray_mesh(ray, mesh).map(|distance| Hit {
                index,
                distance,
                point: ray.at(distance),
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use homecraft_geometry::{build_flat_mesh, extrude_ring};

    const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];

    fn down_at(x: f64, y: f64) -> Ray {
        Ray::new(Point3::new(x, y, 10.0), -Vector3::z()).unwrap()
    }

    #[test]
    fn test_ray_aabb_slabs() {
        let aabb = Aabb {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(1.0, 1.0, 1.0),
        };
        assert_relative_eq!(ray_aabb(&down_at(0.5, 0.5), &aabb).unwrap(), 9.0);
        assert!(ray_aabb(&down_at(1.5, 0.5), &aabb).is_none());

        let inside = Ray::new(Point3::new(0.5, 0.5, 0.5), Vector3::x()).unwrap();
        assert_relative_eq!(ray_aabb(&inside, &aabb).unwrap(), 0.5);

        let away = Ray::new(Point3::new(0.5, 0.5, 2.0), Vector3::z()).unwrap();
        assert!(ray_aabb(&away, &aabb).is_none());
    }

    #[test]
    fn test_flat_aabb_is_hittable() {
        let mesh = build_flat_mesh(&SQUARE, 0.0);
        assert!(ray_aabb(&down_at(1.0, 1.0), &mesh.bounds()).is_some());
        assert_relative_eq!(ray_mesh(&down_at(1.0, 1.0), &mesh).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_triangle_is_double_sided() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let from_above = down_at(0.2, 0.2);
        let from_below = Ray::new(Point3::new(0.2, 0.2, -3.0), Vector3::z()).unwrap();
        assert!(ray_triangle(&from_above, &a, &b, &c).is_some());
        assert!(ray_triangle(&from_below, &a, &b, &c).is_some());
        assert!(ray_triangle(&down_at(0.8, 0.8), &a, &b, &c).is_none());
    }

    #[test]
    fn test_pick_returns_nearest() {
        let floor = build_flat_mesh(&SQUARE, 0.0);
        let block = extrude_ring(&SQUARE, 0.0, 2.5);
        let hit = pick(&down_at(1.0, 1.0), [(0, &floor), (1, &block)]).unwrap();
        assert_eq!(hit.index, 1);
        assert_relative_eq!(hit.distance, 7.5, epsilon = 1e-6);
        assert_relative_eq!(hit.point.z, 2.5, epsilon = 1e-6);

        assert!(pick(&down_at(5.0, 5.0), [(0, &floor), (1, &block)]).is_none());
    }

    #[test]
    fn test_zero_direction_is_rejected() {
        assert!(Ray::new(Point3::origin(), Vector3::zeros()).is_none());
    }
}
