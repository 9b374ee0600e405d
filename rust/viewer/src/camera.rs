// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arc-rotate camera
//!
//! The camera orbits `target` on a sphere of `radius`. `yaw` is measured in
//! the X-Y plane from +X, `pitch` is the elevation above the ground plane.
//! The world is Z-up.

use crate::picking::Ray;
use crate::state::ViewMode;
use homecraft_geometry::{Aabb, Matrix4, Point3, Vector3};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Pitch never reaches the poles so the Z-up basis stays defined
const POLE_MARGIN: f64 = 1e-3;
/// Perspective field of view (vertical)
pub const PERSPECTIVE_FOV: f64 = FRAC_PI_4;
/// Extra room around the scene when framing
const FRAME_MARGIN: f64 = 1.15;
const DEFAULT_RADIUS: f64 = 10.0;

/// Isometric elevation angle, `atan(1/√2)`
pub fn isometric_pitch() -> f64 {
    (1.0 / 2f64.sqrt()).atan()
}

/// Camera projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective { fov_y: f64 },
    /// Orthographic view volume; half height in world units
    Orthographic { half_height: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Point3<f64>,
    pub yaw: f64,
    pub pitch: f64,
    pub radius: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub projection: Projection,
    /// Viewport width / height
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl OrbitCamera {
    pub fn new(aspect: f64) -> Self {
        Self {
            target: Point3::origin(),
            yaw: -FRAC_PI_2,
            pitch: FRAC_PI_2 - POLE_MARGIN,
            radius: DEFAULT_RADIUS,
            min_radius: 0.1,
            max_radius: 1000.0,
            projection: Projection::Orthographic {
                half_height: DEFAULT_RADIUS * 0.5,
            },
            aspect: sanitize_aspect(aspect),
            near: 0.01,
            far: 10_000.0,
        }
    }

    /// Camera position
    pub fn eye(&self) -> Point3<f64> {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        self.target + Vector3::new(cp * cy, cp * sy, sp) * self.radius
    }

    /// Unit vector from the eye towards the target
    pub fn forward(&self) -> Vector3<f64> {
        (self.target - self.eye()).normalize()
    }

    /// Screen-right and screen-up directions in world space
    fn screen_axes(&self) -> (Vector3<f64>, Vector3<f64>) {
        let forward = self.forward();
        let right = forward
            .cross(&Vector3::z())
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::x);
        let up = right.cross(&forward);
        (right, up)
    }

    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.eye(), &self.target, &Vector3::z())
    }

    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.projection {
            Projection::Perspective { fov_y } => {
                Matrix4::new_perspective(self.aspect, fov_y, self.near, self.far)
            }
            Projection::Orthographic { half_height } => {
                let half_width = half_height * self.aspect;
                Matrix4::new_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Rotate around the target
    pub fn orbit(&mut self, delta_yaw: f64, delta_pitch: f64) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f64::consts::TAU);
        self.pitch = clamp_pitch(self.pitch + delta_pitch);
    }

    /// Move target and eye together along the screen axes (world units)
    pub fn pan(&mut self, right: f64, up: f64) {
        let (r, u) = self.screen_axes();
        self.target += r * right + u * up;
    }

    /// Scale the distance to the target; `factor < 1` moves closer
    pub fn zoom(&mut self, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let radius = (self.radius * factor).clamp(self.min_radius, self.max_radius);
        let applied = radius / self.radius;
        self.radius = radius;
        if let Projection::Orthographic { half_height } = &mut self.projection {
            *half_height *= applied;
        }
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = sanitize_aspect(aspect);
    }

    /// Switch projection and orientation for a view mode
    pub fn configure(&mut self, mode: ViewMode) {
        match mode {
            ViewMode::Plan => {
                self.yaw = -FRAC_PI_2;
                self.pitch = FRAC_PI_2 - POLE_MARGIN;
                self.projection = Projection::Orthographic {
                    half_height: self.radius * 0.5,
                };
            }
            ViewMode::Perspective => {
                self.yaw = -FRAC_PI_2 - FRAC_PI_4;
                self.pitch = FRAC_PI_4;
                self.projection = Projection::Perspective {
                    fov_y: PERSPECTIVE_FOV,
                };
            }
            ViewMode::Isometric => {
                self.yaw = FRAC_PI_4;
                self.pitch = isometric_pitch();
                self.projection = Projection::Orthographic {
                    half_height: self.radius * 0.5,
                };
            }
        }
    }

    /// Configure for `mode` and fit the projection to `bounds`
    pub fn frame(&mut self, bounds: &Aabb, mode: ViewMode) {
        self.configure(mode);

        let (center, half_extent) = if bounds.is_empty() {
            (Point3::origin(), DEFAULT_RADIUS * 0.5)
        } else {
            (bounds.center(), (bounds.diagonal() * 0.5).max(0.5))
        };
        let fit = half_extent * FRAME_MARGIN;

        self.target = center;
        self.min_radius = fit * 0.05;
        self.max_radius = fit * 40.0;
        self.far = fit * 100.0;

        match &mut self.projection {
            Projection::Perspective { fov_y } => {
                self.radius = fit / (*fov_y * 0.5).sin();
            }
            Projection::Orthographic { half_height } => {
                // Far enough back that nothing is clipped by the near plane
                self.radius = fit * 4.0;
                *half_height = if self.aspect < 1.0 {
                    fit / self.aspect
                } else {
                    fit
                };
            }
        }
        self.near = (self.radius - fit * 2.0).max(self.radius * 1e-3);

        tracing::debug!(?mode, radius = self.radius, "Framed camera");
    }

    /// World-space ray through a point in normalized device coordinates
    pub fn ray_from_ndc(&self, ndc_x: f64, ndc_y: f64) -> Option<Ray> {
        let inverse = self.view_projection().try_inverse()?;
        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));
        Ray::new(near, far - near)
    }
}

#[inline]
fn clamp_pitch(pitch: f64) -> f64 {
    pitch.clamp(-FRAC_PI_2 + POLE_MARGIN, FRAC_PI_2 - POLE_MARGIN)
}

#[inline]
fn sanitize_aspect(aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}
