//! Orthographic projection of the flight's point cloud onto the screen plane.
//!
//! Positions are first normalised into the unit cube `[-0.5, 0.5]³` using the
//! per-axis bounds of the data, so degrees of longitude and metres of altitude
//! get the same visual weight. The cube is then rotated by the camera's yaw
//! (around the vertical axis) and pitch (tilt towards the viewer) and the
//! depth coordinate is dropped.

use glam::{DMat3, DVec2, DVec3};

/// Per-axis extent of a set of `[x, y, z]` points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds {
    /// Bounds of the finite points. `None` when there are none.
    pub fn from_points<I>(points: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = DVec3>,
    {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<Bounds>, p| {
                Some(match acc {
                    Some(b) => Bounds {
                        min: b.min.min(p),
                        max: b.max.max(p),
                    },
                    None => Bounds { min: p, max: p },
                })
            })
    }

    /// Map a point into `[-0.5, 0.5]` per axis. Flat axes collapse to 0.
    pub fn normalize(&self, p: DVec3) -> DVec3 {
        let span = self.max - self.min;
        let flat = span.abs().cmplt(DVec3::splat(f64::EPSILON));
        let scaled = (p - self.min) / span - DVec3::splat(0.5);
        DVec3::select(flat, DVec3::ZERO, scaled)
    }
}

const MAX_PITCH: f64 = 89.0_f64 * std::f64::consts::PI / 180.0;

/// Viewing angles for the 3D scene, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub yaw: f64,
    pub pitch: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            yaw: -35f64.to_radians(),
            pitch: 25f64.to_radians(),
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Apply a mouse drag (pixels) to the view angles.
    pub fn rotate(&mut self, drag: DVec2) {
        const RADIANS_PER_PIXEL: f64 = 0.01;
        self.yaw = (self.yaw + drag.x * RADIANS_PER_PIXEL).rem_euclid(std::f64::consts::TAU);
        self.pitch = (self.pitch + drag.y * RADIANS_PER_PIXEL).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = (self.zoom * factor).clamp(0.2, 10.0);
        }
    }

    /// Yaw around the vertical (altitude) axis, then tilt by pitch.
    pub fn view(&self) -> DMat3 {
        DMat3::from_rotation_x(self.pitch) * DMat3::from_rotation_z(self.yaw)
    }

    /// Project a normalised point to screen-plane `[x, y]` (y up).
    pub fn project(&self, p: DVec3) -> DVec2 {
        let r = self.view() * p;
        DVec2::new(r.x, r.z) * self.zoom
    }
}

/// Project sampled positions for display, keeping each point's row index.
/// Points with a non-finite coordinate are dropped.
pub fn project_positions<I>(points: I, bounds: &Bounds, camera: &Camera) -> Vec<(usize, DVec2)>
where
    I: IntoIterator<Item = (usize, DVec3)>,
{
    let view = camera.view();
    points
        .into_iter()
        .filter(|(_, p)| p.is_finite())
        .map(|(row, p)| {
            let r = view * bounds.normalize(p);
            (row, DVec2::new(r.x, r.z) * camera.zoom)
        })
        .collect()
}

/// Index in `points` of the projected point closest to `target`, if any lies
/// within `max_distance` (plot units).
pub fn nearest_within(points: &[(usize, DVec2)], target: DVec2, max_distance: f64) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, (_, p))| (i, p.distance_squared(target)))
        .filter(|(_, d2)| *d2 <= max_distance * max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// The twelve edges of the normalised cube, as pairs of corners.
pub fn cube_edges() -> Vec<(DVec3, DVec3)> {
    let corner = |i: usize| {
        DVec3::new(
            if i & 1 == 0 { -0.5 } else { 0.5 },
            if i & 2 == 0 { -0.5 } else { 0.5 },
            if i & 4 == 0 { -0.5 } else { 0.5 },
        )
    };
    let mut edges = Vec::with_capacity(12);
    for a in 0..8usize {
        for bit in [1usize, 2, 4] {
            if a & bit == 0 {
                edges.push((corner(a), corner(a | bit)));
            }
        }
    }
    edges
}
