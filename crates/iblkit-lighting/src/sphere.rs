//! Unit-sphere mapping for latitude-longitude environment maps.

use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Maps a point of the unit square onto the unit sphere.
///
/// `u` sweeps the full azimuth, `v` runs from the south pole (`v = 0`) to the
/// north pole (`v = 1`) with +Y up.
///
/// Named lights read from a manifest are placed with `sample_to_sphere(u, 1.0 - v)`.
/// The flip keeps light placement compatible with existing `.ibl` files and
/// is intentionally not applied to sampled environment lights.
pub fn sample_to_sphere(u: f32, v: f32) -> Vec3 {
    let pv = 1.0 - 2.0 * (1.0 - v);
    let r = (1.0 - pv * pv).max(0.0).sqrt();
    let phi = u * TAU;
    Vec3::new(r * phi.cos(), pv, r * phi.sin())
}

/// Lat-long texture coordinates of `dir`, as seen from inside the sphere.
pub fn sphere_uv(dir: Vec3) -> Vec2 {
    let sq = (dir.x * dir.x + dir.z * dir.z).sqrt();

    let (u, v) = if sq == 0.0 {
        (0.0, if dir.y > 0.0 { 0.5 } else { -0.5 })
    } else {
        let mut u = (dir.x / sq).clamp(-1.0, 1.0).acos() / TAU;
        if dir.z < 0.0 {
            u = 1.0 - u;
        }
        u = u.rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negatives
        if u >= 1.0 {
            u = 0.0;
        }
        (u, (dir.y / sq).atan() / PI)
    };

    Vec2::new(u, 0.5 - v)
}
