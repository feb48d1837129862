//! Turns an environment map into a finite set of lights.
//!
//! Directions are drawn uniformly over the polar cap above `horizon`. A draw
//! whose sampled color is dimmer than `threshold` is retried, up to
//! [`MAX_ATTEMPTS`] times per light; a light whose draws all fail is dropped,
//! so `sample_count` is an upper bound.

use crate::ibl::{sample_color, TexelSource};
use crate::lights::LightDescriptor;
use crate::sphere::{sample_to_sphere, sphere_uv};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const MAX_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSetConfig {
    /// Maximum number of lights.
    pub sample_count: u32,
    /// Lowest `v` drawn: 0 covers the whole sphere, 0.5 the upper hemisphere.
    pub horizon: f32,
    /// Minimum color length for a draw to be kept.
    pub threshold: f32,
    pub seed: u64,
    /// Scale intensities so the brightness of the whole set sums to 1.
    pub normalize: bool,
    /// Gamma-encode sampled colors before measuring them.
    pub srgb: bool,
    /// Distance of each light from the origin.
    pub radius: f32,
}

impl Default for LightSetConfig {
    fn default() -> Self {
        Self {
            sample_count: 32,
            horizon: 0.0,
            threshold: 0.0,
            seed: 0,
            normalize: true,
            srgb: false,
            radius: 1000.0,
        }
    }
}

/// Lights produced by one [`LightSetBuilder::build`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSet {
    /// Last accepted sample first.
    pub lights: Vec<LightDescriptor>,
    pub normalize_factor: f32,
}

impl LightSet {
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Final brightness of `light`, with a caller supplied gain.
    pub fn brightness(&self, light: &LightDescriptor, multiplier: f32) -> f32 {
        light.intensity * self.normalize_factor * multiplier
    }

    pub fn total_brightness(&self) -> f32 {
        self.lights.iter().map(|light| self.brightness(light, 1.0)).sum()
    }
}

pub struct LightSetBuilder {
    config: LightSetConfig,
}

impl LightSetBuilder {
    pub fn new(config: LightSetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LightSetConfig {
        &self.config
    }

    /// Samples `image`. The same config and image always give the same set.
    pub fn build<T: TexelSource + ?Sized>(&self, image: &T) -> LightSet {
        let mut lights = self.draw(image);

        let count = lights.len();
        let total: f32 = lights.iter().map(|light| light.intensity).sum();
        let normalize_factor = if self.config.normalize && count > 0 && total > 0.0 {
            let mean = total / count as f32;
            (1.0 / mean) / count as f32
        } else {
            1.0
        };

        lights.reverse();

        log::debug!(
            "Built {} of {} environment lights (normalize factor {})",
            count,
            self.config.sample_count,
            normalize_factor
        );

        LightSet {
            lights,
            normalize_factor,
        }
    }

    /// Accepted samples in draw order.
    fn draw<T: TexelSource + ?Sized>(&self, image: &T) -> Vec<LightDescriptor> {
        let LightSetConfig {
            sample_count,
            horizon,
            threshold,
            seed,
            srgb,
            radius,
            ..
        } = self.config;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut accepted = Vec::new();

        for index in 0..sample_count {
            let mut hit = None;
            for _ in 0..MAX_ATTEMPTS {
                let u: f32 = rng.gen();
                let v = horizon + (1.0 - horizon) * rng.gen::<f32>();
                let direction = sample_to_sphere(u, v);
                let color = sample_color(image, sphere_uv(direction), srgb);
                if color.length() >= threshold {
                    hit = Some((direction, color));
                    break;
                }
            }

            match hit {
                Some((direction, color)) => {
                    accepted.push(LightDescriptor::from_sample(direction, color, radius));
                }
                None => log::trace!("Light {} rejected after {} draws", index, MAX_ATTEMPTS),
            }
        }

        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ibl::EnvironmentImage;
    use glam::Vec3;
    use std::cell::Cell;

    /// Uniform texture that counts how often it is read.
    struct CountingSource {
        color: [f32; 3],
        fetches: Cell<u32>,
    }

    impl TexelSource for CountingSource {
        fn width(&self) -> u32 {
            8
        }

        fn height(&self) -> u32 {
            4
        }

        fn fetch_texel(&self, _x: u32, _y: u32) -> Option<[f32; 3]> {
            self.fetches.set(self.fetches.get() + 1);
            Some(self.color)
        }
    }

    /// Bright upper half, black lower half.
    fn sky() -> EnvironmentImage {
        let mut img = EnvironmentImage::solid(32, 16, Vec3::ZERO);
        for y in 0..8 {
            for x in 0..32 {
                img.set_texel(x, y, Vec3::new(1.0 + x as f32 * 0.1, 1.0, 0.5 + y as f32 * 0.2));
            }
        }
        img
    }

    fn config() -> LightSetConfig {
        LightSetConfig {
            sample_count: 16,
            seed: 7,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_samples() {
        let set = LightSetBuilder::new(LightSetConfig {
            sample_count: 0,
            ..config()
        })
        .build(&sky());
        assert!(set.is_empty());
        assert_eq!(set.normalize_factor, 1.0);
    }

    #[test]
    fn test_unreachable_threshold() {
        let set = LightSetBuilder::new(LightSetConfig {
            threshold: 1.0e6,
            ..config()
        })
        .build(&sky());
        assert!(set.is_empty());
    }

    #[test]
    fn test_threshold_filters_dark_draws() {
        let set = LightSetBuilder::new(LightSetConfig {
            threshold: 0.5,
            ..config()
        })
        .build(&sky());
        assert_eq!(set.len(), 16);
        for light in &set.lights {
            assert!(light.intensity >= 0.5);
            assert!(light.direction.y >= 0.0, "dark lower half accepted: {}", light.direction);
            assert!((light.color.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_deterministic() {
        let builder = LightSetBuilder::new(config());
        let a = builder.build(&sky());
        let b = LightSetBuilder::new(config()).build(&sky());
        assert_eq!(a, b);

        let c = LightSetBuilder::new(LightSetConfig { seed: 8, ..config() }).build(&sky());
        assert_ne!(a, c);
    }

    #[test]
    fn test_reverse_acceptance_order() {
        let builder = LightSetBuilder::new(config());
        let mut drawn = builder.draw(&sky());
        drawn.reverse();
        assert_eq!(builder.build(&sky()).lights, drawn);
    }

    #[test]
    fn test_horizon_limits_cap() {
        let set = LightSetBuilder::new(LightSetConfig {
            horizon: 0.5,
            sample_count: 64,
            ..config()
        })
        .build(&sky());
        assert_eq!(set.len(), 64);
        assert!(set.lights.iter().all(|light| light.direction.y >= 0.0));
    }

    #[test]
    fn test_normalized_brightness_sums_to_one() {
        let set = LightSetBuilder::new(LightSetConfig {
            threshold: 0.5,
            sample_count: 200,
            ..config()
        })
        .build(&sky());
        assert!((set.total_brightness() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_unnormalized_factor_is_one() {
        let set = LightSetBuilder::new(LightSetConfig {
            normalize: false,
            ..config()
        })
        .build(&sky());
        assert_eq!(set.normalize_factor, 1.0);
        let light = set.lights[0];
        assert_eq!(set.brightness(&light, 2.0), light.intensity * 2.0);
    }

    #[test]
    fn test_positions_use_radius() {
        let set = LightSetBuilder::new(LightSetConfig {
            radius: 50.0,
            ..config()
        })
        .build(&sky());
        for light in &set.lights {
            assert!((light.position.length() - 50.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_rejected_light_uses_every_attempt() {
        let source = CountingSource {
            color: [0.1, 0.1, 0.1],
            fetches: Cell::new(0),
        };
        let set = LightSetBuilder::new(LightSetConfig {
            sample_count: 3,
            threshold: 1.0,
            ..config()
        })
        .build(&source);

        assert!(set.is_empty());
        assert_eq!(source.fetches.get(), 3 * MAX_ATTEMPTS);
    }

    #[test]
    fn test_nothing_reserved_for_rejected_lights() {
        let source = CountingSource {
            color: [0.0, 0.0, 0.0],
            fetches: Cell::new(0),
        };
        let builder = LightSetBuilder::new(LightSetConfig {
            sample_count: 5,
            threshold: 1.0,
            ..config()
        });
        assert_eq!(builder.draw(&source).capacity(), 0);
    }

    #[test]
    fn test_accepted_light_stops_drawing() {
        let source = CountingSource {
            color: [1.0, 1.0, 1.0],
            fetches: Cell::new(0),
        };
        let set = LightSetBuilder::new(config()).build(&source);

        assert_eq!(set.len(), 16);
        assert_eq!(source.fetches.get(), 16);
    }

    #[test]
    fn test_srgb_applies_before_threshold() {
        // Linear length 0.173 misses the threshold; encoded length 0.608 meets it.
        let dim = EnvironmentImage::solid(8, 4, Vec3::splat(0.1));
        let base = LightSetConfig {
            threshold: 0.5,
            sample_count: 4,
            ..config()
        };

        let linear = LightSetBuilder::new(base).build(&dim);
        assert!(linear.is_empty());

        let encoded = LightSetBuilder::new(LightSetConfig { srgb: true, ..base }).build(&dim);
        assert_eq!(encoded.len(), 4);
        let expected = Vec3::splat(0.1f32.powf(1.0 / 2.2)).length();
        for light in &encoded.lights {
            assert!((light.intensity - expected).abs() < 1e-5, "intensity {}", light.intensity);
        }
    }
}
