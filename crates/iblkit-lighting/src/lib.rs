//! Environment lighting for iblkit.
//!
//! Samples a latitude-longitude environment map and approximates it with a
//! set of discrete lights placed on a sphere around the origin.

pub mod ibl;
pub mod light_set;
pub mod lights;
pub mod sphere;

pub use ibl::{sample_color, EnvironmentImage, TexelSource};
pub use light_set::{LightSet, LightSetBuilder, LightSetConfig, MAX_ATTEMPTS};
pub use lights::LightDescriptor;
pub use sphere::{sample_to_sphere, sphere_uv};
