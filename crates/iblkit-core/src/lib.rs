//! Core types for iblkit.
//!
//! Parses `.ibl` manifests into typed [`Manifest`]s and defines the shared
//! error type and light placement math used by the other iblkit crates.

pub mod error;
pub mod manifest;
pub mod transform;
pub mod value;

pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestHeader, Section};
pub use transform::{look_along, LightTransform};
pub use value::{coerce, Value};

pub use glam;
