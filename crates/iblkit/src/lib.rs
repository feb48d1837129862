//! iblkit - image-based lighting to discrete lights
//!
//! Parses `.ibl` scene descriptions and approximates the environment map they
//! reference with a deterministic set of lights, handing everything to a host
//! scene through [`scene::SceneSink`].

pub use iblkit_core as core;
pub use iblkit_lighting as lighting;
pub use iblkit_scene as scene;

pub mod prelude {
    pub use crate::core::{Error, LightTransform, Manifest, Result, Value};
    pub use crate::lighting::{
        EnvironmentImage, LightDescriptor, LightSet, LightSetBuilder, LightSetConfig, TexelSource,
    };
    pub use crate::scene::{
        BuildFlags, IblSceneBuilder, IblSession, SceneBuilderConfig, SceneRequest, SceneSink,
    };
    pub use glam;
}
