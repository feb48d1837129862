//! Scene requests – everything a build asks the host scene to create

use crate::flags::Visibility;
use glam::Vec3;
use iblkit_core::LightTransform;
use std::path::PathBuf;

/// An environment-mapped surface: background, lighting or reflection source.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRequest {
    pub image: PathBuf,
    pub visibility: Visibility,
}

impl ImageRequest {
    pub fn new(image: PathBuf, visibility: Visibility) -> Self {
        Self { image, visibility }
    }
}

/// A light to place in the scene
#[derive(Clone, Debug, PartialEq)]
pub struct NamedLight {
    pub name: String,
    pub color: Vec3,
    pub brightness: f32,
    pub transform: LightTransform,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneRequest {
    Background(ImageRequest),
    Environment(ImageRequest),
    Reflection(ImageRequest),
    Sun(NamedLight),
    Light(NamedLight),
}

impl SceneRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            SceneRequest::Background(_) => "background",
            SceneRequest::Environment(_) => "environment",
            SceneRequest::Reflection(_) => "reflection",
            SceneRequest::Sun(_) => "sun",
            SceneRequest::Light(_) => "light",
        }
    }

    pub fn light(&self) -> Option<&NamedLight> {
        match self {
            SceneRequest::Sun(light) | SceneRequest::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageRequest> {
        match self {
            SceneRequest::Background(image)
            | SceneRequest::Environment(image)
            | SceneRequest::Reflection(image) => Some(image),
            _ => None,
        }
    }
}

/// Receives the requests of a build and materializes them in a host scene.
pub trait SceneSink {
    fn submit(&mut self, request: SceneRequest);
}

/// Records requests in order.
impl SceneSink for Vec<SceneRequest> {
    fn submit(&mut self, request: SceneRequest) {
        self.push(request);
    }
}
