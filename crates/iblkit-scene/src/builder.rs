//! Turns a session's manifest into scene requests.
//!
//! Image sections (background, environment, reflection) resolve their file
//! against the manifest's directory and are skipped when the file is missing.
//! The sun and numbered lights are placed on a sphere from their manifest
//! `u`/`v`. Environment lights are sampled from the decoded environment
//! image.

use crate::flags::{BuildFlags, Visibility};
use crate::scene::{ImageRequest, NamedLight, SceneRequest, SceneSink};
use crate::session::IblSession;
use glam::Vec3;
use iblkit_core::{Error, LightTransform, Manifest, Result, Section, Value};
use iblkit_lighting::{sample_to_sphere, LightSetBuilder, LightSetConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneBuilderConfig {
    pub flags: BuildFlags,
    pub light_set: LightSetConfig,
    /// Gain applied to every environment light's normalized brightness.
    pub environment_multiplier: f32,
    /// Distance of the sun and numbered lights from the origin.
    pub radius: f32,
    /// Environment lights are named `<prefix>000`, `<prefix>001`, ...
    pub light_prefix: String,
}

impl Default for SceneBuilderConfig {
    fn default() -> Self {
        Self {
            flags: BuildFlags::default(),
            light_set: LightSetConfig::default(),
            environment_multiplier: 1.0,
            radius: 1000.0,
            light_prefix: "ibl_light".to_string(),
        }
    }
}

/// A referenced image that was not found and whose section was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedAsset {
    pub section: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildReport {
    pub requests: usize,
    pub environment_lights: usize,
    pub skipped: Vec<SkippedAsset>,
}

/// Manifest keys read for one kind of placed light.
struct LightKeys {
    name: &'static str,
    color: &'static str,
    multiplier: &'static str,
    u: &'static str,
    v: &'static str,
}

const SUN_KEYS: LightKeys = LightKeys {
    name: "sunname",
    color: "suncolor",
    multiplier: "sunmulti",
    u: "sunu",
    v: "sunv",
};

const LIGHT_KEYS: LightKeys = LightKeys {
    name: "lightname",
    color: "lightcolor",
    multiplier: "lightmulti",
    u: "lightu",
    v: "lightv",
};

pub struct IblSceneBuilder {
    config: SceneBuilderConfig,
}

impl IblSceneBuilder {
    pub fn new(config: SceneBuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SceneBuilderConfig {
        &self.config
    }

    /// Submits the requests for the session's manifest to `sink`.
    ///
    /// Fails only when the session has no manifest. Missing images and
    /// undecodable environments shrink the output instead.
    pub fn build(&self, session: &mut IblSession, sink: &mut dyn SceneSink) -> Result<BuildReport> {
        let manifest = session
            .manifest()
            .ok_or_else(|| Error::Format("no manifest loaded".to_string()))?;

        let mut report = BuildReport::default();

        let flags = self.config.flags;
        let image_sections = [
            (BuildFlags::BACKGROUND, "background", "bgfile", Visibility::CAMERA),
            (BuildFlags::ENVIRONMENT, "environment", "evfile", Visibility::GLOBAL_ILLUMINATION),
            (BuildFlags::REFLECTION, "reflection", "reffile", Visibility::REFLECTIONS),
        ];
        for (flag, section, key, visibility) in image_sections {
            if !flags.contains(flag) {
                continue;
            }
            let Some(image) = existing_asset(manifest, section, key, &mut report) else {
                continue;
            };
            let request = ImageRequest::new(image, visibility);
            let request = match section {
                "background" => SceneRequest::Background(request),
                "environment" => SceneRequest::Environment(request),
                _ => SceneRequest::Reflection(request),
            };
            submit(sink, request, &mut report);
        }

        if flags.contains(BuildFlags::SUN) {
            if let Some(section) = manifest.section("sun") {
                let sun = self.placed_light(section, &SUN_KEYS, "sun".to_string());
                submit(sink, SceneRequest::Sun(sun), &mut report);
            }
        }

        if flags.contains(BuildFlags::LIGHTS) {
            for (n, section) in manifest.numbered_sections("light") {
                let light = self.placed_light(section, &LIGHT_KEYS, format!("light{:0>3}", n));
                submit(sink, SceneRequest::Light(light), &mut report);
            }
        }

        // Collected before the session is borrowed mutably for image decoding.
        let environment = if flags.contains(BuildFlags::ENVIRONMENT_LIGHTS) {
            existing_asset(manifest, "environment", "evfile", &mut report)
        } else {
            None
        };

        if let Some(path) = environment {
            match session.environment_image(&path) {
                Ok(image) => {
                    let set = LightSetBuilder::new(self.config.light_set).build(image);
                    for (index, light) in set.lights.iter().enumerate() {
                        let light = NamedLight {
                            name: format!("{}{:03}", self.config.light_prefix, index),
                            color: light.color,
                            brightness: set.brightness(light, self.config.environment_multiplier),
                            transform: light.transform(),
                        };
                        submit(sink, SceneRequest::Light(light), &mut report);
                    }
                    report.environment_lights = set.len();
                }
                Err(e) => log::warn!("Skipping environment lights: {}", e),
            }
        }

        log::info!(
            "Built {} scene requests ({} environment lights, {} missing assets)",
            report.requests,
            report.environment_lights,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Reads a sun or numbered light. The manifest's `v` runs top to bottom,
    /// so it is flipped before mapping onto the sphere.
    fn placed_light(&self, section: &Section, keys: &LightKeys, default_name: String) -> NamedLight {
        let number = |key: &str, default: f32| section.get(key).and_then(Value::as_f32).unwrap_or(default);

        let name = section
            .get(keys.name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(default_name);
        let color = section
            .get(keys.color)
            .and_then(Value::as_color)
            .unwrap_or(Vec3::ONE);
        let u = number(keys.u, 0.0);
        let v = number(keys.v, 0.0);

        NamedLight {
            name,
            color,
            brightness: number(keys.multiplier, 1.0),
            transform: LightTransform::on_sphere(sample_to_sphere(u, 1.0 - v), self.config.radius),
        }
    }
}

impl Default for IblSceneBuilder {
    fn default() -> Self {
        Self::new(SceneBuilderConfig::default())
    }
}

fn submit(sink: &mut dyn SceneSink, request: SceneRequest, report: &mut BuildReport) {
    log::debug!("Submitting {} request", request.kind());
    report.requests += 1;
    sink.submit(request);
}

/// Absolute path of `[section] key` if the manifest names a file that exists.
/// A named but missing file is logged and recorded in the report.
fn existing_asset(
    manifest: &Manifest,
    section: &str,
    key: &str,
    report: &mut BuildReport,
) -> Option<PathBuf> {
    let file = manifest.get(section, key)?.as_str()?;
    if file.is_empty() {
        return None;
    }

    let path = manifest.path().join(file);
    if path.is_file() {
        return Some(path);
    }

    log::warn!("{}", Error::MissingAsset(path.clone()));
    let skipped = SkippedAsset {
        section: section.to_string(),
        path,
    };
    if !report.skipped.contains(&skipped) {
        report.skipped.push(skipped);
    }
    None
}
