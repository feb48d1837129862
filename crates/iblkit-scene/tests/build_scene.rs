use iblkit_core::Manifest;
use iblkit_lighting::LightSetConfig;
use iblkit_scene::{
    BuildFlags, IblSceneBuilder, IblSession, SceneBuilderConfig, SceneRequest, Visibility,
};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;

const MANIFEST: &str = r#"[Header]
Name = "Courtyard"
Author = "iblkit"

[Background]
BGfile = "courtyard_bg.png"

[Enviroment]
EVfile = "courtyard_env.png"

[Reflection]
REFfile = "courtyard_ref.png"

[Sun]
SUNcolor = 255,250,240
SUNmulti = 1.5
SUNu = 0.5
SUNv = 0.25

[Light1]
LIGHTname = "Fill"
LIGHTu = 0.75
LIGHTv = 0.5
"#;

fn write_png(path: &Path, color: [u8; 3]) {
    RgbImage::from_pixel(32, 16, Rgb(color)).save(path).expect("write png");
}

fn courtyard(dir: &Path, with_reflection: bool) -> std::path::PathBuf {
    write_png(&dir.join("courtyard_bg.png"), [10, 20, 30]);
    write_png(&dir.join("courtyard_env.png"), [200, 180, 160]);
    if with_reflection {
        write_png(&dir.join("courtyard_ref.png"), [1, 2, 3]);
    }
    let path = dir.join("courtyard.ibl");
    fs::write(&path, MANIFEST).unwrap();
    path
}

fn config() -> SceneBuilderConfig {
    SceneBuilderConfig {
        light_set: LightSetConfig {
            sample_count: 8,
            seed: 11,
            ..Default::default()
        },
        environment_multiplier: 2.0,
        ..Default::default()
    }
}

#[test]
fn builds_full_scene() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = courtyard(dir.path(), true);
    let root = dir.path().canonicalize().unwrap();

    let mut session = IblSession::new();
    session.open(&path).expect("manifest");
    assert_eq!(session.last_browsed_path(), Some(path.as_path()));

    let mut requests: Vec<SceneRequest> = Vec::new();
    let report = IblSceneBuilder::new(config()).build(&mut session, &mut requests).unwrap();

    assert!(report.skipped.is_empty());
    assert_eq!(report.environment_lights, 8);
    assert_eq!(report.requests, requests.len());
    assert_eq!(requests.len(), 3 + 2 + 8);

    let kinds: Vec<_> = requests.iter().take(5).map(SceneRequest::kind).collect();
    assert_eq!(kinds, vec!["background", "environment", "reflection", "sun", "light"]);

    let background = requests[0].image().unwrap();
    assert_eq!(background.image, root.join("courtyard_bg.png"));
    assert_eq!(background.visibility, Visibility::CAMERA);

    assert_eq!(requests[4].light().unwrap().name, "Fill");

    let env_lights: Vec<_> = requests[5..].iter().map(|r| r.light().unwrap()).collect();
    let names: Vec<_> = env_lights.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names[0], "ibl_light000");
    assert_eq!(names[7], "ibl_light007");

    // Normalized brightness sums to the environment gain.
    let total: f32 = env_lights.iter().map(|l| l.brightness).sum();
    assert!((total - 2.0).abs() < 1e-4, "total brightness {total}");
}

#[test]
fn missing_reflection_is_skipped() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = courtyard(dir.path(), false);

    let mut session = IblSession::new();
    session.open(&path).unwrap();

    let mut requests: Vec<SceneRequest> = Vec::new();
    let report = IblSceneBuilder::new(config()).build(&mut session, &mut requests).unwrap();

    assert!(!requests.iter().any(|r| matches!(r, SceneRequest::Reflection(_))));
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].section, "reflection");
    assert_eq!(report.environment_lights, 8);
}

#[test]
fn rebuilds_are_identical() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = courtyard(dir.path(), true);
    let mut session = IblSession::new();
    session.open(&path).unwrap();
    let builder = IblSceneBuilder::new(config());

    let mut first: Vec<SceneRequest> = Vec::new();
    builder.build(&mut session, &mut first).unwrap();
    let mut second: Vec<SceneRequest> = Vec::new();
    builder.build(&mut session, &mut second).unwrap();

    assert_eq!(first, second);
}

#[test]
fn restored_session_builds_like_the_original() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = courtyard(dir.path(), true);
    let config = SceneBuilderConfig {
        flags: BuildFlags::all() - BuildFlags::ENVIRONMENT_LIGHTS,
        ..config()
    };

    let mut session = IblSession::new();
    session.open(&path).unwrap();
    let bytes = session.persist().unwrap();

    let mut restored = IblSession::new();
    restored.restore(&bytes).unwrap();
    assert_eq!(restored.manifest(), session.manifest());
    assert_eq!(restored.last_browsed_path(), Some(path.as_path()));

    let mut original: Vec<SceneRequest> = Vec::new();
    IblSceneBuilder::new(config.clone()).build(&mut session, &mut original).unwrap();
    let mut replayed: Vec<SceneRequest> = Vec::new();
    IblSceneBuilder::new(config).build(&mut restored, &mut replayed).unwrap();
    assert_eq!(original, replayed);
}

#[test]
fn undecodable_environment_skips_lights_only() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("env.hdr"), b"garbage").unwrap();
    let text = "[Header]\n[Enviroment]\nEVfile = \"env.hdr\"\n";

    let mut session = IblSession::new();
    session.set_manifest(Manifest::parse(text, dir.path()).unwrap());

    let mut requests: Vec<SceneRequest> = Vec::new();
    let report = IblSceneBuilder::default().build(&mut session, &mut requests).unwrap();

    assert_eq!(requests.len(), 1);
    assert!(matches!(requests[0], SceneRequest::Environment(_)));
    assert_eq!(report.environment_lights, 0);
}
