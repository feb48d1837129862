use iblkit_core::{Error, Manifest, Value};
use std::fs;

#[test]
fn loads_manifest_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("Studio.IBL");
    fs::write(
        &path,
        "[Header]\nName = \"Studio\"\n\n[Enviroment]\nEVfile = \"env.hdr\"\n",
    )
    .unwrap();

    let manifest = Manifest::load(&path).expect("manifest");
    assert_eq!(manifest.header().name.as_deref(), Some("Studio"));
    assert_eq!(
        manifest.get("environment", "evfile"),
        Some(&Value::String("env.hdr".into()))
    );
    assert_eq!(manifest.path(), dir.path().canonicalize().unwrap());
}

#[test]
fn rejects_wrong_extension() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("studio.txt");
    fs::write(&path, "[Header]\n").unwrap();

    assert!(matches!(Manifest::load(&path), Err(Error::Format(_))));
}

#[test]
fn rejects_file_without_header() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("studio.ibl");
    fs::write(&path, "[Background]\nBGfile = \"bg.jpg\"\n").unwrap();

    assert!(matches!(Manifest::load(&path), Err(Error::Format(_))));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.ibl");

    assert!(matches!(Manifest::load(&path), Err(Error::Io(_))));
}
