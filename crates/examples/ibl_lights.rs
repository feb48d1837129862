//! Prints the scene requests an `.ibl` file produces.
//!
//! Usage: `ibl_lights <file.ibl> [sample_count] [seed]`

use iblkit::prelude::*;
use iblkit::scene::NamedLight;

/// Writes every request to stdout instead of a host scene.
struct PrintSink;

impl PrintSink {
    fn print_light(kind: &str, light: &NamedLight) {
        let p = light.transform.position;
        let c = light.color;
        println!(
            "{:<12} {:<16} pos=({:9.2}, {:9.2}, {:9.2}) color=({:.3}, {:.3}, {:.3}) brightness={:.4}",
            kind, light.name, p.x, p.y, p.z, c.x, c.y, c.z, light.brightness
        );
    }
}

impl SceneSink for PrintSink {
    fn submit(&mut self, request: SceneRequest) {
        match &request {
            SceneRequest::Sun(light) | SceneRequest::Light(light) => {
                Self::print_light(request.kind(), light)
            }
            _ => {
                if let Some(image) = request.image() {
                    println!("{:<12} {}", request.kind(), image.image.display());
                }
            }
        }
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> T {
    args.get(index).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        let program = args.first().map(String::as_str).unwrap_or("ibl_lights");
        eprintln!("usage: {} <file.ibl> [sample_count] [seed]", program);
        std::process::exit(2);
    };

    let mut session = IblSession::new();
    let header = match session.open(path) {
        Ok(manifest) => manifest.header(),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    println!(
        "=== {} ({}) ===",
        header.name.as_deref().unwrap_or("unnamed"),
        header.path.display()
    );

    let config = SceneBuilderConfig {
        light_set: LightSetConfig {
            sample_count: parse_arg(&args, 2, 32),
            seed: parse_arg(&args, 3, 0),
            ..Default::default()
        },
        ..Default::default()
    };

    match IblSceneBuilder::new(config).build(&mut session, &mut PrintSink) {
        Ok(report) => {
            for skipped in &report.skipped {
                println!("skipped [{}] {}", skipped.section, skipped.path.display());
            }
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
