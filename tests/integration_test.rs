use image::Rgba;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use x402_dev_tools::icon_gen::{generate_icons, ICON_SPECS};
use x402_dev_tools::preflight::{check, Readiness, Toolkit};

const BRAND_BLUE: Rgba<u8> = Rgba([0, 82, 255, 255]);

fn toolkit() -> Toolkit {
    match check() {
        Readiness::Ready(toolkit) => toolkit,
        Readiness::MissingDependency(missing) => panic!("preflight failed: {missing:?}"),
    }
}

/// Generating into a directory that doesn't exist yet creates it and writes
/// every icon at its exact size with the brand color in the corner.
#[test]
fn test_generate_icons_into_missing_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("extension").join("icons");
    assert!(!output_dir.exists());

    let written = generate_icons(&toolkit(), &output_dir).expect("icon generation failed");
    assert_eq!(written.len(), ICON_SPECS.len());

    for spec in ICON_SPECS {
        let path = output_dir.join(spec.file_name);
        assert!(path.exists(), "{} should exist", path.display());

        let icon = image::open(&path).expect("Failed to load generated icon");
        assert_eq!(icon.width(), spec.size);
        assert_eq!(icon.height(), spec.size);
        assert_eq!(icon.color(), image::ColorType::Rgba8);
        assert_eq!(*icon.to_rgba8().get_pixel(0, 0), BRAND_BLUE);
    }
}

#[test]
fn test_generate_icons_into_existing_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let toolkit = toolkit();

    generate_icons(&toolkit, temp_dir.path()).expect("first run failed");
    generate_icons(&toolkit, temp_dir.path()).expect("second run over existing files failed");
}

/// Two runs produce byte-identical files.
#[test]
fn test_generation_is_deterministic() {
    let first = TempDir::new().expect("Failed to create temp directory");
    let second = TempDir::new().expect("Failed to create temp directory");

    generate_icons(&toolkit(), first.path()).expect("first run failed");
    generate_icons(&toolkit(), second.path()).expect("second run failed");

    for spec in ICON_SPECS {
        let a = std::fs::read(first.path().join(spec.file_name)).unwrap();
        let b = std::fs::read(second.path().join(spec.file_name)).unwrap();
        assert!(a == b, "{} differs between runs", spec.file_name);
    }
}

/// The label is actually drawn: some pixel of every icon is not brand blue.
#[test]
fn test_label_is_drawn() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    generate_icons(&toolkit(), temp_dir.path()).expect("icon generation failed");

    for spec in ICON_SPECS {
        let icon = image::open(temp_dir.path().join(spec.file_name))
            .unwrap()
            .to_rgba8();
        assert!(
            icon.pixels().any(|pixel| *pixel != BRAND_BLUE),
            "{} has no label pixels",
            spec.file_name
        );
        assert!(icon.pixels().all(|pixel| pixel[3] == 255));
    }
}

/// Runs the real binary. Icons it writes into a previously missing `icons/`
/// are removed again so the checkout stays clean.
#[test]
fn test_generate_icons_binary() {
    let icons_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("icons");
    let existed = icons_dir.exists();

    let output = Command::new(env!("CARGO_BIN_EXE_generate-icons"))
        .output()
        .expect("Failed to run generate-icons");

    if !output.status.success() {
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("generate-icons failed with status {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Created icon:").count(), 3);
    assert!(stdout.contains("All icons generated successfully!"));

    let sizes: Vec<_> = ICON_SPECS
        .iter()
        .map(|spec| image::open(icons_dir.join(spec.file_name)).map(|icon| (icon.width(), icon.height())))
        .collect();
    if !existed {
        std::fs::remove_dir_all(&icons_dir).expect("Failed to clean up icons/");
    }

    for (spec, size) in ICON_SPECS.iter().zip(sizes) {
        let size = size.expect("icon missing");
        assert_eq!(size, (spec.size, spec.size));
    }
}
