use crate::{canvas::Canvas, measure::TextExtent, preflight::Toolkit};
use anyhow::{Context, Result};
use image::Rgba;
use log::debug;
use std::path::{Path, PathBuf};

/// Extension brand blue, fully opaque.
pub const BRAND_BLUE: Rgba<u8> = Rgba([0, 82, 255, 255]);
pub const LABEL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const LABEL: &str = "X402";
/// System font family the label is drawn with when available.
pub const FONT_NAME: &str = "Arial";
/// Label font size relative to the icon size.
pub const LABEL_SCALE: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    pub file_name: &'static str,
    pub size: u32,
}

pub const ICON_SPECS: [IconSpec; 3] = [
    IconSpec {
        file_name: "icon16.png",
        size: 16,
    },
    IconSpec {
        file_name: "icon48.png",
        size: 48,
    },
    IconSpec {
        file_name: "icon128.png",
        size: 128,
    },
];

/// `icons/` next to the crate manifest, where the extension loads them from.
///
/// The manifest path is fixed at build time. When that checkout no longer
/// exists (an installed or copied binary), `icons/` next to the executable
/// is used instead.
pub fn default_icons_dir() -> PathBuf {
    icons_dir_for(
        Path::new(env!("CARGO_MANIFEST_DIR")),
        std::env::current_exe().ok().as_deref(),
    )
}

fn icons_dir_for(manifest_dir: &Path, exe: Option<&Path>) -> PathBuf {
    if manifest_dir.is_dir() {
        return manifest_dir.join("icons");
    }
    exe.and_then(Path::parent)
        .map_or_else(|| PathBuf::from("icons"), |dir| dir.join("icons"))
}

pub fn label_font_size(size: u32) -> u32 {
    (size as f32 * LABEL_SCALE) as u32
}

/// Top-left corner that centers `extent` on a `size` canvas, rounding toward
/// negative infinity. Negative when the label is wider than the canvas.
pub fn label_origin(size: u32, extent: TextExtent) -> (i32, i32) {
    let size = size as f32;
    (
        ((size - extent.width) / 2.0).floor() as i32,
        ((size - extent.height) / 2.0).floor() as i32,
    )
}

/// Composes the icon for `size` in memory.
pub fn render_icon(toolkit: &Toolkit, size: u32) -> Canvas {
    let mut canvas = Canvas::filled(size, BRAND_BLUE);

    let font_size = label_font_size(size);
    let font = toolkit.label_font(font_size);
    let extent = toolkit.measurer().measure(&font, font_size, LABEL);
    let origin = label_origin(size, extent);
    debug!("{size}px icon: {font:?} at {font_size}px, {extent:?}, origin {origin:?}");

    canvas.draw_text(&font, LABEL, origin, LABEL_COLOR);
    canvas
}

/// Renders the `size` icon and writes it to `dest` as PNG.
pub fn generate(toolkit: &Toolkit, size: u32, dest: &Path) -> Result<()> {
    render_icon(toolkit, size)
        .save_png(dest)
        .with_context(|| format!("Failed to save {}", dest.display()))?;
    println!("✓ Created icon: {}", dest.display());
    Ok(())
}

/// Writes every icon of [`ICON_SPECS`] into `out_dir`.
pub fn generate_icons(toolkit: &Toolkit, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).context("Can't create output directory")?;

    let mut written = Vec::with_capacity(ICON_SPECS.len());
    for spec in ICON_SPECS {
        let output_path = out_dir.join(spec.file_name);
        generate(toolkit, spec.size, &output_path)?;
        written.push(output_path);
    }

    println!("All icons generated successfully!");
    Ok(written)
}
