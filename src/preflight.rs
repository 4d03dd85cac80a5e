//! Startup checks for the icon generator.
//!
//! Everything the generator needs is checked once before any icon is drawn:
//! the PNG encoder, the label font, and the way labels get measured.

use crate::{
    canvas::Canvas,
    icon_gen::{BRAND_BLUE, FONT_NAME, LABEL},
    label_font::{FontLocator, LabelFont},
    measure::{select_measurer, TextMeasurer},
};
use anyhow::Result;
use log::debug;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Capabilities selected at startup and shared by every icon of a run.
pub struct Toolkit {
    font_path: Option<PathBuf>,
    measurer: Box<dyn TextMeasurer>,
}

impl fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolkit")
            .field("font_path", &self.font_path)
            .field("measurer", &self.measurer.name())
            .finish()
    }
}

impl Toolkit {
    pub fn new(font_path: Option<PathBuf>, measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            font_path,
            measurer,
        }
    }

    pub fn font_path(&self) -> Option<&Path> {
        self.font_path.as_deref()
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    /// The label face at `font_size`; the builtin face if the system one
    /// can't be loaded.
    pub fn label_font(&self, font_size: u32) -> LabelFont {
        LabelFont::load(self.font_path(), font_size)
    }
}

/// A capability the generator can't run without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    pub capability: &'static str,
    pub cause: String,
}

impl MissingDependency {
    /// The two lines shown to the user before exiting.
    pub fn remediation(&self) -> [String; 2] {
        [
            format!("Error: this tool requires the image crate with {} support.", self.capability),
            "Please rebuild with the image crate's default features enabled (cargo build --release)."
                .to_string(),
        ]
    }
}

#[derive(Debug)]
pub enum Readiness {
    Ready(Toolkit),
    MissingDependency(MissingDependency),
}

/// Runs the startup checks against the system font directories.
pub fn check() -> Readiness {
    check_with(&FontLocator::system())
}

pub fn check_with(locator: &FontLocator) -> Readiness {
    if let Err(err) = check_png_encoder() {
        return Readiness::MissingDependency(MissingDependency {
            capability: "PNG encoding",
            cause: format!("{err:#}"),
        });
    }

    let font_path = locator.find(FONT_NAME);
    match &font_path {
        Some(path) => debug!("Located {FONT_NAME} at {}", path.display()),
        None => debug!("{FONT_NAME} not found on this system"),
    }

    let measurer = select_measurer(font_path.as_deref(), LABEL);
    debug!("Measuring labels with the {} measurer", measurer.name());

    Readiness::Ready(Toolkit::new(font_path, measurer))
}

/// Encodes a single pixel and decodes it back.
fn check_png_encoder() -> Result<()> {
    let png = Canvas::filled(1, BRAND_BLUE).encode_png()?;
    image::load_from_memory_with_format(&png, image::ImageFormat::Png)?;
    Ok(())
}
