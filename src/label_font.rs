//! Fonts used to draw the icon label.
//!
//! A label is drawn either with a TrueType face found on the host system or,
//! when that face is unavailable, with a small bitmap face compiled into the
//! binary.

use anyhow::{Context, Result};
use log::debug;
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

/// Directories searched for named system fonts, in order.
const FONT_DIRS: &[&str] = &[
    "C:\\Windows\\Fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "/usr/share/fonts/truetype/msttcorefonts",
    "/usr/share/fonts/truetype",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts",
    "/usr/local/share/fonts",
];

/// Width and height of a builtin glyph, in bitmap cells.
const BUILTIN_COLS: u32 = 5;
const BUILTIN_ROWS: u32 = 7;
/// Horizontal distance between the origins of two builtin glyphs.
const BUILTIN_ADVANCE: u32 = BUILTIN_COLS + 1;

/// Finds TrueType files by family name.
#[derive(Debug, Clone)]
pub struct FontLocator {
    dirs: Vec<PathBuf>,
}

impl FontLocator {
    /// Locator over the usual Windows, macOS and Linux font directories.
    pub fn system() -> Self {
        Self::with_dirs(FONT_DIRS.iter().map(PathBuf::from))
    }

    pub fn with_dirs<I>(dirs: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// Returns the first `<name>.ttf` found, matching the file stem and
    /// extension case-insensitively. Unreadable directories are skipped.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        self.dirs.iter().find_map(|dir| {
            let entries = std::fs::read_dir(dir).ok()?;
            let mut matches: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && is_named_ttf(path, name))
                .collect();
            // read_dir order is platform dependent
            matches.sort();
            matches.into_iter().next()
        })
    }
}

fn is_named_ttf(path: &Path, name: &str) -> bool {
    let stem_matches = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map_or(false, |stem| stem.eq_ignore_ascii_case(name));
    let is_ttf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("ttf"));
    stem_matches && is_ttf
}

/// Reads and parses a TrueType face.
pub fn read_face(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file {}", path.display()))?;
    Font::try_from_vec(data)
        .with_context(|| format!("Failed to parse font file {}", path.display()))
}

/// A face sized for one label.
#[derive(Clone)]
pub enum LabelFont {
    TrueType { font: Font<'static>, scale: Scale },
    /// Embedded bitmap face; every bitmap cell is `cell` × `cell` pixels.
    Builtin { cell: u32 },
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelFont::TrueType { scale, .. } => f
                .debug_struct("TrueType")
                .field("px", &scale.y)
                .finish_non_exhaustive(),
            LabelFont::Builtin { cell } => f.debug_struct("Builtin").field("cell", cell).finish(),
        }
    }
}

impl LabelFont {
    /// Loads the face at `path` at `font_size` pixels. Falls back to the
    /// builtin face when there is no path or the face can't be loaded.
    pub fn load(path: Option<&Path>, font_size: u32) -> Self {
        let Some(path) = path else {
            debug!("No system font located, using builtin face");
            return Self::builtin(font_size);
        };

        match read_face(path) {
            Ok(font) => LabelFont::TrueType {
                font,
                scale: Scale::uniform(font_size as f32),
            },
            Err(err) => {
                debug!("{err:#}; using builtin face");
                Self::builtin(font_size)
            }
        }
    }

    /// The builtin face. Its rendered size only roughly tracks `font_size`.
    pub fn builtin(font_size: u32) -> Self {
        LabelFont::Builtin {
            cell: (font_size / 10).max(1),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, LabelFont::Builtin { .. })
    }

    /// Distance from the top of the line to the baseline.
    pub fn ascent(&self) -> f32 {
        match self {
            LabelFont::TrueType { font, scale } => font.v_metrics(*scale).ascent,
            LabelFont::Builtin { cell } => (BUILTIN_ROWS * cell) as f32,
        }
    }

    /// Height of one line of text.
    pub fn line_height(&self) -> f32 {
        match self {
            LabelFont::TrueType { font, scale } => {
                let v = font.v_metrics(*scale);
                v.ascent - v.descent
            }
            LabelFont::Builtin { cell } => (BUILTIN_ROWS * cell) as f32,
        }
    }

    /// Horizontal extent of `text` laid out on one line.
    pub fn text_width(&self, text: &str) -> f32 {
        match self {
            LabelFont::TrueType { font, scale } => font
                .layout(text, *scale, point(0.0, 0.0))
                .last()
                .map_or(0.0, |glyph| {
                    glyph.position().x + glyph.unpositioned().h_metrics().advance_width
                }),
            LabelFont::Builtin { cell } => {
                let chars = text.chars().count() as u32;
                if chars == 0 {
                    0.0
                } else {
                    ((chars * BUILTIN_ADVANCE - 1) * cell) as f32
                }
            }
        }
    }

    /// Calls `plot(x, y, coverage)` for every inked pixel of `text` whose line
    /// box starts at `origin`. Coordinates may fall outside any canvas.
    pub fn rasterize<F>(&self, text: &str, origin: (i32, i32), mut plot: F)
    where
        F: FnMut(i32, i32, f32),
    {
        match self {
            LabelFont::TrueType { font, scale } => {
                let baseline = point(origin.0 as f32, origin.1 as f32 + self.ascent());
                for glyph in font.layout(text, *scale, baseline) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|x, y, coverage| {
                            plot(bb.min.x + x as i32, bb.min.y + y as i32, coverage)
                        });
                    }
                }
            }
            LabelFont::Builtin { cell } => {
                let cell = *cell as i32;
                for (index, ch) in text.chars().enumerate() {
                    let left = origin.0 + index as i32 * BUILTIN_ADVANCE as i32 * cell;
                    for (row, bits) in builtin_glyph(ch).iter().enumerate() {
                        for col in 0..BUILTIN_COLS {
                            if bits & (0x10 >> col) == 0 {
                                continue;
                            }
                            let x0 = left + col as i32 * cell;
                            let y0 = origin.1 + row as i32 * cell;
                            for dy in 0..cell {
                                for dx in 0..cell {
                                    plot(x0 + dx, y0 + dy, 1.0);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Rows of a 5×7 glyph, most significant of the low five bits leftmost.
fn builtin_glyph(ch: char) -> [u8; BUILTIN_ROWS as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        ' ' => [0x00; BUILTIN_ROWS as usize],
        _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_cell_tracks_font_size() {
        assert!(matches!(LabelFont::builtin(6), LabelFont::Builtin { cell: 1 }));
        assert!(matches!(LabelFont::builtin(19), LabelFont::Builtin { cell: 1 }));
        assert!(matches!(LabelFont::builtin(51), LabelFont::Builtin { cell: 5 }));
    }

    #[test]
    fn builtin_metrics() {
        let font = LabelFont::Builtin { cell: 2 };
        assert_eq!(font.text_width("X402"), 46.0);
        assert_eq!(font.text_width(""), 0.0);
        assert_eq!(font.line_height(), 14.0);
    }

    #[test]
    fn builtin_ink_stays_inside_measured_box() {
        let font = LabelFont::Builtin { cell: 3 };
        let width = font.text_width("X402") as i32;
        let height = font.line_height() as i32;
        let mut inked = 0;
        font.rasterize("X402", (10, -4), |x, y, coverage| {
            assert!((10..10 + width).contains(&x), "x {x} outside label box");
            assert!((-4..-4 + height).contains(&y), "y {y} outside label box");
            assert_eq!(coverage, 1.0);
            inked += 1;
        });
        assert!(inked > 0);
    }

    #[test]
    fn missing_path_falls_back_to_builtin() {
        assert!(LabelFont::load(None, 19).is_builtin());
    }

    #[test]
    fn unparsable_face_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Arial.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(LabelFont::load(Some(&path), 19).is_builtin());
    }

    #[test]
    fn locator_matches_stem_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ARIAL.TTF"), b"").unwrap();
        std::fs::write(dir.path().join("arialbd.ttf"), b"").unwrap();
        std::fs::write(dir.path().join("Arial.otf"), b"").unwrap();

        let locator = FontLocator::with_dirs([dir.path().join("missing"), dir.path().to_path_buf()]);
        assert_eq!(locator.find("Arial"), Some(dir.path().join("ARIAL.TTF")));
        assert_eq!(locator.find("Helvetica"), None);
    }
}
