use crate::label_font::LabelFont;
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageBuffer, ImageEncoder, Rgba, RgbaImage,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::Path,
};

/// Square RGBA pixel buffer an icon is composed on.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// A `size` × `size` canvas with every pixel set to `color`.
    pub fn filled(size: u32, color: Rgba<u8>) -> Self {
        Self {
            pixels: ImageBuffer::from_pixel(size, size, color),
        }
    }

    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Draws `text` with its line box at `origin`. Ink outside the canvas is
    /// clipped, so a negative origin is fine.
    pub fn draw_text(&mut self, font: &LabelFont, text: &str, origin: (i32, i32), color: Rgba<u8>) {
        let (width, height) = self.pixels.dimensions();
        let pixels = &mut self.pixels;
        font.rasterize(text, origin, |x, y, coverage| {
            if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                return;
            }
            let dst = pixels.get_pixel_mut(x as u32, y as u32);
            *dst = blend(*dst, color, coverage);
        });
    }

    /// Encodes the canvas as PNG into memory.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        write_png(self.pixels.as_raw(), &mut buf, self.pixels.width(), self.pixels.height())?;
        Ok(buf)
    }

    /// Writes the canvas as PNG, creating missing parent directories.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)
                .with_context(|| format!("Can't create directory {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
        let mut out_file = BufWriter::new(file);
        write_png(
            self.pixels.as_raw(),
            &mut out_file,
            self.pixels.width(),
            self.pixels.height(),
        )
        .context("Failed to write PNG")?;
        out_file.flush()?;
        Ok(())
    }
}

/// Source-over blend of `src` onto `dst`, scaled by `coverage` in `0..=1`.
fn blend(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let alpha = coverage.clamp(0.0, 1.0) * src[3] as f32 / 255.0;
    let mix = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * alpha).round() as u8;
    let out_alpha = (src[3] as f32 * alpha + dst[3] as f32 * (1.0 - alpha)).round() as u8;
    Rgba([mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2]), out_alpha])
}

// Encode RGBA data as PNG with compression
pub(crate) fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgba8)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Rgba<u8> = Rgba([0, 82, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(BLUE, WHITE, 0.0), BLUE);
        assert_eq!(blend(BLUE, WHITE, 1.0), WHITE);
        assert_eq!(blend(BLUE, WHITE, 0.5), Rgba([128, 169, 255, 255]));
    }

    #[test]
    fn text_is_clipped_at_the_edges() {
        let mut canvas = Canvas::filled(8, BLUE);
        canvas.draw_text(&LabelFont::Builtin { cell: 1 }, "X", (-2, -3), WHITE);
        // Row 3 of 'X' is a single centered dot at column 2, i.e. (0, 0) here.
        assert_eq!(*canvas.pixels().get_pixel(0, 0), WHITE);
        assert_eq!(*canvas.pixels().get_pixel(7, 7), BLUE);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.png");
        Canvas::filled(4, BLUE).save_png(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(*decoded.get_pixel(3, 3), BLUE);
    }
}
