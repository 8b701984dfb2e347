//! Table snapshot as a raster image.
//!
//! Glyphs come from the 8x8 bitmap fonts in `font8x8`, scaled up; no system
//! fonts are needed.

use crate::error::{ExportError, Result};
use crate::format::ExportFormat;
use crate::pdf::truncate;
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{Rgb, RgbImage};
use sheetsift_sheet::Sheet;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const HEADER_FILL: Rgb<u8> = Rgb([230, 230, 230]);
const GRID: Rgb<u8> = Rgb([150, 150, 150]);
const INK: Rgb<u8> = Rgb([20, 20, 20]);

/// Pixel geometry of the rendered table
#[derive(Debug, Clone)]
pub struct ImageLayout {
    /// Each font pixel becomes a `scale`×`scale` block
    pub scale: u32,
    pub padding: u32,
    /// Widest column, in characters
    pub max_column_chars: usize,
    /// Largest allowed width or height; JPEG tops out at 65535
    pub max_dimension: u32,
}

impl Default for ImageLayout {
    fn default() -> Self {
        Self {
            scale: 2,
            padding: 6,
            max_column_chars: 40,
            max_dimension: 65_500,
        }
    }
}

impl ImageLayout {
    fn glyph_size(&self) -> u32 {
        8 * self.scale
    }

    /// Height of every row, header included
    #[must_use]
    pub fn row_height(&self) -> u32 {
        self.glyph_size() + 2 * self.padding
    }

    /// Column widths in characters: the longest text, capped
    #[must_use]
    pub fn column_chars(&self, sheet: &Sheet) -> Vec<usize> {
        sheet
            .headers()
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let widest_cell = sheet
                    .rows()
                    .iter()
                    .map(|row| row[col].display_text().chars().count())
                    .max()
                    .unwrap_or(0);
                header
                    .chars()
                    .count()
                    .max(widest_cell)
                    .clamp(1, self.max_column_chars)
            })
            .collect()
    }

    /// Image size for a sheet
    #[must_use]
    pub fn dimensions(&self, sheet: &Sheet) -> (u64, u64) {
        let char_px = u64::from(self.glyph_size());
        let pad = u64::from(self.padding);
        let width: u64 = self
            .column_chars(sheet)
            .iter()
            .map(|&chars| chars as u64 * char_px + 2 * pad)
            .sum::<u64>()
            + 1;
        let height = (sheet.row_count() as u64 + 1) * u64::from(self.row_height()) + 1;
        (width, height)
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

struct Canvas<'a> {
    img: RgbImage,
    layout: &'a ImageLayout,
}

impl Canvas<'_> {
    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
        let x_end = (x + w).min(self.img.width());
        let y_end = (y + h).min(self.img.height());
        for py in y..y_end {
            for px in x..x_end {
                self.img.put_pixel(px, py, color);
            }
        }
    }

    fn text(&mut self, x: u32, y: u32, text: &str) {
        let scale = self.layout.scale;
        for (i, c) in text.chars().enumerate() {
            let origin_x = x + i as u32 * self.layout.glyph_size();
            for (gy, bits) in glyph(c).iter().enumerate() {
                for gx in 0..8u32 {
                    // bit 0 is the leftmost pixel
                    if bits & (1 << gx) != 0 {
                        self.fill(
                            origin_x + gx * scale,
                            y + gy as u32 * scale,
                            scale,
                            scale,
                            INK,
                        );
                    }
                }
            }
        }
    }
}

/// Draw the table: grey header band, grid lines, `NULL` for null cells
pub fn render_image(sheet: &Sheet, layout: &ImageLayout) -> Result<RgbImage> {
    if sheet.width() == 0 {
        return Err(ExportError::EmptySheet);
    }

    let (width, height) = layout.dimensions(sheet);
    let max = layout.max_dimension;
    if width > u64::from(max) || height > u64::from(max) {
        return Err(ExportError::ImageTooLarge {
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
            max,
        });
    }
    let (width, height) = (width as u32, height as u32);

    let mut canvas = Canvas {
        img: RgbImage::from_pixel(width, height, WHITE),
        layout,
    };

    let chars = layout.column_chars(sheet);
    let col_widths: Vec<u32> = chars
        .iter()
        .map(|&c| c as u32 * layout.glyph_size() + 2 * layout.padding)
        .collect();
    let row_h = layout.row_height();

    canvas.fill(0, 0, width, row_h, HEADER_FILL);

    let header_cells: Vec<String> = sheet.headers().to_vec();
    let body = sheet
        .rows()
        .iter()
        .map(|row| row.iter().map(|c| c.display_text()).collect::<Vec<_>>());

    for (r, cells) in std::iter::once(header_cells).chain(body).enumerate() {
        let top = r as u32 * row_h;
        let mut left = 0;
        for (col, text) in cells.iter().enumerate() {
            let shown = truncate(text, chars[col]);
            canvas.text(left + layout.padding, top + layout.padding, &shown);
            left += col_widths[col];
        }
    }

    // grid
    for r in 0..=sheet.row_count() + 1 {
        canvas.fill(0, r as u32 * row_h, width, 1, GRID);
    }
    let mut left = 0;
    canvas.fill(0, 0, 1, height, GRID);
    for w in &col_widths {
        left += w;
        canvas.fill(left, 0, 1, height, GRID);
    }

    tracing::debug!(width, height, "rendered table image");
    Ok(canvas.img)
}

/// Encode a rendered table as JPEG or PNG
pub fn encode(img: &RgbImage, format: ExportFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        ExportFormat::Jpeg => {
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut out, jpeg_quality))?;
        }
        ExportFormat::Png => {
            img.write_with_encoder(PngEncoder::new(&mut out))?;
        }
        other => return Err(ExportError::UnknownFormat(format!("{other} is not an image format"))),
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetsift_sheet::CellValue;

    fn sample() -> Sheet {
        Sheet::from_data(vec![
            vec![CellValue::from("Id"), CellValue::from("Comment")],
            vec![CellValue::Int(1), CellValue::Null],
            vec![CellValue::Int(2), CellValue::from("x".repeat(100))],
        ])
    }

    #[test]
    fn test_column_chars_capped() {
        let layout = ImageLayout::default();
        // "NULL" is 4 wide, the long comment is capped
        assert_eq!(layout.column_chars(&sample()), vec![2, 40]);
    }

    #[test]
    fn test_dimensions_match_render() {
        let layout = ImageLayout::default();
        let sheet = sample();
        let (w, h) = layout.dimensions(&sheet);
        let img = render_image(&sheet, &layout).unwrap();
        assert_eq!((u64::from(img.width()), u64::from(img.height())), (w, h));
        assert_eq!(u64::from(img.height()), 3 * u64::from(layout.row_height()) + 1);
    }

    #[test]
    fn test_header_band_and_grid() {
        let layout = ImageLayout::default();
        let img = render_image(&sample(), &layout).unwrap();

        assert_eq!(*img.get_pixel(0, 0), GRID);
        // inside header band, in the padding before any glyph
        assert_eq!(*img.get_pixel(2, 2), HEADER_FILL);
        // inside a body cell's padding
        assert_eq!(*img.get_pixel(2, layout.row_height() + 2), WHITE);
    }

    #[test]
    fn test_text_is_drawn() {
        let layout = ImageLayout::default();
        let img = render_image(&sample(), &layout).unwrap();
        let ink = img.pixels().filter(|p| **p == INK).count();
        assert!(ink > 0);
    }

    #[test]
    fn test_too_large() {
        let layout = ImageLayout {
            max_dimension: 50,
            ..ImageLayout::default()
        };
        assert!(matches!(
            render_image(&sample(), &layout),
            Err(ExportError::ImageTooLarge { max: 50, .. })
        ));
    }

    #[test]
    fn test_encode_rejects_non_image() {
        let img = RgbImage::new(1, 1);
        assert!(encode(&img, ExportFormat::Csv, 90).is_err());
    }
}
