//! Paginated PDF table output.
//!
//! Pages are A4 portrait in the standard Helvetica faces, so no fonts are
//! embedded. Text is WinAnsi-encoded; characters outside Latin-1 print as `?`.

use crate::error::{ExportError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId};
use sheetsift_sheet::Sheet;

/// Page geometry and type sizes, in points
#[derive(Debug, Clone)]
pub struct PdfLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub font_size: f32,
    pub title_height: f32,
    pub header_height: f32,
    pub row_height: f32,
    pub cell_padding: f32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin: 36.0,
            font_size: 9.0,
            title_height: 20.0,
            header_height: 16.0,
            row_height: 14.0,
            cell_padding: 3.0,
        }
    }
}

impl PdfLayout {
    /// Data rows that fit on one page below the title and header
    #[must_use]
    pub fn rows_per_page(&self) -> usize {
        let usable =
            self.page_height - 2.0 * self.margin - self.title_height - self.header_height;
        ((usable / self.row_height).floor() as usize).max(1)
    }

    /// Pages needed for `rows` data rows; a header-only table still gets one page
    #[must_use]
    pub fn page_count(&self, rows: usize) -> usize {
        rows.div_ceil(self.rows_per_page()).max(1)
    }

    fn column_width(&self, columns: usize) -> f32 {
        (self.page_width - 2.0 * self.margin) / columns.max(1) as f32
    }

    /// Characters that fit in a column, using Helvetica's average advance
    fn chars_per_column(&self, columns: usize) -> usize {
        let avg_char = self.font_size * 0.55;
        let room = self.column_width(columns) - 2.0 * self.cell_padding;
        if room <= 0.0 {
            0
        } else {
            (room / avg_char).floor() as usize
        }
    }
}

/// Cut `text` to at most `max` characters, ending with "..." when cut
pub(crate) fn truncate(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    if max < 4 {
        return text.chars().take(max).collect();
    }
    let mut cut: String = text.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

/// Encode text as WinAnsi bytes for a PDF string literal
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn text_op(font: &str, size: f32, x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
        Operation::new("ET", vec![]),
    ]
}

fn rect_op(x: f32, y: f32, w: f32, h: f32) -> Operation {
    Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()])
}

struct PageWriter<'a> {
    layout: &'a PdfLayout,
    columns: usize,
    col_width: f32,
    max_chars: usize,
    ops: Vec<Operation>,
}

impl<'a> PageWriter<'a> {
    fn new(layout: &'a PdfLayout, columns: usize) -> Self {
        Self {
            layout,
            columns,
            col_width: layout.column_width(columns),
            max_chars: layout.chars_per_column(columns),
            ops: Vec::new(),
        }
    }

    fn title(&mut self, title: &str, page: usize, pages: usize) {
        let l = self.layout;
        let y = l.page_height - l.margin - l.font_size - 2.0;
        let line = format!("{title}  (page {page} of {pages})");
        self.ops.extend(text_op("F2", l.font_size + 2.0, l.margin, y, &line));
    }

    /// Draw one table row whose top edge is at `top`
    fn row(&mut self, top: f32, height: f32, cells: &[String], header: bool) {
        let l = self.layout;
        let bottom = top - height;
        let width = self.col_width * self.columns as f32;

        if header {
            self.ops.push(Operation::new("q", vec![]));
            self.ops.push(Operation::new("g", vec![0.88_f32.into()]));
            self.ops.push(rect_op(l.margin, bottom, width, height));
            self.ops.push(Operation::new("f", vec![]));
            self.ops.push(Operation::new("Q", vec![]));
        }

        self.ops.push(Operation::new("G", vec![0.6_f32.into()]));
        self.ops.push(Operation::new("w", vec![0.5_f32.into()]));
        for col in 0..self.columns {
            let x = l.margin + col as f32 * self.col_width;
            self.ops.push(rect_op(x, bottom, self.col_width, height));
        }
        self.ops.push(Operation::new("S", vec![]));

        let font = if header { "F2" } else { "F1" };
        let baseline = bottom + (height - l.font_size) / 2.0 + 2.0;
        for (col, text) in cells.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let x = l.margin + col as f32 * self.col_width + l.cell_padding;
            let shown = truncate(text, self.max_chars);
            self.ops.extend(text_op(font, l.font_size, x, baseline, &shown));
        }
    }

    fn finish(self) -> Content {
        Content {
            operations: self.ops,
        }
    }
}

fn pdf_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

fn add_page(doc: &mut Document, pages_id: ObjectId, content: &Content) -> Result<ObjectId> {
    let stream = lopdf::Stream::new(dictionary! {}, content.encode().map_err(pdf_error)?);
    let content_id = doc.add_object(stream);
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

/// Render a sheet as a paginated PDF table, header repeated on each page
pub fn render_pdf(
    sheet: &Sheet,
    title: &str,
    layout: &PdfLayout,
    compress: bool,
) -> Result<Vec<u8>> {
    let columns = sheet.width();
    if columns == 0 {
        return Err(ExportError::EmptySheet);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let headers: Vec<String> = sheet.headers().to_vec();
    let per_page = layout.rows_per_page();
    let pages = layout.page_count(sheet.row_count());
    let table_top = layout.page_height - layout.margin - layout.title_height;

    let mut kids: Vec<Object> = Vec::with_capacity(pages);
    for page in 0..pages {
        let mut writer = PageWriter::new(layout, columns);
        writer.title(title, page + 1, pages);
        writer.row(table_top, layout.header_height, &headers, true);

        let start = page * per_page;
        let end = (start + per_page).min(sheet.row_count());
        let mut top = table_top - layout.header_height;
        for row in &sheet.rows()[start..end] {
            // nulls print as empty cells
            let cells: Vec<String> = row.iter().map(|c| c.as_str()).collect();
            writer.row(top, layout.row_height, &cells, false);
            top -= layout.row_height;
        }

        let page_id = add_page(&mut doc, pages_id, &writer.finish())?;
        kids.push(page_id.into());
    }

    let page_count = i64::try_from(kids.len()).map_err(pdf_error)?;
    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        layout.page_width.into(),
        layout.page_height.into(),
    ];
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(win_ansi(title)),
        "Producer" => Object::string_literal("sheetsift"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    if compress {
        doc.compress();
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(pdf_error)?;

    tracing::debug!(pages, rows = sheet.row_count(), "rendered PDF");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("a long sentence", 8), "a lon...");
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("Aé€"), vec![b'A', 0xE9, b'?']);
    }

    #[test]
    fn test_layout_pages() {
        let layout = PdfLayout::default();
        let per_page = layout.rows_per_page();
        assert!(per_page > 10);
        assert_eq!(layout.page_count(0), 1);
        assert_eq!(layout.page_count(per_page), 1);
        assert_eq!(layout.page_count(per_page + 1), 2);
    }

    #[test]
    fn test_narrow_columns_still_render() {
        let layout = PdfLayout::default();
        assert!(layout.chars_per_column(1) > layout.chars_per_column(10));
        assert_eq!(layout.chars_per_column(10_000), 0);
    }
}
