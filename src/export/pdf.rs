//! PDF Table Module
//! Renders one report as a paginated A4 table with a title line, an upload
//! date line and a fixed bold header repeated on every page.

use super::{ExportError, MISSING_CELL};
use crate::data::{FileRecord, Row};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

// A4 portrait, in points
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;

const TITLE_Y: f32 = 800.0;
const DATE_Y: f32 = 782.0;
const TABLE_TOP: f32 = 750.0;
const ROW_HEIGHT: f32 = 16.0;
const BODY_FONT_SIZE: i64 = 9;
const TITLE_FONT_SIZE: i64 = 14;
const DATE_FONT_SIZE: i64 = 10;

/// Body rows per page, leaving room for the header row above them.
const ROWS_PER_PAGE: usize = 40;

/// Approximate glyph advance at the body size, used to truncate cell text
/// to its column slot. Layout behavior only; the data is never touched.
const CHAR_WIDTH: f32 = 5.0;

pub(super) fn payload(file: &FileRecord) -> Result<Vec<u8>, ExportError> {
    let columns = file.columns();
    let col_width = (PAGE_WIDTH - 2.0 * MARGIN) / columns.len().max(1) as f32;
    let char_budget = (col_width / CHAR_WIDTH).max(1.0) as usize;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => regular, "F2" => bold },
    });

    // An empty report still renders one page with title and header.
    let chunks: Vec<&[Row]> = if file.rows.is_empty() {
        vec![&[]]
    } else {
        file.rows.chunks(ROWS_PER_PAGE).collect()
    };

    let mut page_ids = Vec::with_capacity(chunks.len());
    for (page_idx, chunk) in chunks.iter().enumerate() {
        let mut ops = Vec::new();

        if page_idx == 0 {
            draw_text(&mut ops, "F2", TITLE_FONT_SIZE, MARGIN, TITLE_Y, &file.name);
            let date_line = file.uploaded_at.format("%d/%m/%Y %H:%M").to_string();
            draw_text(&mut ops, "F1", DATE_FONT_SIZE, MARGIN, DATE_Y, &date_line);
        }

        // Header row, bold, repeated on every page.
        for (col_idx, column) in columns.iter().enumerate() {
            let x = MARGIN + col_idx as f32 * col_width;
            draw_text(
                &mut ops,
                "F2",
                BODY_FONT_SIZE,
                x,
                TABLE_TOP,
                &fit(column, char_budget),
            );
        }

        for (row_idx, row) in chunk.iter().enumerate() {
            let y = TABLE_TOP - (row_idx as f32 + 1.0) * ROW_HEIGHT;
            for (col_idx, column) in columns.iter().enumerate() {
                let x = MARGIN + col_idx as f32 * col_width;
                let value = row.get(column).unwrap_or(MISSING_CELL);
                draw_text(&mut ops, "F1", BODY_FONT_SIZE, x, y, &fit(value, char_budget));
            }
        }

        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn draw_text(ops: &mut Vec<Operation>, font: &str, size: i64, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    ops.push(Operation::new("ET", vec![]));
}

fn fit(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        text.to_string()
    } else {
        text.chars().take(budget).collect()
    }
}
