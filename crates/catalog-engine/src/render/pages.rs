//! Drawing of the individual page kinds
//!
//! Every function draws onto the page most recently started on the canvas.

use super::{Canvas, ShapeStyle, TextStyle};
use crate::constants::*;
use crate::fetch::ImageData;
use crate::layout::{CardLayout, Cell, fit_image};
use crate::options::Branding;
use crate::plan::GroupPlan;
use crate::text::{fit_to_width, text_width_mm, truncate, wrap_lines, wrap_text};
use crate::types::{CatalogItem, Result};

/// Page-independent values shared by all drawing functions
pub(crate) struct PageContext<'a> {
    pub page_width: f32,
    pub page_height: f32,
    pub branding: &'a Branding,
    /// Generation date as printed on the pages
    pub date_label: String,
    pub grouped: bool,
}

/// Index rows per column on a page of `page_height_mm`
fn index_rows_per_column(page_height_mm: f32) -> usize {
    let rows = ((page_height_mm - INDEX_RESERVED_HEIGHT) / INDEX_ROW_HEIGHT).floor();
    if rows.is_finite() && rows >= 1.0 {
        rows as usize
    } else {
        1
    }
}

/// Number of categories listed on one index page
pub fn index_entries_per_page(page_height_mm: f32) -> usize {
    index_rows_per_column(page_height_mm) * INDEX_COLUMNS
}

// =============================================================================
// Cover
// =============================================================================

pub(crate) fn draw_cover<C: Canvas>(
    canvas: &mut C,
    ctx: &PageContext<'_>,
    item_count: usize,
    logo: Option<&ImageData>,
) {
    let w = ctx.page_width;
    let h = ctx.page_height;
    let center = w / 2.0;

    canvas.rect(Cell::new(0.0, 0.0, w, h), &ShapeStyle::filled(COVER_BACKGROUND));
    canvas.rect(
        Cell::new(0.0, 0.0, w, h * 0.7),
        &ShapeStyle::filled(COVER_BAND_MIDDLE),
    );
    canvas.rect(
        Cell::new(0.0, 0.0, w, h * 0.4),
        &ShapeStyle::filled(COVER_BAND_TOP),
    );

    if let Some(logo) = logo {
        let slot = Cell::new(w * 0.15, h * 0.1, w * 0.7, h * 0.2);
        let area = fit_image(logo.width, logo.height, slot);
        if let Err(e) = canvas.image(logo, area) {
            log::warn!("Could not draw cover logo: {}", e);
        }
    }

    let title = fit_to_width(&ctx.branding.title, w - 40.0, COVER_TITLE_SIZE, true);
    canvas.text(
        &title,
        center,
        h * 0.5,
        &TextStyle::new(COVER_TITLE_SIZE, WHITE).bold().centered(),
    );
    canvas.text(
        &ctx.branding.title_second_line,
        center,
        h * 0.54,
        &TextStyle::new(COVER_TITLE_SECOND_LINE_SIZE, WHITE).centered(),
    );
    canvas.text(
        &ctx.branding.subtitle,
        center,
        h * 0.58,
        &TextStyle::new(COVER_SUBTITLE_SIZE, COVER_SUBTITLE).centered(),
    );

    canvas.rect(
        Cell::new(w * 0.15, h * 0.72, w * 0.7, 25.0),
        &ShapeStyle::filled(COVER_BAND_MIDDLE)
            .outlined(COVER_BAND_TOP, 0.3)
            .rounded(5.0),
    );
    canvas.text(
        &format!("{} PRODUTOS", item_count),
        center,
        h * 0.755,
        &TextStyle::new(12.0, WHITE).bold().centered(),
    );
    canvas.text(
        &format!("Gerado em {}", ctx.date_label),
        center,
        h * 0.775,
        &TextStyle::new(10.0, COVER_SUBTITLE).centered(),
    );

    canvas.text(
        &ctx.branding.footer,
        center,
        h * 0.95,
        &TextStyle::new(8.0, COVER_FOOTER).centered(),
    );
}

// =============================================================================
// Index
// =============================================================================

/// Draw one index page listing `groups`; `first_ordinal` numbers the first row
pub(crate) fn draw_index_page<C: Canvas>(
    canvas: &mut C,
    ctx: &PageContext<'_>,
    groups: &[GroupPlan],
    first_ordinal: usize,
    with_tip: bool,
) {
    let w = ctx.page_width;
    let h = ctx.page_height;

    canvas.rect(Cell::new(0.0, 0.0, w, 40.0), &ShapeStyle::filled(COVER_BAND_TOP));
    canvas.text(
        INDEX_TITLE,
        w / 2.0,
        18.0,
        &TextStyle::new(INDEX_TITLE_SIZE, WHITE).bold().centered(),
    );
    canvas.text(
        INDEX_SUBTITLE,
        w / 2.0,
        32.0,
        &TextStyle::new(12.0, HEADER_RULE).centered(),
    );

    let rows_per_column = index_rows_per_column(h);
    let column_width = (w - 40.0) / INDEX_COLUMNS as f32;

    for (i, group) in groups.iter().enumerate() {
        let column = i / rows_per_column;
        let row = i % rows_per_column;
        let x = if column == 0 { 20.0 } else { w / 2.0 + 10.0 };
        let y = INDEX_FIRST_ROW_Y + row as f32 * INDEX_ROW_HEIGHT;
        let box_width = column_width - 10.0;

        canvas.rect(
            Cell::new(x, y - 2.0, box_width, INDEX_ROW_HEIGHT - 2.0),
            &ShapeStyle::filled(HEADER_BACKGROUND)
                .outlined(HEADER_RULE, 0.3)
                .rounded(3.0),
        );

        let name = truncate(&group.name, INDEX_NAME_MAX_CHARS);
        canvas.text(
            &format!("{}. {}", first_ordinal + i, name),
            x + 5.0,
            y + 4.0,
            &TextStyle::new(10.0, INDEX_NAME_TEXT).bold(),
        );
        canvas.text(
            &format!("{} produtos", group.item_count),
            x + 5.0,
            y + 9.5,
            &TextStyle::new(8.0, MUTED_TEXT),
        );
        canvas.text(
            &format!("Pág. {}", group.start_page),
            x + box_width - 5.0,
            y + 7.0,
            &TextStyle::new(9.0, ACCENT).bold().right(),
        );
    }

    if with_tip {
        canvas.rect(
            Cell::new(20.0, h - 50.0, w - 40.0, 30.0),
            &ShapeStyle::filled(TIP_BACKGROUND)
                .outlined(TIP_BORDER, 0.3)
                .rounded(3.0),
        );
        canvas.text(
            TIP_TITLE_TEXT,
            30.0,
            h - 40.0,
            &TextStyle::new(10.0, TIP_TITLE).bold(),
        );
        for (i, line) in TIP_LINES.iter().enumerate() {
            let line = fit_to_width(line, w - 60.0, 8.0, false);
            canvas.text(
                &line,
                30.0,
                h - 33.0 + i as f32 * 5.0,
                &TextStyle::new(8.0, TIP_TEXT),
            );
        }
    }
}

// =============================================================================
// Group intro
// =============================================================================

/// Category name, upper-cased, in up to three centred lines
pub(crate) fn draw_group_intro<C: Canvas>(canvas: &mut C, ctx: &PageContext<'_>, name: &str) {
    let max_width = ctx.page_width - 40.0;
    let title = name.to_uppercase();

    let wrapped = wrap_text(&title, max_width, GROUP_TITLE_SIZE, true);
    let overflow = wrapped.len() > GROUP_TITLE_MAX_LINES;
    let mut lines: Vec<String> = wrapped.into_iter().take(GROUP_TITLE_MAX_LINES).collect();
    if overflow {
        if let Some(last) = lines.last_mut() {
            *last = fit_to_width(
                &format!("{}{}", last, ELLIPSIS),
                max_width,
                GROUP_TITLE_SIZE,
                true,
            );
        }
    }

    let line_height = 25.0;
    let start_y = ctx.page_height / 2.0 - (lines.len() as f32 * line_height) / 2.0;
    let style = TextStyle::new(GROUP_TITLE_SIZE, ACCENT).bold().centered();

    for (i, line) in lines.iter().enumerate() {
        canvas.text(
            line,
            ctx.page_width / 2.0,
            start_y + i as f32 * line_height,
            &style,
        );
    }
}

// =============================================================================
// Content pages
// =============================================================================

/// Header band of a content page
pub(crate) fn draw_content_header<C: Canvas>(
    canvas: &mut C,
    ctx: &PageContext<'_>,
    header_height: f32,
    group_name: &str,
    page_number: usize,
) {
    let w = ctx.page_width;

    canvas.rect(
        Cell::new(0.0, 0.0, w, header_height),
        &ShapeStyle::filled(HEADER_BACKGROUND),
    );
    canvas.line((0.0, header_height), (w, header_height), HEADER_RULE, 0.5);

    canvas.text(
        &ctx.branding.header_title,
        15.0,
        10.0,
        &TextStyle::new(HEADER_TITLE_SIZE, HEADER_TEXT).bold(),
    );
    if ctx.grouped {
        canvas.text(
            &format!(
                "Categoria: {}",
                truncate(group_name, HEADER_CATEGORY_MAX_CHARS)
            ),
            15.0,
            19.0,
            &TextStyle::new(HEADER_DETAIL_SIZE, ACCENT),
        );
    }

    canvas.text(
        &format!("Página {}", page_number),
        w - 15.0,
        10.0,
        &TextStyle::new(HEADER_TITLE_SIZE, MUTED_TEXT).right(),
    );
    canvas.text(
        &ctx.date_label,
        w - 15.0,
        18.0,
        &TextStyle::new(HEADER_DETAIL_SIZE, MUTED_TEXT).right(),
    );
}

/// Card border drawn before the image is known
pub(crate) fn draw_card_frame<C: Canvas>(canvas: &mut C, layout: &CardLayout) {
    canvas.rect(
        layout.card,
        &ShapeStyle::filled(WHITE)
            .outlined(CARD_BORDER, 0.2)
            .rounded(2.0),
    );
}

/// Image fitted into the card's image area
pub(crate) fn draw_card_image<C: Canvas>(
    canvas: &mut C,
    layout: &CardLayout,
    image: &ImageData,
) -> Result<()> {
    let area = fit_image(image.width, image.height, layout.image_area);
    canvas.image(image, area)
}

pub(crate) fn draw_placeholder<C: Canvas>(canvas: &mut C, layout: &CardLayout) {
    let area = layout.image_area;
    canvas.rect(
        area,
        &ShapeStyle::filled(PLACEHOLDER_BACKGROUND).rounded(1.0),
    );

    let center_y = area.center_y();
    canvas.text(
        PLACEHOLDER_GLYPH,
        area.center_x(),
        center_y,
        &TextStyle::new(PLACEHOLDER_GLYPH_SIZE, PLACEHOLDER_TEXT)
            .bold()
            .centered(),
    );
    canvas.text(
        PLACEHOLDER_LABEL,
        area.center_x(),
        center_y + 8.0,
        &TextStyle::new(PLACEHOLDER_LABEL_SIZE, PLACEHOLDER_TEXT).centered(),
    );
}

/// Code badge and wrapped item name below the image area
pub(crate) fn draw_card_labels<C: Canvas>(canvas: &mut C, layout: &CardLayout, item: &CatalogItem) {
    let center_x = layout.card.center_x();

    let code = truncate(item.code.trim(), CODE_MAX_CHARS);
    if !code.is_empty() {
        let badge_width = text_width_mm(&code, CODE_BADGE_SIZE, true) + 4.0;
        canvas.rect(
            Cell::new(center_x - badge_width / 2.0, layout.text_top, badge_width, 6.0),
            &ShapeStyle::filled(ACCENT).rounded(2.0),
        );
        canvas.text(
            &code,
            center_x,
            layout.text_top + 4.2,
            &TextStyle::new(CODE_BADGE_SIZE, WHITE).bold().centered(),
        );
    }

    let name = truncate(item.name.trim(), NAME_MAX_CHARS);
    let lines = wrap_lines(
        &name,
        layout.card.width - 4.0,
        ITEM_NAME_SIZE,
        false,
        NAME_MAX_LINES,
    );
    let style = TextStyle::new(ITEM_NAME_SIZE, ITEM_NAME_TEXT).centered();
    for (i, line) in lines.iter().enumerate() {
        canvas.text(line, center_x, layout.text_top + 10.0 + i as f32 * 3.0, &style);
    }
}
