//! Shared constants for catalog rendering
//!
//! This module centralizes magic numbers used while drawing pages.

use crate::render::Rgb;

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Truncation Limits
// =============================================================================

/// Maximum characters of the product code badge
pub const CODE_MAX_CHARS: usize = 15;

/// Maximum characters of the product name
pub const NAME_MAX_CHARS: usize = 50;

/// Maximum lines of the product name
pub const NAME_MAX_LINES: usize = 2;

/// Maximum lines of a category title on its intro page
pub const GROUP_TITLE_MAX_LINES: usize = 3;

/// Maximum characters of a category name in the index
pub const INDEX_NAME_MAX_CHARS: usize = 35;

/// Maximum characters of a category name in a content page header
pub const HEADER_CATEGORY_MAX_CHARS: usize = 30;

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "...";

// =============================================================================
// Font Sizes (points)
// =============================================================================

pub const COVER_TITLE_SIZE: f32 = 36.0;
pub const COVER_TITLE_SECOND_LINE_SIZE: f32 = 28.0;
pub const COVER_SUBTITLE_SIZE: f32 = 14.0;
pub const INDEX_TITLE_SIZE: f32 = 24.0;
pub const GROUP_TITLE_SIZE: f32 = 48.0;
pub const HEADER_TITLE_SIZE: f32 = 10.0;
pub const HEADER_DETAIL_SIZE: f32 = 8.0;
pub const CODE_BADGE_SIZE: f32 = 6.0;
pub const ITEM_NAME_SIZE: f32 = 7.0;
pub const PLACEHOLDER_GLYPH_SIZE: f32 = 18.0;
pub const PLACEHOLDER_LABEL_SIZE: f32 = 8.0;

// =============================================================================
// Index Page
// =============================================================================

/// Top of the first index row (mm)
pub const INDEX_FIRST_ROW_Y: f32 = 55.0;

/// Height of one index row (mm)
pub const INDEX_ROW_HEIGHT: f32 = 16.0;

/// Vertical space reserved on the index page for the header and the tip box (mm)
pub const INDEX_RESERVED_HEIGHT: f32 = 100.0;

/// Index columns per page
pub const INDEX_COLUMNS: usize = 2;

// =============================================================================
// Colors
// =============================================================================

pub const COVER_BACKGROUND: Rgb = Rgb(15, 23, 42);
pub const COVER_BAND_MIDDLE: Rgb = Rgb(30, 41, 59);
pub const COVER_BAND_TOP: Rgb = Rgb(51, 65, 85);
pub const COVER_SUBTITLE: Rgb = Rgb(148, 163, 184);
pub const COVER_FOOTER: Rgb = Rgb(100, 116, 139);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const ACCENT: Rgb = Rgb(59, 130, 246);
pub const HEADER_BACKGROUND: Rgb = Rgb(248, 250, 252);
pub const HEADER_RULE: Rgb = Rgb(226, 232, 240);
pub const HEADER_TEXT: Rgb = Rgb(51, 65, 85);
pub const MUTED_TEXT: Rgb = Rgb(100, 116, 139);
pub const INDEX_NAME_TEXT: Rgb = Rgb(30, 41, 59);
pub const TIP_BACKGROUND: Rgb = Rgb(239, 246, 255);
pub const TIP_BORDER: Rgb = Rgb(147, 197, 253);
pub const TIP_TITLE: Rgb = Rgb(30, 64, 175);
pub const TIP_TEXT: Rgb = Rgb(30, 58, 138);
pub const CARD_BORDER: Rgb = Rgb(230, 230, 230);
pub const PLACEHOLDER_BACKGROUND: Rgb = Rgb(250, 250, 250);
pub const PLACEHOLDER_TEXT: Rgb = Rgb(180, 180, 180);
pub const ITEM_NAME_TEXT: Rgb = Rgb(40, 40, 40);

// =============================================================================
// Bezier Curve Constants
// =============================================================================

/// Control point factor for approximating quarter circles with Bezier curves:
/// 4 * (sqrt(2) - 1) / 3
pub const BEZIER_CIRCLE_FACTOR: f32 = 0.552_284_8;

// =============================================================================
// Labels
// =============================================================================

pub const PLACEHOLDER_GLYPH: &str = "IMG";
pub const PLACEHOLDER_LABEL: &str = "Sem imagem";
pub const INDEX_TITLE: &str = "ÍNDICE DE CATEGORIAS";
pub const INDEX_SUBTITLE: &str = "Navegue pelas principais categorias de produtos";
pub const TIP_TITLE_TEXT: &str = "Dica de navegação";
pub const TIP_LINES: [&str; 2] = [
    "Use o número da página ao lado de cada categoria para ir direto aos produtos.",
    "Os produtos de cada categoria começam após a página de abertura.",
];
