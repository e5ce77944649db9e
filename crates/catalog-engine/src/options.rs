use crate::layout::{Cell, GridGeometry, GridSpec, card_layout, compute_grid};
use crate::plan::{ItemOrder, PlanConfig};
use crate::types::*;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Base dimensions, always portrait for the standard sizes
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Texts printed on the cover and page headers
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Branding {
    pub title: String,
    pub title_second_line: String,
    pub subtitle: String,
    pub footer: String,
    /// Title shown in the header band of every content page
    pub header_title: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            title: "CATÁLOGO".to_string(),
            title_second_line: "DE PRODUTOS".to_string(),
            subtitle: "Peças e Acessórios para Ciclismo".to_string(),
            footer: "Catalogo Digital - Versao 2.0".to_string(),
            header_title: "CATÁLOGO DE PRODUTOS".to_string(),
        }
    }
}

/// Complete catalog configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CatalogOptions {
    // Page
    pub paper_size: PaperSize,
    pub orientation: Orientation,

    // Grid
    pub margin_mm: f32,
    pub header_height_mm: f32,
    pub columns: usize,
    pub rows: usize,
    pub gap_mm: f32,
    /// Height reserved below the image for the code badge and name
    pub text_area_height_mm: f32,

    // Structure
    pub group_by_category: bool,
    /// Order of items in the ungrouped catalog
    pub item_order: ItemOrder,

    // Image fetching
    pub image_url_template: String,
    pub fetch_timeout_ms: u64,

    // Cooperative scheduling
    pub yield_every: usize,
    pub yield_pause_ms: u64,

    pub branding: Branding,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margin_mm: 8.0,
            header_height_mm: 25.0,
            columns: 3,
            rows: 4,
            gap_mm: 4.0,
            text_area_height_mm: 18.0,
            group_by_category: true,
            item_order: ItemOrder::ByName,
            image_url_template: crate::fetch::DEFAULT_URL_TEMPLATE.to_string(),
            fetch_timeout_ms: 8000,
            yield_every: 5,
            yield_pause_ms: 10,
            branding: Branding::default(),
        }
    }
}

impl CatalogOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| CatalogError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        self.paper_size.dimensions_with_orientation(self.orientation)
    }

    pub fn grid_spec(&self) -> GridSpec {
        let (page_width_mm, page_height_mm) = self.page_dimensions_mm();
        GridSpec {
            page_width_mm,
            page_height_mm,
            margin_mm: self.margin_mm,
            header_height_mm: self.header_height_mm,
            columns: self.columns,
            rows: self.rows,
            gap_mm: self.gap_mm,
        }
    }

    pub fn grid(&self) -> Result<GridGeometry> {
        compute_grid(&self.grid_spec())
    }

    pub fn items_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Planner inputs derived from these options
    pub fn plan_config(&self) -> PlanConfig {
        let (_, page_height_mm) = self.page_dimensions_mm();
        PlanConfig {
            group_by_category: self.group_by_category,
            items_per_page: self.items_per_page(),
            order: self.item_order,
            index_entries_per_page: crate::render::index_entries_per_page(page_height_mm),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn yield_pause(&self) -> Duration {
        Duration::from_millis(self.yield_pause_ms)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let grid = self.grid()?;

        // Card padding is taken off the image area as well
        let cell = Cell::new(0.0, 0.0, grid.cell_width, grid.cell_height);
        let image_area = card_layout(cell, self.text_area_height_mm).image_area;
        if self.text_area_height_mm < 0.0 || image_area.width <= 0.0 || image_area.height <= 0.0 {
            return Err(CatalogError::InvalidGeometry(format!(
                "text area of {:.1}mm leaves no room for the image in a {:.1}x{:.1}mm cell",
                self.text_area_height_mm, grid.cell_width, grid.cell_height
            )));
        }

        if self.fetch_timeout_ms == 0 {
            return Err(CatalogError::Config(
                "Image fetch timeout must be greater than zero".to_string(),
            ));
        }

        if !self.image_url_template.contains(crate::fetch::REF_PLACEHOLDER) {
            return Err(CatalogError::Config(format!(
                "Image URL template must contain {}",
                crate::fetch::REF_PLACEHOLDER
            )));
        }

        Ok(())
    }
}
