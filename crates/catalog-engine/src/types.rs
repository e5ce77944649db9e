use thiserror::Error;

/// Group name used for items whose category is blank
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Page plan drift: {0}")]
    PlanDrift(String),
    #[error("No items selected")]
    EmptySelection,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Invalid sheet: {0}")]
    Sheet(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Catalog generation failed: {0}")]
    Job(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// One product row read from the source sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Unique key for selection, also shown as a badge
    pub code: String,
    pub name: String,
    pub active: bool,
    pub stock_balance: f64,
    /// Raw category as read; see [`CatalogItem::category_name`]
    pub category: String,
    /// Image reference; empty means the item has no image
    pub image_ref: String,
    pub notes: String,
}

impl CatalogItem {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            active: true,
            stock_balance: 0.0,
            category: String::new(),
            image_ref: String::new(),
            notes: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }

    pub fn with_stock(mut self, stock_balance: f64) -> Self {
        self.stock_balance = stock_balance;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Category used for grouping, blank categories fall back to [`UNCATEGORIZED`]
    pub fn category_name(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            UNCATEGORIZED
        } else {
            trimmed
        }
    }

    pub fn has_image(&self) -> bool {
        !self.image_ref.trim().is_empty()
    }
}
