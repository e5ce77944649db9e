pub mod constants;
pub mod fetch;
pub mod layout;
mod options;
pub mod plan;
pub mod progress;
pub mod render;
mod selection;
mod sheet;
pub mod text;
mod types;

pub use fetch::{
    FileImageFetcher, HttpImageFetcher, ImageData, ImageFetchFailure, ImageFetcher,
    decode_image_data, fetch_with_timeout,
};
pub use options::*;
pub use plan::{GroupPlan, ItemOrder, PagePlan, PlanConfig, plan_pages};
pub use progress::{LogProgress, NoProgress, ProgressEvent, ProgressReporter, ProgressStatus};
pub use render::{
    CatalogArtifact, CatalogRenderer, Generation, PdfCanvas, generate_catalog, output_file_name,
};
pub use selection::*;
pub use sheet::{SheetFormat, load_sheet, parse_active, parse_sheet, parse_stock, parse_workbook};
pub use types::*;
