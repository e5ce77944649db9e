use std::path::PathBuf;
use tokio::sync::mpsc;

mod handlers;
mod worker;

pub use worker::worker_task;

// Re-export types from the engine crate
pub use catalog_engine::{
    CatalogItem, CatalogOptions, ItemFilter, ProgressEvent, ProgressReporter, ProgressStatus,
};

/// Commands sent from a host (CLI or UI) to the worker
#[derive(Debug)]
pub enum CatalogCommand {
    /// Read a CSV sheet and keep the rows that pass `filter`
    LoadSheet {
        input_path: PathBuf,
        filter: ItemFilter,
    },
    LoadConfig {
        path: PathBuf,
    },
    Generate {
        items: Vec<CatalogItem>,
        options: CatalogOptions,
        output_dir: PathBuf,
        /// Read images from this directory instead of the URL template
        image_dir: Option<PathBuf>,
        logo_path: Option<PathBuf>,
    },
}

/// Updates sent from the worker back to the host
#[derive(Debug, Clone)]
pub enum CatalogUpdate {
    SheetLoaded {
        items: Vec<CatalogItem>,
        /// Rows read before filtering
        total_rows: usize,
    },
    ConfigLoaded {
        options: CatalogOptions,
    },
    Progress(ProgressEvent),
    Complete {
        path: PathBuf,
        page_count: usize,
        item_count: usize,
        images_failed: usize,
    },
    /// Generation was requested with no items
    EmptySelection,
    Error {
        message: String,
    },
}

/// Forwards render progress to the update channel
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    update_tx: mpsc::UnboundedSender<CatalogUpdate>,
}

impl ChannelReporter {
    pub fn new(update_tx: mpsc::UnboundedSender<CatalogUpdate>) -> Self {
        Self { update_tx }
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, event: ProgressEvent) {
        let _ = self.update_tx.send(CatalogUpdate::Progress(event));
    }
}
