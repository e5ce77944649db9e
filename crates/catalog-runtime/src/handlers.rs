use crate::{CatalogUpdate, ChannelReporter};
use catalog_engine::{
    CatalogItem, CatalogOptions, CatalogRenderer, FileImageFetcher, Generation, HttpImageFetcher,
    ImageData, ImageFetcher, ItemFilter, decode_image_data,
};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

pub async fn handle_load_sheet(
    input_path: PathBuf,
    filter: ItemFilter,
    update_tx: &mpsc::UnboundedSender<CatalogUpdate>,
) {
    match catalog_engine::load_sheet(&input_path).await {
        Ok(rows) => {
            let total_rows = rows.len();
            let items: Vec<CatalogItem> = filter.apply(&rows).into_iter().cloned().collect();
            log::info!(
                "{} of {} sheet rows pass the filter",
                items.len(),
                total_rows
            );
            let _ = update_tx.send(CatalogUpdate::SheetLoaded { items, total_rows });
        }
        Err(e) => {
            let _ = update_tx.send(CatalogUpdate::Error {
                message: format!("Failed to load sheet: {e}"),
            });
        }
    }
}

pub async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<CatalogUpdate>) {
    let loaded = match CatalogOptions::load(&path).await {
        Ok(options) => options.validate().map(|()| options),
        Err(e) => Err(e),
    };
    match loaded {
        Ok(options) => {
            let _ = update_tx.send(CatalogUpdate::ConfigLoaded { options });
        }
        Err(e) => {
            let _ = update_tx.send(CatalogUpdate::Error {
                message: format!("Failed to load config: {e}"),
            });
        }
    }
}

/// Read and check the cover logo; a bad logo is logged and skipped
async fn load_logo(path: &Path) -> Option<ImageData> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Could not read logo {}: {}", path.display(), e);
            return None;
        }
    };
    match decode_image_data(bytes) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("Ignoring logo {}: {}", path.display(), e);
            None
        }
    }
}

pub async fn handle_generate(
    items: Vec<CatalogItem>,
    options: CatalogOptions,
    output_dir: PathBuf,
    image_dir: Option<PathBuf>,
    logo_path: Option<PathBuf>,
    update_tx: &mpsc::UnboundedSender<CatalogUpdate>,
) {
    let logo = match &logo_path {
        Some(path) => load_logo(path).await,
        None => None,
    };

    match image_dir {
        Some(dir) => {
            let fetcher = FileImageFetcher::new(dir);
            generate_with(&fetcher, &items, &options, &output_dir, logo, update_tx).await;
        }
        None => {
            let fetcher = HttpImageFetcher::new(options.image_url_template.clone());
            generate_with(&fetcher, &items, &options, &output_dir, logo, update_tx).await;
        }
    }
}

async fn generate_with<F: ImageFetcher>(
    fetcher: &F,
    items: &[CatalogItem],
    options: &CatalogOptions,
    output_dir: &Path,
    logo: Option<ImageData>,
    update_tx: &mpsc::UnboundedSender<CatalogUpdate>,
) {
    let reporter = ChannelReporter::new(update_tx.clone());
    let renderer = CatalogRenderer::new(options, fetcher, &reporter).with_logo(logo);

    let artifact = match renderer.render_pdf(items).await {
        Ok(Generation::Completed(artifact)) => artifact,
        Ok(Generation::EmptySelection) => {
            let _ = update_tx.send(CatalogUpdate::EmptySelection);
            return;
        }
        Err(e) => {
            let _ = update_tx.send(CatalogUpdate::Error {
                message: format!("Failed to generate catalog: {e}"),
            });
            return;
        }
    };

    match artifact.save_to_dir(output_dir).await {
        Ok(path) => {
            let _ = update_tx.send(CatalogUpdate::Complete {
                path,
                page_count: artifact.page_count,
                item_count: artifact.item_count,
                images_failed: artifact.images_failed,
            });
        }
        Err(e) => {
            let _ = update_tx.send(CatalogUpdate::Error {
                message: format!("Failed to save catalog: {e}"),
            });
        }
    }
}
