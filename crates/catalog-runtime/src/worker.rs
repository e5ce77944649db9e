use crate::{CatalogCommand, CatalogUpdate, handlers};
use tokio::sync::mpsc;

/// Async worker task that processes catalog commands and sends updates.
///
/// Commands run one at a time in arrival order; the task ends when every
/// command sender is dropped.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<CatalogCommand>,
    update_tx: mpsc::UnboundedSender<CatalogUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &update_tx).await;
    }
    log::debug!("Command channel closed, catalog worker exiting");
}

async fn process_command(cmd: CatalogCommand, update_tx: &mpsc::UnboundedSender<CatalogUpdate>) {
    match cmd {
        CatalogCommand::LoadSheet { input_path, filter } => {
            handlers::handle_load_sheet(input_path, filter, update_tx).await;
        }
        CatalogCommand::LoadConfig { path } => {
            handlers::handle_load_config(path, update_tx).await;
        }
        CatalogCommand::Generate {
            items,
            options,
            output_dir,
            image_dir,
            logo_path,
        } => {
            handlers::handle_generate(items, options, output_dir, image_dir, logo_path, update_tx)
                .await;
        }
    }
}
