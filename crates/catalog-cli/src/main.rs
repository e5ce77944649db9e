use anyhow::{Context, Result, bail};
use catalog_engine::{
    CatalogItem, CatalogOptions, ItemFilter, Orientation, PagePlan, PaperSize, SelectionSet,
};
use catalog_runtime::{CatalogCommand, CatalogUpdate, ProgressStatus, worker_task};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "pdfcat", about = "Product catalog PDF generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a catalog PDF from a product sheet
    Generate {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Directory the PDF is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Read images from this directory instead of downloading them
        #[arg(long)]
        image_dir: Option<PathBuf>,

        /// Per-image download timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Logo image drawn on the cover
        #[arg(long)]
        logo: Option<PathBuf>,
    },

    /// Print the page plan without fetching images or writing a PDF
    Plan {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

/// Sheet, selection and layout arguments shared by all subcommands
#[derive(Args)]
struct CatalogArgs {
    /// Input sheet (.csv, .xlsx or .xls)
    #[arg(short, long)]
    input: PathBuf,

    /// JSON options file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Group items by category, with an index and category intro pages
    #[arg(long, conflicts_with = "alphabetical")]
    by_category: bool,

    /// Single alphabetical list without categories
    #[arg(long)]
    alphabetical: bool,

    /// Only items with stock strictly greater than this
    #[arg(long, default_value = "-1", allow_hyphen_values = true)]
    min_stock: f64,

    /// Include inactive items
    #[arg(long)]
    include_inactive: bool,

    /// Include items without an image reference
    #[arg(long)]
    include_without_image: bool,

    /// Select only these product codes (comma separated)
    #[arg(long, value_delimiter = ',')]
    codes: Vec<String>,

    /// Paper size (overrides the options file)
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Page orientation (overrides the options file)
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl CatalogArgs {
    fn filter(&self) -> ItemFilter {
        ItemFilter {
            active_only: !self.include_inactive,
            require_image: !self.include_without_image,
            min_stock: self.min_stock,
        }
    }

    /// Options file (or defaults) with command line overrides applied
    async fn options(&self) -> Result<CatalogOptions> {
        let mut options = match &self.config {
            Some(path) => CatalogOptions::load(path)
                .await
                .with_context(|| format!("Failed to load options from {}", path.display()))?,
            None => CatalogOptions::default(),
        };

        if self.by_category {
            options.group_by_category = true;
        }
        if self.alphabetical {
            options.group_by_category = false;
        }
        if let Some(paper) = self.paper {
            options.paper_size = paper.into();
        }
        if let Some(orientation) = self.orientation {
            options.orientation = orientation.into();
        }
        Ok(options)
    }

    /// Select the requested codes among the filtered items, or all of them
    fn select(&self, items: &[CatalogItem]) -> SelectionSet {
        let mut selection = SelectionSet::new();
        if self.codes.is_empty() {
            selection.toggle_all(items);
            return selection;
        }

        for code in &self.codes {
            match items.iter().find(|item| item.code == code.trim()) {
                Some(item) => {
                    selection.insert(item.clone());
                }
                None => log::warn!("Code {} not found among the filtered items", code),
            }
        }
        selection
    }
}

fn print_plan(plan: &PagePlan) {
    println!("Catalog plan:");
    println!("  Items: {}", plan.item_count);
    println!("  Items per page: {}", plan.items_per_page);
    println!("  Front pages: {}", plan.front_matter);
    if plan.grouped {
        println!("  Index pages: {}", plan.index_pages);
        for (i, group) in plan.groups.iter().enumerate() {
            println!(
                "  {:>3}. {:<35} {:>4} items  pages {}-{}",
                i + 1,
                group.name,
                group.item_count,
                group.start_page,
                group.start_page + group.page_count - 1
            );
        }
    } else if let Some(group) = plan.groups.first() {
        println!(
            "  Content pages: {}-{}",
            group.start_page,
            group.start_page + group.page_count - 1
        );
    }
    println!("  Total pages: {}", plan.total_pages);
}

async fn load_items(
    input: &Path,
    filter: ItemFilter,
    command_tx: &mpsc::UnboundedSender<CatalogCommand>,
    update_rx: &mut mpsc::UnboundedReceiver<CatalogUpdate>,
) -> Result<Vec<CatalogItem>> {
    command_tx.send(CatalogCommand::LoadSheet {
        input_path: input.to_path_buf(),
        filter,
    })?;

    while let Some(update) = update_rx.recv().await {
        match update {
            CatalogUpdate::SheetLoaded { items, total_rows } => {
                println!(
                    "Loaded {} rows, {} pass the filter",
                    total_rows,
                    items.len()
                );
                return Ok(items);
            }
            CatalogUpdate::Error { message } => bail!(message),
            other => log::debug!("Ignoring update {:?}", other),
        }
    }
    bail!("Catalog worker stopped unexpectedly")
}

async fn generate(
    items: Vec<CatalogItem>,
    options: CatalogOptions,
    output_dir: PathBuf,
    image_dir: Option<PathBuf>,
    logo_path: Option<PathBuf>,
    command_tx: &mpsc::UnboundedSender<CatalogCommand>,
    update_rx: &mut mpsc::UnboundedReceiver<CatalogUpdate>,
) -> Result<()> {
    command_tx.send(CatalogCommand::Generate {
        items,
        options,
        output_dir,
        image_dir,
        logo_path,
    })?;

    let mut last_percentage = None;
    while let Some(update) = update_rx.recv().await {
        match update {
            CatalogUpdate::Progress(event) => {
                log::debug!("{}", event.message);
                if event.status == ProgressStatus::Processing
                    && last_percentage != Some(event.percentage)
                {
                    println!("[{:>3}%] {}", event.percentage, event.message);
                    last_percentage = Some(event.percentage);
                }
            }
            CatalogUpdate::Complete {
                path,
                page_count,
                item_count,
                images_failed,
            } => {
                println!(
                    "Generated {} items on {} pages → {}",
                    item_count,
                    page_count,
                    path.display()
                );
                if images_failed > 0 {
                    println!("  {} images replaced by placeholders", images_failed);
                }
                return Ok(());
            }
            CatalogUpdate::EmptySelection => {
                println!("No items selected, nothing to generate");
                return Ok(());
            }
            CatalogUpdate::Error { message } => bail!(message),
            other => log::debug!("Ignoring update {:?}", other),
        }
    }
    bail!("Catalog worker stopped unexpectedly")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(worker_task(command_rx, update_tx));

    match cli.command {
        Commands::Generate {
            catalog,
            output_dir,
            image_dir,
            timeout_ms,
            logo,
        } => {
            let mut options = catalog.options().await?;
            if let Some(timeout_ms) = timeout_ms {
                options.fetch_timeout_ms = timeout_ms;
            }
            options.validate().context("Invalid catalog options")?;

            let items =
                load_items(&catalog.input, catalog.filter(), &command_tx, &mut update_rx).await?;
            let selection = catalog.select(&items);
            println!("Selected {} items", selection.len());

            generate(
                selection.into_items(),
                options,
                output_dir,
                image_dir,
                logo,
                &command_tx,
                &mut update_rx,
            )
            .await?;
        }

        Commands::Plan { catalog } => {
            let options = catalog.options().await?;
            options.validate().context("Invalid catalog options")?;

            let items =
                load_items(&catalog.input, catalog.filter(), &command_tx, &mut update_rx).await?;
            let selection = catalog.select(&items);
            if selection.is_empty() {
                println!("No items selected");
                return Ok(());
            }

            let plan = catalog_engine::plan_pages(selection.items(), &options.plan_config())?;
            print_plan(&plan);
        }
    }

    drop(command_tx);
    worker.await?;
    Ok(())
}
