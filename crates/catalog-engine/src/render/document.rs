use super::pages::{self, PageContext};
use super::{Canvas, PdfCanvas};
use crate::fetch::{ImageData, ImageFetcher, fetch_with_timeout};
use crate::layout::{GridGeometry, card_layout};
use crate::options::CatalogOptions;
use crate::plan::{GroupPlan, PagePlan, plan_pages};
use crate::progress::{ProgressEvent, ProgressReporter, ProgressStatus};
use crate::types::*;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Outcome of a generation request
#[derive(Debug)]
pub enum Generation<T> {
    Completed(CatalogArtifact<T>),
    /// Nothing was selected; no document and no progress events
    EmptySelection,
}

impl<T> Generation<T> {
    pub fn completed(self) -> Option<CatalogArtifact<T>> {
        match self {
            Generation::Completed(artifact) => Some(artifact),
            Generation::EmptySelection => None,
        }
    }
}

/// A finished catalog
#[derive(Debug)]
pub struct CatalogArtifact<T> {
    /// Suggested file name, e.g. `catalogo-produtos-2026-10-19.pdf`
    pub file_name: String,
    pub output: T,
    pub page_count: usize,
    pub item_count: usize,
    /// Items drawn with a placeholder instead of their image
    pub images_failed: usize,
    pub plan: PagePlan,
}

impl CatalogArtifact<Vec<u8>> {
    /// Write the PDF into `dir` under its suggested file name
    pub async fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        tokio::fs::write(&path, &self.output).await?;
        log::info!("Saved catalog to {}", path.display());
        Ok(path)
    }
}

/// File name of a catalog generated on `date`
pub fn output_file_name(grouped: bool, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    if grouped {
        format!("catalogo-produtos-{}.pdf", date)
    } else {
        format!("catalogo-produtos-alfabetico-{}.pdf", date)
    }
}

/// Emits progress events, labelling them with the item at `current`
struct ProgressTracker<'a, R: ProgressReporter> {
    reporter: &'a R,
    total: usize,
    labels: Vec<String>,
}

impl<'a, R: ProgressReporter> ProgressTracker<'a, R> {
    fn new(reporter: &'a R, total: usize) -> Self {
        Self {
            reporter,
            total,
            labels: Vec::new(),
        }
    }

    fn label(&self, current: usize) -> String {
        self.labels.get(current).cloned().unwrap_or_default()
    }

    fn emit(&self, current: usize, status: ProgressStatus, message: impl Into<String>) {
        self.reporter.report(ProgressEvent::new(
            current,
            self.total,
            self.label(current),
            status,
            message,
        ));
    }

    fn processing(&self, current: usize, message: impl Into<String>) {
        self.emit(current, ProgressStatus::Processing, message);
    }
}

/// Counters advanced while pages are drawn
struct RenderState {
    pages_started: usize,
    items_done: usize,
    images_failed: usize,
}

impl RenderState {
    fn new(plan: &PagePlan, grid: &GridGeometry) -> Result<Self> {
        if grid.capacity() != plan.items_per_page {
            return Err(CatalogError::PlanDrift(format!(
                "grid holds {} items per page but the plan assumed {}",
                grid.capacity(),
                plan.items_per_page
            )));
        }
        Ok(Self {
            pages_started: 0,
            items_done: 0,
            images_failed: 0,
        })
    }

    /// Start a page and return its 1-based number
    fn begin_page<C: Canvas>(&mut self, canvas: &mut C) -> usize {
        canvas.begin_page();
        self.pages_started += 1;
        self.pages_started
    }

    fn expect_next_page(&self, group: &GroupPlan) -> Result<()> {
        let next = self.pages_started + 1;
        if next != group.start_page {
            return Err(CatalogError::PlanDrift(format!(
                "group '{}' planned to start on page {} but would start on page {}",
                group.name, group.start_page, next
            )));
        }
        Ok(())
    }
}

/// Renders a catalog page by page onto a [`Canvas`].
///
/// Images are fetched one item at a time, in page order, each with the
/// configured timeout; a failed fetch draws a placeholder instead.
pub struct CatalogRenderer<'a, F, R> {
    options: &'a CatalogOptions,
    fetcher: &'a F,
    reporter: &'a R,
    generated_on: NaiveDate,
    logo: Option<ImageData>,
}

impl<'a, F, R> CatalogRenderer<'a, F, R>
where
    F: ImageFetcher,
    R: ProgressReporter,
{
    pub fn new(options: &'a CatalogOptions, fetcher: &'a F, reporter: &'a R) -> Self {
        Self {
            options,
            fetcher,
            reporter,
            generated_on: chrono::Local::now().date_naive(),
            logo: None,
        }
    }

    /// Date printed on the pages and used in the file name
    pub fn generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = date;
        self
    }

    /// Logo drawn on the cover
    pub fn with_logo(mut self, logo: Option<ImageData>) -> Self {
        self.logo = logo;
        self
    }

    /// Render `items` onto a new PDF canvas
    pub async fn render_pdf(&self, items: &[CatalogItem]) -> Result<Generation<Vec<u8>>> {
        let (width, height) = self.options.page_dimensions_mm();
        let canvas = PdfCanvas::new(&self.options.branding.header_title, width, height);
        self.render(items, canvas).await
    }

    /// Render `items` onto `canvas`.
    ///
    /// An empty selection returns [`Generation::EmptySelection`] without
    /// emitting any progress. Any failure after the first event emits a
    /// final event with [`ProgressStatus::Error`] before being returned.
    pub async fn render<C>(&self, items: &[CatalogItem], canvas: C) -> Result<Generation<C::Output>>
    where
        C: Canvas + Send + 'static,
    {
        if items.is_empty() {
            log::warn!("No items selected, skipping catalog generation");
            return Ok(Generation::EmptySelection);
        }

        let mut progress = ProgressTracker::new(self.reporter, items.len());
        progress.processing(0, "Initializing catalog generation...");

        let mut done = 0;
        match self.render_items(items, canvas, &mut progress, &mut done).await {
            Ok(artifact) => {
                progress.emit(
                    artifact.item_count,
                    ProgressStatus::Complete,
                    format!("PDF generated with {} pages", artifact.page_count),
                );
                log::info!(
                    "Generated {} ({} pages, {} items, {} placeholders)",
                    artifact.file_name,
                    artifact.page_count,
                    artifact.item_count,
                    artifact.images_failed
                );
                Ok(Generation::Completed(artifact))
            }
            Err(e) => {
                log::error!("Catalog generation failed: {}", e);
                progress.emit(done, ProgressStatus::Error, format!("Error: {}", e));
                Err(e)
            }
        }
    }

    async fn render_items<C>(
        &self,
        items: &[CatalogItem],
        mut canvas: C,
        progress: &mut ProgressTracker<'_, R>,
        done: &mut usize,
    ) -> Result<CatalogArtifact<C::Output>>
    where
        C: Canvas + Send + 'static,
    {
        self.options.validate()?;
        let grid = self.options.grid()?;
        let (page_width, page_height) = self.options.page_dimensions_mm();

        progress.processing(0, "Computing catalog structure...");
        let plan = plan_pages(items, &self.options.plan_config())?;
        progress.labels = plan.items().map(|item| item.name.clone()).collect();
        log::debug!(
            "Planned {} pages for {} items in {} groups",
            plan.total_pages,
            plan.item_count,
            plan.groups.len()
        );

        let mut state = RenderState::new(&plan, &grid)?;
        let ctx = PageContext {
            page_width,
            page_height,
            branding: &self.options.branding,
            date_label: self.generated_on.format("%d/%m/%Y").to_string(),
            grouped: plan.grouped,
        };

        progress.processing(0, "Creating cover...");
        state.begin_page(&mut canvas);
        pages::draw_cover(&mut canvas, &ctx, plan.item_count, self.logo.as_ref());

        if plan.grouped {
            progress.processing(0, "Creating category index...");
            let per_page = self.options.plan_config().index_entries_per_page;
            let index_pages = plan.groups.chunks(per_page).count();
            for (page, chunk) in plan.groups.chunks(per_page).enumerate() {
                state.begin_page(&mut canvas);
                pages::draw_index_page(
                    &mut canvas,
                    &ctx,
                    chunk,
                    page * per_page + 1,
                    page + 1 == index_pages,
                );
            }
        }

        if state.pages_started != plan.front_matter {
            return Err(CatalogError::PlanDrift(format!(
                "{} front pages drawn, {} planned",
                state.pages_started, plan.front_matter
            )));
        }

        let timeout = self.options.fetch_timeout();
        let text_area = self.options.text_area_height_mm;

        for group in &plan.groups {
            state.expect_next_page(group)?;
            if plan.grouped {
                progress.processing(
                    state.items_done,
                    format!("Creating category intro: {}", group.name),
                );
                state.begin_page(&mut canvas);
                pages::draw_group_intro(&mut canvas, &ctx, &group.name);
            }

            for (position, item) in group.items.iter().enumerate() {
                progress.processing(state.items_done, format!("Processing: {}", item.name));

                let slot = position % plan.items_per_page;
                if slot == 0 {
                    let page_number = state.begin_page(&mut canvas);
                    pages::draw_content_header(
                        &mut canvas,
                        &ctx,
                        self.options.header_height_mm,
                        &group.name,
                        page_number,
                    );
                }

                let layout = card_layout(grid.cell(slot), text_area);
                pages::draw_card_frame(&mut canvas, &layout);

                progress.processing(state.items_done, format!("Loading image: {}", item.name));
                let drawn = match fetch_with_timeout(self.fetcher, &item.image_ref, timeout).await {
                    Ok(image) => match pages::draw_card_image(&mut canvas, &layout, &image) {
                        Ok(()) => true,
                        Err(e) => {
                            log::warn!("Could not embed image of {}: {}", item.code, e);
                            false
                        }
                    },
                    Err(failure) => {
                        log::warn!("Image of {} unavailable: {}", item.code, failure);
                        false
                    }
                };
                if !drawn {
                    state.images_failed += 1;
                    progress.processing(
                        state.items_done,
                        format!("Error loading image: {} - using placeholder", item.name),
                    );
                    pages::draw_placeholder(&mut canvas, &layout);
                }

                pages::draw_card_labels(&mut canvas, &layout, item);

                state.items_done += 1;
                *done = state.items_done;
                self.pause_if_due(state.items_done).await;
            }
        }

        if state.pages_started != plan.total_pages || canvas.page_count() != plan.total_pages {
            return Err(CatalogError::PlanDrift(format!(
                "{} pages drawn, {} planned",
                canvas.page_count(),
                plan.total_pages
            )));
        }

        progress.processing(plan.item_count, "Finalizing PDF...");
        let output = tokio::task::spawn_blocking(move || canvas.finish())
            .await
            .map_err(|e| CatalogError::Job(format!("PDF finalization task failed: {}", e)))??;

        Ok(CatalogArtifact {
            file_name: output_file_name(plan.grouped, self.generated_on),
            output,
            page_count: plan.total_pages,
            item_count: plan.item_count,
            images_failed: state.images_failed,
            plan,
        })
    }

    /// Give other tasks a chance to run every `yield_every` items
    async fn pause_if_due(&self, items_done: usize) {
        let every = self.options.yield_every;
        if every == 0 || items_done % every != 0 {
            return;
        }
        let pause = self.options.yield_pause();
        if pause.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(pause).await;
        }
    }
}

/// Render `items` to PDF bytes with the given options, fetcher and reporter
pub async fn generate_catalog<F, R>(
    items: &[CatalogItem],
    options: &CatalogOptions,
    fetcher: &F,
    reporter: &R,
) -> Result<Generation<Vec<u8>>>
where
    F: ImageFetcher,
    R: ProgressReporter,
{
    CatalogRenderer::new(options, fetcher, reporter)
        .render_pdf(items)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            output_file_name(true, date),
            "catalogo-produtos-2026-10-19.pdf"
        );
        assert_eq!(
            output_file_name(false, date),
            "catalogo-produtos-alfabetico-2026-10-19.pdf"
        );
    }

    #[test]
    fn test_capacity_mismatch_is_drift() {
        let options = CatalogOptions::default();
        let grid = options.grid().unwrap();
        let items = vec![CatalogItem::new("1", "a")];
        let mut config = options.plan_config();
        config.items_per_page = 10;
        let plan = plan_pages(&items, &config).unwrap();

        assert!(matches!(
            RenderState::new(&plan, &grid),
            Err(CatalogError::PlanDrift(_))
        ));
    }
}
