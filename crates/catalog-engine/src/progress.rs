//! Progress reporting
//!
//! The renderer pushes one [`ProgressEvent`] per unit of work into a
//! caller-owned [`ProgressReporter`]. The engine keeps no event history.

/// State of the job carried by each event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    Processing,
    Complete,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Items placed so far
    pub current: usize,
    pub total: usize,
    /// `round(100 * current / total)`, clamped to 0..=100
    pub percentage: u8,
    /// Name of the item being worked on, empty between items
    pub current_item: String,
    pub status: ProgressStatus,
    pub message: String,
}

/// Rounded completion percentage; a job with no items reports 0
pub fn percentage(current: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * current as f64 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

impl ProgressEvent {
    pub fn new(
        current: usize,
        total: usize,
        current_item: impl Into<String>,
        status: ProgressStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            current,
            total,
            percentage: percentage(current, total),
            current_item: current_item.into(),
            status,
            message: message.into(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status != ProgressStatus::Processing
    }
}

/// Receives progress events from the renderer.
///
/// Called synchronously from the render loop; implementations should return
/// quickly (e.g. forward to a channel).
pub trait ProgressReporter {
    fn report(&self, event: ProgressEvent);
}

impl<F> ProgressReporter for F
where
    F: Fn(ProgressEvent),
{
    fn report(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Reporter that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Reporter that logs each event at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        log::debug!(
            "[{:>3}%] {}/{} {}",
            event.percentage,
            event.current,
            event.total,
            event.message
        );
    }
}
