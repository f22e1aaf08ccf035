//! Console progress for searches and download batches.

use std::sync::Mutex;
use std::time::Duration;

use comicgrab_core::ItemOutcome;
use comicgrab_engine::{DownloadProgress, EngineEvent, ProgressSink, Stage};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::constants::PROGRESS_THRESHOLD_BYTES;

/// Turns engine events into a page spinner, per-item status lines, and a
/// byte bar for large downloads.
pub struct ConsoleProgress {
    hidden: bool,
    spinner: Mutex<Option<ProgressBar>>,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new(hidden: bool) -> Self {
        Self {
            hidden,
            spinner: Mutex::new(None),
            bar: Mutex::new(None),
        }
    }

    /// Clears any spinner or bar left on screen.
    pub fn finish(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(spinner) = spinner.take() {
                spinner.finish_and_clear();
            }
        }
        self.finish_bar();
    }

    fn new_bar(&self, bar: ProgressBar) -> ProgressBar {
        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar
    }

    fn page_requested(&self, page: u32) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let spinner = guard.get_or_insert_with(|| {
            let spinner = self.new_bar(ProgressBar::new_spinner());
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        });
        spinner.set_message(format!("Searching page {page}..."));
    }

    fn transfer(&self, progress: &DownloadProgress) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        match progress.stage {
            Stage::Resolving => {}
            Stage::Downloading => {
                let Some(total) = progress.total.filter(|t| *t > PROGRESS_THRESHOLD_BYTES)
                else {
                    return;
                };
                let bar = guard.get_or_insert_with(|| {
                    let bar = self.new_bar(ProgressBar::new(total));
                    bar.set_style(
                        ProgressStyle::with_template(
                            "  [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)",
                        )
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                    );
                    bar
                });
                bar.set_position(progress.bytes.min(total));
            }
            Stage::Writing => {
                if let Some(bar) = guard.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn say(&self, line: String) {
        if !self.hidden {
            println!("{line}");
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::PageRequested { page, .. } => self.page_requested(page),
            EngineEvent::PageParsed { .. } => {}
            EngineEvent::ItemStarted {
                position,
                total,
                title,
            } => self.say(format!("\n[{position}/{total}] Processing: {title}")),
            EngineEvent::Progress(progress) => self.transfer(&progress),
            EngineEvent::ItemCompleted { title, outcome } => {
                self.finish_bar();
                self.say(outcome_line(&title, &outcome));
            }
        }
    }
}

fn outcome_line(title: &str, outcome: &ItemOutcome) -> String {
    match outcome {
        ItemOutcome::Downloaded { path, .. } => format!("  ✓ Saved {}", path.display()),
        ItemOutcome::AlreadyPresent { path } => {
            format!("  ✓ Already downloaded: {}", path.display())
        }
        ItemOutcome::Unresolved { reason } => {
            format!("  ✗ No download link for {title}: {reason}")
        }
        ItemOutcome::Failed { reason } => format!("  ✗ Failed {title}: {reason}"),
    }
}
