use std::collections::BTreeMap;
use std::path::PathBuf;

/// Aggregate counts for one download batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.attempted += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Bytes were streamed to `path`.
    Downloaded { path: PathBuf, bytes: u64 },
    /// A file already existed at `path`; no transfer happened.
    AlreadyPresent { path: PathBuf },
    /// No download link could be resolved from the detail page.
    Unresolved { reason: String },
    /// The link was known but the transfer or write failed.
    Failed { reason: String },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ItemOutcome::Downloaded { .. } | ItemOutcome::AlreadyPresent { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// Zero-based index into the comic list the batch was built from.
    pub index: usize,
    pub title: String,
    pub download_link: Option<String>,
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub summary: Summary,
    pub items: Vec<ItemReport>,
    /// Title to resolved link for every item that got a link, whatever its outcome.
    pub links: BTreeMap<String, String>,
}

impl BatchReport {
    pub fn push(&mut self, item: ItemReport) {
        self.summary.record(&item.outcome);
        if let Some(link) = item.download_link.as_ref() {
            self.links.insert(item.title.clone(), link.clone());
        }
        self.items.push(item);
    }
}
