use crate::selection::{RejectedToken, SelectionSet};
use crate::view_model::{AppViewModel, ComicRowView};
use crate::{BatchReport, Comic, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for the search results.
    #[default]
    Idle,
    /// Listing shown, waiting for a selection.
    Browsing,
    /// Selection made, waiting for y/n.
    Confirming,
    /// Batch handed to the engine.
    Downloading,
    /// Batch done, asking whether to download more.
    Continuing,
    Finished,
}

/// Operator-facing messages produced by state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoResults,
    Found { count: usize },
    RejectedToken(RejectedToken),
    NoValidSelections,
    Goodbye,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    /// Persist the title to detail-page map right after the search.
    pub auto_save: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    options: SessionOptions,
    comics: Vec<Comic>,
    pending: Option<SelectionSet>,
    notices: Vec<Notice>,
    last_summary: Option<Summary>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn comics(&self) -> &[Comic] {
        &self.comics
    }

    pub fn pending_selection(&self) -> Option<&SelectionSet> {
        self.pending.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .comics
            .iter()
            .enumerate()
            .map(|(index, comic)| ComicRowView {
                number: index + 1,
                title: comic.title().to_string(),
                downloaded: comic.is_downloaded(),
            })
            .collect();
        let pending_titles = self
            .pending
            .iter()
            .flat_map(|set| set.iter())
            .filter_map(|index| self.comics.get(index))
            .map(|comic| comic.title().to_string())
            .collect();
        AppViewModel {
            session: self.session,
            rows,
            pending_titles,
            notices: self.notices.clone(),
            last_summary: self.last_summary,
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Hands pending notices to the renderer exactly once.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn set_session(&mut self, session: SessionState) {
        if self.session != session {
            self.session = session;
            self.dirty = true;
        }
    }

    pub(crate) fn set_comics(&mut self, comics: Vec<Comic>) {
        self.comics = comics;
        self.dirty = true;
    }

    pub(crate) fn set_pending(&mut self, pending: Option<SelectionSet>) {
        self.pending = pending;
        self.dirty = true;
    }

    pub(crate) fn take_pending(&mut self) -> Option<SelectionSet> {
        self.dirty = true;
        self.pending.take()
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
        self.dirty = true;
    }

    /// Folds a finished batch back into the comic list. Links already known
    /// are kept and download flags never revert.
    pub(crate) fn apply_batch(&mut self, report: &BatchReport) {
        for item in &report.items {
            let Some(comic) = self.comics.get_mut(item.index) else {
                continue;
            };
            if comic.title() != item.title {
                continue;
            }
            if let Some(link) = item.download_link.as_deref() {
                comic.set_download_link(link);
            }
            if item.outcome.is_success() {
                comic.mark_downloaded();
            }
        }
        self.last_summary = Some(report.summary);
        self.dirty = true;
    }
}
