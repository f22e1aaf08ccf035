use crate::{Notice, SessionState, Summary};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub rows: Vec<ComicRowView>,
    /// Titles of the selection awaiting confirmation, in index order.
    pub pending_titles: Vec<String>,
    pub notices: Vec<Notice>,
    pub last_summary: Option<Summary>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicRowView {
    /// 1-based number the operator types to select this row.
    pub number: usize,
    pub title: String,
    pub downloaded: bool,
}
