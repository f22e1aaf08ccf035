use std::collections::BTreeMap;

use crate::{Comic, SelectionSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Persist title to detail-page address for the fresh search results.
    SaveSearchResults { entries: BTreeMap<String, String> },
    /// Resolve and download the selected comics.
    DownloadBatch {
        comics: Vec<Comic>,
        selection: SelectionSet,
    },
    /// Persist title to resolved link for the batch just finished.
    SaveLinks { links: BTreeMap<String, String> },
    /// End the interactive session.
    Exit,
}
