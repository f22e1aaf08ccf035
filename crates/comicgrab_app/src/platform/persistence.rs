use std::collections::BTreeMap;
use std::path::Path;

use comicgrab_engine::{merge_json_map, sanitize_title, write_json_map};
use engine_logging::engine_error;

const TERM_MAX_LEN: usize = 100;

/// `search_results_<term>.json`, with spaces in the term turned into `_`.
pub(crate) fn search_results_filename(term: &str) -> String {
    let term = term.trim().replace(' ', "_");
    format!("search_results_{}.json", sanitize_title(&term, TERM_MAX_LEN))
}

pub(crate) fn save_search_results(dir: &Path, term: &str, entries: &BTreeMap<String, String>) {
    let filename = search_results_filename(term);
    if let Err(err) = write_json_map(dir, &filename, entries) {
        engine_error!(
            "Failed to save search results to {:?}: {}",
            dir.join(&filename),
            err
        );
    }
}

/// Merges the batch's links into the running link map in `dir`.
pub(crate) fn save_links(dir: &Path, filename: &str, links: &BTreeMap<String, String>) {
    if let Err(err) = merge_json_map(dir, filename, links) {
        engine_error!(
            "Failed to save download links to {:?}: {}",
            dir.join(filename),
            err
        );
    }
}
