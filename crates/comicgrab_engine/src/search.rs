//! Paginated listing search.

use std::collections::HashSet;
use std::sync::Arc;

use comicgrab_core::Comic;
use engine_logging::{engine_debug, engine_info, engine_warn};
use url::Url;

use crate::decode::decode_page;
use crate::listing::parse_listing;
use crate::{EngineEvent, FetchError, Fetcher, ProgressSink, SiteSettings};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search term cannot be empty")]
    EmptyTerm,
    #[error("max results must be positive")]
    ZeroResults,
}

/// Why the page loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// `max_results` comics collected.
    LimitReached,
    /// The page had no listing blocks at all.
    NoListings { page: u32 },
    /// The page had blocks but none of them were usable.
    NoValidEntries { page: u32 },
    /// The page safety bound was hit.
    PageLimit { pages: u32 },
    /// Fetching the page failed; earlier results are kept.
    PageFailed { page: u32, error: FetchError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub comics: Vec<Comic>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

pub struct SearchEngine {
    fetcher: Arc<dyn Fetcher>,
    site: SiteSettings,
}

impl SearchEngine {
    pub fn new(fetcher: Arc<dyn Fetcher>, site: SiteSettings) -> Self {
        Self { fetcher, site }
    }

    /// Collects at most `max_results` unique comics for `term`, walking
    /// listing pages from 1 until a stop condition is met.
    pub async fn search(
        &self,
        term: &str,
        max_results: usize,
        sink: &dyn ProgressSink,
    ) -> Result<SearchOutcome, SearchError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(SearchError::EmptyTerm);
        }
        if max_results == 0 {
            return Err(SearchError::ZeroResults);
        }

        let encoded = urlencoding::encode(term);
        let mut comics: Vec<Comic> = Vec::new();
        let mut seen = HashSet::new();
        let mut pages_fetched = 0;
        let mut stop = StopReason::PageLimit {
            pages: self.site.max_pages,
        };

        for page in 1..=self.site.max_pages {
            let url = self.site.listing_url(page, &encoded);
            engine_info!("Searching page {} {}", page, url);
            sink.emit(EngineEvent::PageRequested {
                page,
                url: url.clone(),
            });

            let output = match self.fetcher.fetch_page(&url).await {
                Ok(output) => output,
                Err(error) => {
                    stop = StopReason::PageFailed { page, error };
                    break;
                }
            };
            pages_fetched = page;

            let decoded = decode_page(&output);
            if decoded.lossy {
                engine_debug!("Page {} decoded lossily as {}", page, decoded.encoding_label);
            }
            let listing = parse_listing(&decoded.html, &output.metadata.final_url);
            sink.emit(EngineEvent::PageParsed {
                page,
                entries: listing.entries.len(),
            });

            if listing.blocks == 0 {
                engine_warn!("No articles found on page {}", page);
                stop = StopReason::NoListings { page };
                break;
            }
            if listing.entries.is_empty() {
                engine_warn!("No valid comics found on page {}", page);
                stop = StopReason::NoValidEntries { page };
                break;
            }

            for comic in listing.entries {
                if seen.insert(dedupe_key(comic.page_url())) {
                    comics.push(comic);
                }
            }

            if comics.len() >= max_results {
                comics.truncate(max_results);
                stop = StopReason::LimitReached;
                break;
            }
        }

        if matches!(stop, StopReason::PageLimit { .. }) {
            engine_warn!("Reached maximum page limit ({})", self.site.max_pages);
        }

        Ok(SearchOutcome {
            comics,
            pages_fetched,
            stop,
        })
    }
}

/// Key under which two detail-page addresses count as the same comic.
fn dedupe_key(page_url: &str) -> String {
    match Url::parse(page_url) {
        Ok(mut url) => {
            url.set_fragment(None);
            let key = url.to_string();
            key.trim_end_matches('/').to_string()
        }
        Err(_) => page_url.trim().trim_end_matches('/').to_string(),
    }
}
