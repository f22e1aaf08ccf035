use std::path::Path;
use std::sync::Arc;

use comicgrab_core::{BatchReport, Comic, SelectionSet};

use crate::fetch::{Fetcher, ProgressSink, ReqwestFetcher};
use crate::{
    DownloadManager, EngineConfig, FetchError, SearchEngine, SearchError, SearchOutcome,
    SiteSettings,
};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("could not build http client: {0}")]
    Client(#[from] FetchError),
}

/// Blocking entry point for the interactive app. Every call runs to
/// completion on a private single-threaded runtime, one request at a time.
pub struct EngineHandle {
    runtime: tokio::runtime::Runtime,
    search: SearchEngine,
    downloads: DownloadManager,
    site: SiteSettings,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch)?);
        Self::with_fetcher(fetcher, config.site)
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, site: SiteSettings) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            search: SearchEngine::new(fetcher.clone(), site.clone()),
            downloads: DownloadManager::new(fetcher, site.clone()),
            site,
        })
    }

    pub fn site(&self) -> &SiteSettings {
        &self.site
    }

    pub fn search(
        &self,
        term: &str,
        max_results: usize,
        sink: &dyn ProgressSink,
    ) -> Result<SearchOutcome, SearchError> {
        self.runtime
            .block_on(self.search.search(term, max_results, sink))
    }

    pub fn download(
        &self,
        comics: &mut [Comic],
        selection: &SelectionSet,
        destination: &Path,
        sink: &dyn ProgressSink,
    ) -> BatchReport {
        self.runtime
            .block_on(self.downloads.execute(comics, selection, destination, sink))
    }
}
