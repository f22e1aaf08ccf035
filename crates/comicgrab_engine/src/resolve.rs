use std::sync::{Arc, LazyLock};

use engine_logging::{engine_debug, engine_warn};
use regex::Regex;
use scraper::{Html, Selector};

use crate::decode::decode_page;
use crate::{FetchError, Fetcher};

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://[a-zA-Z0-9./%\-=+:?&_]+").expect("download link pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("could not fetch detail page: {0}")]
    Fetch(#[from] FetchError),
    #[error("no download button found")]
    MissingButton,
    #[error("no download link found in button")]
    NoLink,
}

/// Turns a detail-page address into the address of the downloadable archive.
pub struct LinkResolver {
    fetcher: Arc<dyn Fetcher>,
    button_class: String,
}

impl LinkResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, button_class: impl Into<String>) -> Self {
        Self {
            fetcher,
            button_class: button_class.into(),
        }
    }

    pub async fn try_resolve(&self, page_url: &str) -> Result<String, ResolveError> {
        let output = self.fetcher.fetch_page(page_url).await?;
        let decoded = decode_page(&output);
        let link = extract_download_link(&decoded.html, &self.button_class)?;
        engine_debug!("Resolved {} -> {}", page_url, link);
        Ok(link)
    }

    /// Like [`LinkResolver::try_resolve`] but only says whether a link was found.
    pub async fn resolve(&self, page_url: &str) -> Option<String> {
        match self.try_resolve(page_url).await {
            Ok(link) => Some(link),
            Err(err) => {
                engine_warn!("Could not resolve {}: {}", page_url, err);
                None
            }
        }
    }
}

/// Finds the first `https://` address inside the first `div` carrying
/// `button_class`. The container is matched on its serialized markup, so links
/// in attributes and in text both count.
pub fn extract_download_link(html: &str, button_class: &str) -> Result<String, ResolveError> {
    let doc = Html::parse_document(html);
    let div_sel = Selector::parse("div").map_err(|_| ResolveError::MissingButton)?;
    let container = doc
        .select(&div_sel)
        .find(|div| div.value().classes().any(|class| class == button_class))
        .ok_or(ResolveError::MissingButton)?;

    let markup = container.html().replace("&amp;", "&");
    LINK_PATTERN
        .find(&markup)
        .map(|found| found.as_str().to_string())
        .ok_or(ResolveError::NoLink)
}
