use std::fmt;

/// A comic discovered on a listing page.
///
/// The title is trimmed and never empty. Once a download link is set it is
/// never replaced, and `downloaded` only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comic {
    title: String,
    page_url: String,
    download_link: Option<String>,
    downloaded: bool,
}

impl Comic {
    /// Builds a comic from listing markup values. Returns `None` when either
    /// the title or the detail-page address is blank after trimming.
    pub fn new(title: &str, page_url: &str) -> Option<Self> {
        let title = title.trim();
        let page_url = page_url.trim();
        if title.is_empty() || page_url.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            page_url: page_url.to_string(),
            download_link: None,
            downloaded: false,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn download_link(&self) -> Option<&str> {
        self.download_link.as_deref()
    }

    pub fn is_downloaded(&self) -> bool {
        self.downloaded
    }

    /// Records the resolved download link. Returns `false` (and keeps the
    /// existing link) if one was already set or the new link is blank.
    pub fn set_download_link(&mut self, link: impl Into<String>) -> bool {
        if self.download_link.is_some() {
            return false;
        }
        let link = link.into();
        if link.trim().is_empty() {
            return false;
        }
        self.download_link = Some(link);
        true
    }

    pub fn mark_downloaded(&mut self) {
        self.downloaded = true;
    }
}

impl fmt::Display for Comic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.downloaded { '✓' } else { '○' };
        write!(f, "[{status}] {}", self.title)
    }
}
