use crate::FetchSettings;

/// Where and how the site is scraped.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Site root without trailing slash, e.g. `https://getcomics.org`.
    pub base_url: String,
    /// Safety bound on listing pages per search.
    pub max_pages: u32,
    /// Class of the `div` wrapping the download button on detail pages.
    pub button_class: String,
    /// Extension used when the link does not look like a zip.
    pub default_extension: String,
    pub max_filename_len: usize,
    /// Title to resolved link map, written into the destination directory.
    pub links_filename: String,
}

impl SiteSettings {
    /// Listing address for a 1-based page and an already encoded term.
    pub fn listing_url(&self, page: u32, encoded_term: &str) -> String {
        format!(
            "{}/page/{page}/?s={encoded_term}",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://getcomics.org".to_string(),
            max_pages: 10,
            button_class: "aio-button-center".to_string(),
            default_extension: "cbr".to_string(),
            max_filename_len: 200,
            links_filename: "downloaded_comics.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub site: SiteSettings,
}

impl EngineConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            site: SiteSettings {
                base_url: base_url.into(),
                ..SiteSettings::default()
            },
            ..Self::default()
        }
    }
}
