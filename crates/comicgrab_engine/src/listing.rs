use comicgrab_core::Comic;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Position of the detail-page anchor inside a listing block. The first two
/// anchors are the cover image and the category badge.
const DETAIL_ANCHOR_INDEX: usize = 2;

/// What one search results page yielded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    /// Number of `<article>` blocks, valid or not.
    pub blocks: usize,
    pub entries: Vec<Comic>,
}

/// Extracts comics from listing markup. Blocks missing the detail anchor or
/// the heading are skipped. Relative addresses are resolved against `page_url`.
pub fn parse_listing(html: &str, page_url: &str) -> ListingPage {
    let doc = Html::parse_document(html);
    let (Ok(article_sel), Ok(anchor_sel), Ok(heading_sel)) = (
        Selector::parse("article"),
        Selector::parse("a"),
        Selector::parse("h1"),
    ) else {
        return ListingPage::default();
    };
    let base = Url::parse(page_url).ok();

    let mut page = ListingPage::default();
    for article in doc.select(&article_sel) {
        page.blocks += 1;
        if let Some(comic) = parse_block(article, &anchor_sel, &heading_sel, base.as_ref()) {
            page.entries.push(comic);
        }
    }
    page
}

fn parse_block(
    article: ElementRef<'_>,
    anchor_sel: &Selector,
    heading_sel: &Selector,
    base: Option<&Url>,
) -> Option<Comic> {
    let href = article
        .select(anchor_sel)
        .nth(DETAIL_ANCHOR_INDEX)?
        .value()
        .attr("href")?;
    let page_url = resolve_href(href, base)?;
    let heading = article.select(heading_sel).next()?;
    let title = heading.text().collect::<String>();
    Comic::new(&title, &page_url)
}

fn resolve_href(reference: &str, base: Option<&Url>) -> Option<String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url.into());
    }
    base.and_then(|base| base.join(trimmed).ok()).map(Into::into)
}
