// Page metadata extraction: best-effort company/product names from fetched HTML

use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static APPLICATION_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="application-name"]"#).unwrap());
static OG_SITE_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:site_name"]"#).unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub company_name: String,
    pub product_name: String,
}

/// Derive names from `html` fetched at `url`.
///
/// Title: `og:title`, then `application-name`, then `<title>`.
/// Company: `og:site_name`, then the URL host without a leading `www.`.
/// Product falls back to the company name when no title was found.
/// Malformed HTML never fails; missing pieces come back empty.
pub fn extract_metadata(html: &str, url: &Url) -> PageMetadata {
    let document = Html::parse_document(html);

    let title = meta_content(&document, &OG_TITLE)
        .or_else(|| meta_content(&document, &APPLICATION_NAME))
        .or_else(|| title_text(&document))
        .unwrap_or_default();

    let site_name =
        meta_content(&document, &OG_SITE_NAME).unwrap_or_else(|| host_without_www(url));

    let company_name = site_name.trim().to_string();
    let product_name = match title.trim() {
        "" => company_name.clone(),
        title => title.to_string(),
    };

    PageMetadata {
        company_name,
        product_name,
    }
}

/// Host of `url` with one leading `www.` removed; empty when there is no host
pub fn host_without_www(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

fn title_text(document: &Html) -> Option<String> {
    document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}
