// Import flow: fetch a vendor's page and turn its metadata into a draft submission

use crate::error::{DirectoryError, Result};
use crate::metadata::{extract_metadata, PageMetadata};
use crate::records::VendorForm;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Bytes of page body read for metadata; anything past this is dropped
pub const DEFAULT_MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// A pre-filled vendor form awaiting manual completion. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct VendorDraft {
    /// Final URL after redirects
    pub source_url: String,
    pub form: VendorForm,
}

impl VendorDraft {
    pub fn from_metadata(source_url: &Url, metadata: PageMetadata) -> Self {
        VendorDraft {
            source_url: source_url.to_string(),
            form: VendorForm {
                company_name: metadata.company_name,
                product_name: metadata.product_name,
                ..VendorForm::default()
            },
        }
    }
}

/// Trim the input and assume `https://` when no scheme is given
pub fn normalize_source_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DirectoryError::InvalidUrl {
            url: raw.to_string(),
            reason: "URL is empty".to_string(),
        });
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| DirectoryError::InvalidUrl {
        url: candidate.clone(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DirectoryError::InvalidUrl {
            url: candidate,
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// A fetched page: body plus the URL it was finally served from
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub html: String,
}

/// HTTP client for import previews. One attempt per call, bounded by the timeout.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DirectoryError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(PageFetcher {
            client,
            max_body_bytes: DEFAULT_MAX_PAGE_BYTES,
        })
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        let fetch_error = |e: reqwest::Error| {
            let reason = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            };
            DirectoryError::Fetch {
                url: url.to_string(),
                reason,
            }
        };

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?;

        let final_url = response.url().clone();
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(fetch_error)? {
            let room = self.max_body_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!(url = %final_url, limit = self.max_body_bytes, "page body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }
        let html = String::from_utf8_lossy(&body).into_owned();

        Ok(FetchedPage {
            url: final_url,
            html,
        })
    }

    /// Fetch `raw_url` and build a draft from the page metadata
    pub async fn import_preview(&self, raw_url: &str) -> Result<VendorDraft> {
        let url = normalize_source_url(raw_url)?;

        let page = match self.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "import fetch failed");
                return Err(e);
            }
        };

        let metadata = extract_metadata(&page.html, &page.url);
        info!(
            url = %page.url,
            company = %metadata.company_name,
            product = %metadata.product_name,
            "import preview ready"
        );

        Ok(VendorDraft::from_metadata(&page.url, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve raw HTTP/1.1 responses on loopback, one per connection, chosen by request path
    async fn serve_site<F>(delay: Duration, respond: F) -> String
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let respond = Arc::new(respond);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let respond = Arc::clone(&respond);
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&request);
                    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();

                    tokio::time::sleep(delay).await;
                    let _ = socket.write_all((*respond)(&path).as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    fn http_response(status: &str, extra_headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
            status,
            body.len(),
            extra_headers,
            body
        )
    }

    #[test]
    fn test_scheme_is_prefixed_when_missing() {
        let url = normalize_source_url("  acme.example/products ").unwrap();
        assert_eq!(url.as_str(), "https://acme.example/products");
    }

    #[test]
    fn test_explicit_scheme_is_kept() {
        let url = normalize_source_url("http://acme.example").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_rejects_empty_and_unsupported() {
        assert!(matches!(
            normalize_source_url("   "),
            Err(DirectoryError::InvalidUrl { .. })
        ));
        assert!(matches!(
            normalize_source_url("ftp://files.example"),
            Err(DirectoryError::InvalidUrl { .. })
        ));
        assert!(matches!(
            normalize_source_url("https://"),
            Err(DirectoryError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_draft_only_fills_names() {
        let url = Url::parse("https://acme.example/").unwrap();
        let draft = VendorDraft::from_metadata(
            &url,
            PageMetadata {
                company_name: "Acme".to_string(),
                product_name: "Widget".to_string(),
            },
        );

        assert_eq!(draft.source_url, "https://acme.example/");
        assert_eq!(draft.form.company_name, "Acme");
        assert_eq!(draft.form.product_name, "Widget");
        assert!(draft.form.website.is_empty());
        assert!(draft.form.features.is_empty());
        assert!(draft.form.contact_email.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let fetcher = PageFetcher::new(Duration::from_secs(2)).unwrap();

        // discard port, expected closed
        let err = fetcher.import_preview("http://127.0.0.1:9/").await.unwrap_err();

        match err {
            DirectoryError::Fetch { url, .. } => assert_eq!(url, "http://127.0.0.1:9/"),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let base = serve_site(Duration::ZERO, |_| http_response("404 Not Found", "", "gone")).await;
        let fetcher = PageFetcher::new(Duration::from_secs(5)).unwrap();

        let err = fetcher.import_preview(&format!("{}/missing", base)).await.unwrap_err();

        match err {
            DirectoryError::Fetch { url, reason } => {
                assert_eq!(url, format!("{}/missing", base));
                assert!(reason.contains("404"), "reason was {}", reason);
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_page_times_out() {
        let base = serve_site(Duration::from_secs(3), |_| {
            http_response("200 OK", "", "<title>Too late</title>")
        })
        .await;
        let fetcher = PageFetcher::new(Duration::from_millis(200)).unwrap();

        let err = fetcher.import_preview(&base).await.unwrap_err();

        match err {
            DirectoryError::Fetch { reason, .. } => assert_eq!(reason, "request timed out"),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_preview_uses_final_url_after_redirect() {
        let base = serve_site(Duration::ZERO, |path| match path {
            "/old" => http_response("301 Moved Permanently", "Location: /product\r\n", ""),
            _ => http_response(
                "200 OK",
                "",
                r#"<html><head><title>Ignored</title>
                <meta property="og:title" content="Widget">
                <meta property="og:site_name" content="Acme"></head></html>"#,
            ),
        })
        .await;
        let fetcher = PageFetcher::new(Duration::from_secs(5)).unwrap();

        let draft = fetcher.import_preview(&format!("{}/old", base)).await.unwrap();

        assert_eq!(draft.source_url, format!("{}/product", base));
        assert_eq!(draft.form.company_name, "Acme");
        assert_eq!(draft.form.product_name, "Widget");
        assert!(draft.form.website.is_empty());
    }

    #[tokio::test]
    async fn test_title_fallback_uses_host() {
        let base = serve_site(Duration::ZERO, |_| {
            http_response("200 OK", "", "<html><head><title>Fallback</title></head></html>")
        })
        .await;
        let fetcher = PageFetcher::new(Duration::from_secs(5)).unwrap();

        let draft = fetcher.import_preview(&base).await.unwrap();

        assert_eq!(draft.form.product_name, "Fallback");
        assert_eq!(draft.form.company_name, "127.0.0.1");
    }

    #[tokio::test]
    async fn test_body_is_capped() {
        let base = serve_site(Duration::ZERO, |_| {
            let body = format!("<html><head><title>Capped</title></head><body>{}</body></html>", "x".repeat(100_000));
            http_response("200 OK", "", &body)
        })
        .await;
        let fetcher = PageFetcher::new(Duration::from_secs(5))
            .unwrap()
            .with_max_body_bytes(64);

        let page = fetcher.fetch(&Url::parse(&base).unwrap()).await.unwrap();
        assert_eq!(page.html.len(), 64);

        let draft = fetcher.import_preview(&base).await.unwrap();
        assert_eq!(draft.form.product_name, "Capped");
    }
}
