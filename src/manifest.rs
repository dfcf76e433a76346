//! Manifest loading.
//!
//! The image list comes from exactly one of three sources, tried in order:
//!
//! ```text
//! 1. Inline    <script id="memories-data">   (no network when non-empty)
//! 2. Remote    assets/memories/index.json?v=<millis>, cache disabled
//! 3. Fallback  15 numbered placeholders      (never fails)
//! ```
//!
//! Each source implements [`ManifestSource`]; [`Loader`] walks them and keeps
//! the first success. Failures are logged and never reach the page: whatever
//! happens, the loader resolves to a list.
//!
//! An empty inline manifest falls through to the next source, while an empty
//! remote manifest is accepted and renders an empty grid.

use crate::config::{FallbackConfig, WidgetConfig};
use crate::types::{ImageDescriptor, ManifestDocument};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("no manifest data present")]
    Absent,
    #[error("manifest contains no images")]
    Empty,
    #[error("malformed manifest: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("manifest request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid URL: {0}")]
    Url(String),
}

/// A provider of the image list.
pub trait ManifestSource {
    /// Short label used in logs and CLI output.
    fn name(&self) -> &'static str;

    fn load(&self) -> Result<Vec<ImageDescriptor>, SourceError>;
}

/// Outcome of [`Loader::load`]: the list and the source that produced it.
#[derive(Debug)]
pub struct Loaded {
    pub images: Vec<ImageDescriptor>,
    /// `None` when every source failed.
    pub source: Option<&'static str>,
}

/// Ordered chain of manifest sources. The first `Ok` wins.
#[derive(Default)]
pub struct Loader {
    sources: Vec<Box<dyn ManifestSource>>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl ManifestSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// The standard inline → remote → fallback chain.
    pub fn standard(
        config: &WidgetConfig,
        inline: Option<String>,
        fetcher: impl Fetch + 'static,
    ) -> Self {
        Self::new()
            .with_source(InlineSource::new(inline))
            .with_source(RemoteSource::new(config.manifest_path.clone(), fetcher))
            .with_source(FallbackSource::new(&config.fallback))
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn load(&self) -> Loaded {
        for source in &self.sources {
            match source.load() {
                Ok(images) => {
                    log::debug!("using {} manifest ({} images)", source.name(), images.len());
                    return Loaded {
                        images,
                        source: Some(source.name()),
                    };
                }
                Err(SourceError::Absent) | Err(SourceError::Empty) => {
                    log::debug!("{} manifest unavailable, trying next source", source.name());
                }
                Err(e) => {
                    log::warn!("{} manifest failed, trying next source: {e}", source.name());
                }
            }
        }
        Loaded {
            images: Vec::new(),
            source: None,
        }
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Manifest embedded in the host document.
pub struct InlineSource {
    text: Option<String>,
}

impl InlineSource {
    pub fn new(text: Option<String>) -> Self {
        Self { text }
    }
}

impl ManifestSource for InlineSource {
    fn name(&self) -> &'static str {
        "inline"
    }

    fn load(&self) -> Result<Vec<ImageDescriptor>, SourceError> {
        let text = match self.text.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(SourceError::Absent),
        };
        let images = ManifestDocument::parse(text)?.into_images();
        if images.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(images)
    }
}

/// Manifest fetched from a path relative to the page.
pub struct RemoteSource<F> {
    path: String,
    fetcher: F,
}

impl<F: Fetch> RemoteSource<F> {
    pub fn new(path: impl Into<String>, fetcher: F) -> Self {
        Self {
            path: path.into(),
            fetcher,
        }
    }
}

impl<F: Fetch> ManifestSource for RemoteSource<F> {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn load(&self) -> Result<Vec<ImageDescriptor>, SourceError> {
        let url = cache_busted(&self.path, unix_millis());
        let response = self.fetcher.get(&url)?;
        if !response.is_success() {
            return Err(SourceError::Status {
                url,
                status: response.status,
            });
        }
        Ok(ManifestDocument::parse(&response.body)?.into_images())
    }
}

/// Hardcoded placeholder set. Never fails.
pub struct FallbackSource {
    images: Vec<ImageDescriptor>,
}

impl FallbackSource {
    pub fn new(config: &FallbackConfig) -> Self {
        Self {
            images: config.images(),
        }
    }
}

impl ManifestSource for FallbackSource {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn load(&self) -> Result<Vec<ImageDescriptor>, SourceError> {
        Ok(self.images.clone())
    }
}

/// Append a `v=<stamp>` query parameter so every load bypasses caches.
pub fn cache_busted(path: &str, stamp: u128) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{path}{sep}v={stamp}")
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

// ============================================================================
// Fetchers
// ============================================================================

/// Response from a [`Fetch`] call.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves a page-relative URL. Implementations must not serve cached
/// responses.
pub trait Fetch {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Fetches over HTTP relative to the page's base URL.
pub struct HttpFetcher {
    base: reqwest::Url,
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let base =
            reqwest::Url::parse(base).map_err(|e| FetchError::Url(format!("{base}: {e}")))?;
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("memories/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { base, client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let url = self
            .base
            .join(url)
            .map_err(|e| FetchError::Url(format!("{url}: {e}")))?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(FetchResponse { status, body })
    }
}

/// Serves page-relative paths from a local site root.
///
/// Query strings are ignored and a missing file answers 404, so a site
/// directory behaves like the server that would host it.
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetch for DirFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_start_matches('/');
        if path.split('/').any(|segment| segment == "..") {
            return Ok(FetchResponse {
                status: 403,
                body: String::new(),
            });
        }
        let full = self.root.join(path);
        if !full.is_file() {
            return Ok(FetchResponse {
                status: 404,
                body: String::new(),
            });
        }
        let body = std::fs::read_to_string(&full)?;
        Ok(FetchResponse { status: 200, body })
    }
}

/// Fetcher for hosts with no network access. Every request fails.
pub struct Offline;

impl Fetch for Offline {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        Err(FetchError::Io(std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            format!("offline, cannot fetch {url}"),
        )))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{CountingFetcher, three_images_json};
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    fn standard(inline: Option<&str>, fetcher: CountingFetcher) -> Loader {
        Loader::standard(
            &WidgetConfig::default(),
            inline.map(str::to_string),
            fetcher,
        )
    }

    #[test]
    fn standard_chain_order() {
        let loader = standard(None, CountingFetcher::ok(200, "[]"));
        assert_eq!(loader.source_names(), ["inline", "remote", "fallback"]);
    }

    #[test]
    fn inline_manifest_wins_without_fetch() {
        let fetcher = CountingFetcher::ok(200, r#"[{"src":"remote.jpg"}]"#);
        let requests = fetcher.requests();
        let loaded = standard(Some(three_images_json().as_str()), fetcher).load();

        assert_eq!(loaded.source, Some("inline"));
        assert_eq!(loaded.images.len(), 3);
        assert_eq!(loaded.images[0].src, "a.jpg");
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn inline_wrapped_shape_is_accepted() {
        let fetcher = CountingFetcher::ok(200, "[]");
        let requests = fetcher.requests();
        let loaded = standard(Some(r#"{"images":[{"src":"x.jpg"}]}"#), fetcher).load();
        assert_eq!(loaded.source, Some("inline"));
        assert_eq!(loaded.images[0].src, "x.jpg");
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn empty_inline_manifest_falls_through_to_remote() {
        for inline in ["[]", r#"{"images":[]}"#, "   ", ""] {
            let fetcher = CountingFetcher::ok(200, &three_images_json());
            let requests = fetcher.requests();
            let loaded = standard(Some(inline), fetcher).load();
            assert_eq!(loaded.source, Some("remote"), "inline {inline:?}");
            assert_eq!(requests.borrow().len(), 1);
        }
    }

    #[test]
    fn malformed_inline_manifest_falls_through_to_remote() {
        let fetcher = CountingFetcher::ok(200, &three_images_json());
        let requests = fetcher.requests();
        let loaded = standard(Some("{not json"), fetcher).load();
        assert_eq!(loaded.source, Some("remote"));
        assert_eq!(loaded.images.len(), 3);
        assert_eq!(requests.borrow().len(), 1);
    }

    #[test]
    fn remote_request_targets_manifest_path_with_cache_buster() {
        let fetcher = CountingFetcher::ok(200, &three_images_json());
        let requests = fetcher.requests();
        standard(None, fetcher).load();

        let requests = requests.borrow();
        assert_eq!(requests.len(), 1);
        let (path, query) = requests[0].split_once('?').unwrap();
        assert_eq!(path, "assets/memories/index.json");
        let stamp = query.strip_prefix("v=").unwrap();
        assert!(stamp.parse::<u128>().is_ok());
    }

    #[test]
    fn cache_buster_changes_between_loads() {
        let fetcher = CountingFetcher::ok(200, &three_images_json());
        let requests = fetcher.requests();
        let loader = standard(None, fetcher);
        loader.load();
        std::thread::sleep(std::time::Duration::from_millis(3));
        loader.load();

        let requests = requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_ne!(requests[0], requests[1]);
    }

    #[test]
    fn cache_busted_respects_existing_query() {
        assert_eq!(cache_busted("index.json", 7), "index.json?v=7");
        assert_eq!(cache_busted("index.json?lang=en", 7), "index.json?lang=en&v=7");
    }

    #[test]
    fn error_status_falls_back() {
        for status in [400, 404, 500, 503] {
            let loaded = standard(None, CountingFetcher::ok(status, &three_images_json())).load();
            assert_eq!(loaded.source, Some("fallback"), "status {status}");
            assert_eq!(loaded.images.len(), 15);
        }
    }

    #[test]
    fn network_error_falls_back() {
        let loaded = standard(None, CountingFetcher::failing()).load();
        assert_eq!(loaded.source, Some("fallback"));
        assert_eq!(loaded.images, FallbackConfig::default().images());
    }

    #[test]
    fn non_json_body_falls_back() {
        let loaded = standard(None, CountingFetcher::ok(200, "<html>not found</html>")).load();
        assert_eq!(loaded.source, Some("fallback"));
        assert_eq!(loaded.images.len(), 15);
        assert_eq!(loaded.images[14].title.as_deref(), Some("Photo 15"));
    }

    #[test]
    fn empty_remote_manifest_is_accepted() {
        let loaded = standard(None, CountingFetcher::ok(200, r#"{"images": []}"#)).load();
        assert_eq!(loaded.source, Some("remote"));
        assert!(loaded.images.is_empty());
    }

    #[test]
    fn remote_preserves_manifest_order() {
        let loaded = standard(None, CountingFetcher::ok(200, &three_images_json())).load();
        let srcs: Vec<_> = loaded.images.iter().map(|i| i.src.as_str()).collect();
        assert_eq!(srcs, ["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn exhausted_chain_is_empty() {
        let loaded = Loader::new()
            .with_source(InlineSource::new(None))
            .with_source(RemoteSource::new("index.json", Offline))
            .load();
        assert_eq!(loaded.source, None);
        assert!(loaded.images.is_empty());
    }

    #[test]
    fn dir_fetcher_serves_files_and_ignores_query() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("assets/memories")).unwrap();
        fs::write(tmp.path().join("assets/memories/index.json"), "[]").unwrap();
        let fetcher = DirFetcher::new(tmp.path());

        let ok = fetcher.get("assets/memories/index.json?v=123").unwrap();
        assert_eq!(ok.status, 200);
        assert_eq!(ok.body, "[]");

        let missing = fetcher.get("assets/other.json?v=1").unwrap();
        assert_eq!(missing.status, 404);
        assert!(!missing.is_success());
    }

    #[test]
    fn dir_fetcher_refuses_parent_segments() {
        let tmp = TempDir::new().unwrap();
        let fetcher = DirFetcher::new(tmp.path().join("site"));
        let response = fetcher.get("../secret.json").unwrap();
        assert_eq!(response.status, 403);
    }

    #[test]
    fn remote_source_from_site_directory() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("assets/memories")).unwrap();
        fs::write(
            tmp.path().join("assets/memories/index.json"),
            three_images_json(),
        )
        .unwrap();
        let loaded = Loader::standard(&WidgetConfig::default(), None, DirFetcher::new(tmp.path()))
            .load();
        assert_eq!(loaded.source, Some("remote"));
        assert_eq!(loaded.images.len(), 3);
    }

    #[test]
    fn http_fetcher_rejects_invalid_base() {
        assert!(matches!(HttpFetcher::new("not a url"), Err(FetchError::Url(_))));
    }

    /// Answers a single HTTP request on localhost. The join handle yields the
    /// request head, lowercased.
    fn serve_once(status: &str, body: String) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/blog/", listener.local_addr().unwrap());
        let reply = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            stream.write_all(reply.as_bytes()).unwrap();
            String::from_utf8_lossy(&head).to_lowercase()
        });
        (base, server)
    }

    /// Same request path as `HttpFetcher::new`, minus any proxy from the
    /// environment.
    fn local_fetcher(base: &str) -> HttpFetcher {
        HttpFetcher {
            base: reqwest::Url::parse(base).unwrap(),
            client: reqwest::blocking::Client::builder()
                .no_proxy()
                .build()
                .unwrap(),
        }
    }

    #[test]
    fn http_fetch_is_cache_busted_and_uncached() {
        let (base, server) = serve_once("200 OK", three_images_json());
        let loaded =
            Loader::standard(&WidgetConfig::default(), None, local_fetcher(&base)).load();
        assert_eq!(loaded.source, Some("remote"));
        assert_eq!(loaded.images.len(), 3);

        let head = server.join().unwrap();
        let request_line = head.lines().next().unwrap();
        assert!(
            request_line.starts_with("get /blog/assets/memories/index.json?v="),
            "{request_line}"
        );
        assert!(head.contains("cache-control: no-store"), "{head}");
        assert!(head.contains("pragma: no-cache"), "{head}");
    }

    #[test]
    fn http_not_found_falls_back_to_placeholders() {
        let (base, server) = serve_once("404 Not Found", "missing".to_string());
        let response = local_fetcher(&base).get("assets/memories/index.json").unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        server.join().unwrap();

        let (base, server) = serve_once("404 Not Found", "missing".to_string());
        let loaded =
            Loader::standard(&WidgetConfig::default(), None, local_fetcher(&base)).load();
        server.join().unwrap();
        assert_eq!(loaded.source, Some("fallback"));
        assert_eq!(loaded.images.len(), 15);
    }
}
