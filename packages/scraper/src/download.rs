//! Raw downloads.
//!
//! [`fetch_file`] caches a resource on disk under its original file name;
//! [`fetch_text`] returns a page body decoded to text. Neither retries: a
//! failed request is returned to the caller as-is.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;

use crate::{ScrapeConfig, ScrapeError};

/// How many leading bytes of a page are searched for a `<meta>` charset.
const SNIFF_LEN: usize = 1024;

static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_.:-]+)"#).expect("valid regex")
});

static HEADER_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)charset\s*=\s*["']?([a-z0-9_.:-]+)"#).expect("valid regex")
});

/// Returns the last non-empty path segment of `url`.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] if `url` is not a valid URL or has no
/// usable path segment.
pub fn file_name_for_url(url: &str) -> Result<String, ScrapeError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ScrapeError::Parse(format!("invalid URL '{url}': {e}")))?;

    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .map(str::to_owned)
        .ok_or_else(|| ScrapeError::Parse(format!("URL '{url}' has no file name")))
}

/// Downloads `config.url` into `dir`, named after the URL's last path
/// segment, and returns the written path.
///
/// Parent directories are created as needed. An existing file is
/// overwritten.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the URL has no file name, the request fails
/// or returns a non-success status, or the file cannot be written.
pub async fn fetch_file(config: &ScrapeConfig, dir: &Path) -> Result<PathBuf, ScrapeError> {
    let path = dir.join(file_name_for_url(&config.url)?);

    let client = config.build_client()?;
    let response = client.get(&config.url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;

    log::debug!("Downloaded {} bytes from {}", bytes.len(), config.url);

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, &bytes).await?;

    log::info!("Saved {} to {}", config.url, path.display());

    Ok(path)
}

/// Downloads `config.url` and returns the body as text.
///
/// The body is decoded with [`decode_html`].
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] if the request fails or returns a
/// non-success status.
pub async fn fetch_text(config: &ScrapeConfig) -> Result<String, ScrapeError> {
    let client = config.build_client()?;
    let response = client.get(&config.url).send().await?.error_for_status()?;
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .map(|value| value.as_bytes().to_vec());
    let bytes = response.bytes().await?;

    let body = decode_html(&bytes, content_type.as_deref());
    log::debug!("Fetched {} characters from {}", body.chars().count(), config.url);

    Ok(body)
}

/// Decodes an HTML document to text.
///
/// A byte order mark wins, then a `<meta>` charset declaration in the first
/// kilobyte, then the charset parameter of `content_type`. Anything else is
/// read as UTF-8. Malformed sequences become U+FFFD.
#[must_use]
pub fn decode_html(bytes: &[u8], content_type: Option<&[u8]>) -> String {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];

    let encoding = charset(&META_CHARSET_RE, head)
        .map(Encoding::output_encoding)
        .or_else(|| content_type.and_then(|value| charset(&HEADER_CHARSET_RE, value)))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::warn!("Page is not valid {}; replaced malformed bytes", used.name());
    } else {
        log::debug!("Decoded page as {}", used.name());
    }

    text.into_owned()
}

fn charset(pattern: &Regex, haystack: &[u8]) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?.as_bytes();
    let encoding = Encoding::for_label(label);
    if encoding.is_none() {
        log::debug!("Ignoring unknown charset '{}'", String::from_utf8_lossy(label));
    }
    encoding
}

#[cfg(test)]
mod tests {
    use encoding_rs::SHIFT_JIS;
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Serves a single HTTP response on a local port. The handle yields the
    /// raw request head.
    async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            // The client may hang up before reading an error body.
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&body).await;
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    fn shift_jis_page() -> Vec<u8> {
        let html = "<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=Shift_JIS\"></head>\
                    <body><table><tr><th>概　要</th></tr><tr><td>(新居浜署)◆種別:不審者</td></tr></table></body></html>";
        let (bytes, _, had_errors) = SHIFT_JIS.encode(html);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[tokio::test]
    async fn fetch_file_saves_body_under_last_segment() {
        let body = "\u{feff}都道府県名,市区町村名\n愛媛県,西条市\n".as_bytes().to_vec();
        let (base, server) = serve_once("200 OK", "text/csv", body.clone()).await;
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache").join("src");

        let path = fetch_file(&ScrapeConfig::new(&format!("{base}/data/latest.csv")), &cache)
            .await
            .unwrap();

        assert_eq!(path, cache.join("latest.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), body);
        assert!(server.await.unwrap().starts_with("GET /data/latest.csv "));
    }

    #[tokio::test]
    async fn fetch_file_fails_on_error_status() {
        let (base, server) = serve_once("404 Not Found", "text/plain", b"gone".to_vec()).await;
        let dir = tempfile::tempdir().unwrap();

        let result = fetch_file(&ScrapeConfig::new(&format!("{base}/latest.csv")), dir.path()).await;

        assert!(matches!(result, Err(ScrapeError::Http(_))));
        assert!(!dir.path().join("latest.csv").exists());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn fetch_text_fails_on_error_status() {
        let (base, server) =
            serve_once("500 Internal Server Error", "text/html", Vec::new()).await;

        let result = fetch_text(&ScrapeConfig::new(&format!("{base}/fushinsha.htm"))).await;

        assert!(matches!(result, Err(ScrapeError::Http(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn fetch_text_decodes_meta_declared_shift_jis() {
        let (base, server) = serve_once("200 OK", "text/html", shift_jis_page()).await;

        let html = fetch_text(&ScrapeConfig::new(&format!("{base}/fushinsha.htm")))
            .await
            .unwrap();

        assert!(html.contains("<th>概　要</th>"));
        assert!(html.contains("(新居浜署)◆種別:不審者"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn fetch_text_sends_configured_headers() {
        let (base, server) = serve_once("200 OK", "text/html; charset=utf-8", b"ok".to_vec()).await;
        let config = ScrapeConfig::new(&format!("{base}/fushinsha.htm"))
            .with_header("User-Agent", "fushinsha-map-test");

        assert_eq!(fetch_text(&config).await.unwrap(), "ok");

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.contains("user-agent: fushinsha-map-test\r\n"));
    }

    #[test]
    fn meta_charset_wins_over_header() {
        let html = decode_html(
            &shift_jis_page(),
            Some(b"text/html; charset=utf-8".as_slice()),
        );
        assert!(html.contains("概　要"));
    }

    #[test]
    fn html5_meta_charset_is_recognized() {
        let (bytes, _, _) = SHIFT_JIS.encode("<meta charset=\"shift_jis\"><p>愛媛県</p>");
        assert_eq!(decode_html(&bytes, None), "<meta charset=\"shift_jis\"><p>愛媛県</p>");
    }

    #[test]
    fn header_charset_used_without_meta() {
        let (bytes, _, _) = SHIFT_JIS.encode("<p>西条市新田</p>");
        assert_eq!(
            decode_html(&bytes, Some(b"text/html; charset=\"Shift_JIS\"".as_slice())),
            "<p>西条市新田</p>"
        );
    }

    #[test]
    fn defaults_to_utf8() {
        assert_eq!(decode_html("<p>松山市</p>".as_bytes(), None), "<p>松山市</p>");
        assert_eq!(
            decode_html("<p>松山市</p>".as_bytes(), Some(b"text/html".as_slice())),
            "<p>松山市</p>"
        );
    }

    #[test]
    fn unknown_meta_charset_falls_back_to_header() {
        let (bytes, _, _) = SHIFT_JIS.encode("<meta charset=\"x-bogus\"><p>今治市</p>");
        assert_eq!(
            decode_html(&bytes, Some(b"text/html; charset=Shift_JIS".as_slice())),
            "<meta charset=\"x-bogus\"><p>今治市</p>"
        );
    }

    #[test]
    fn file_name_is_last_path_segment() {
        assert_eq!(
            file_name_for_url(
                "https://raw.githubusercontent.com/geolonia/japanese-addresses/master/data/latest.csv"
            )
            .unwrap(),
            "latest.csv"
        );
    }

    #[test]
    fn file_name_ignores_query_string() {
        assert_eq!(
            file_name_for_url("http://www.police.pref.ehime.jp/fushinsha.htm?page=2").unwrap(),
            "fushinsha.htm"
        );
    }

    #[test]
    fn file_name_skips_trailing_slash() {
        assert_eq!(
            file_name_for_url("https://example.com/data/latest/").unwrap(),
            "latest"
        );
    }

    #[test]
    fn rejects_url_without_path() {
        assert!(matches!(
            file_name_for_url("https://example.com/"),
            Err(ScrapeError::Parse(_))
        ));
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(matches!(
            file_name_for_url("not a url"),
            Err(ScrapeError::Parse(_))
        ));
    }
}
