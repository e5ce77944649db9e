//! Image fetching
//!
//! Each product image is resolved from its reference exactly once, with a
//! hard timeout. Failures are values, not errors: the renderer draws a
//! placeholder and moves on to the next item.

use std::future::Future;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Placeholder replaced by the image reference in URL templates
pub const REF_PLACEHOLDER: &str = "{ref}";

pub const DEFAULT_URL_TEMPLATE: &str = "https://arquivos.mercos.com/media/{ref}";

/// Encoded image bytes with their decoded pixel dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Why an item's image could not be obtained
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageFetchFailure {
    #[error("item has no image reference")]
    MissingReference,
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP status {0}")]
    Http(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("undecodable image: {0}")]
    Decode(String),
}

pub type FetchResult = std::result::Result<ImageData, ImageFetchFailure>;

/// Resolves an image reference to image data.
///
/// Implementations make a single attempt; the caller applies the timeout.
pub trait ImageFetcher {
    fn fetch(&self, image_ref: &str) -> impl Future<Output = FetchResult> + Send;
}

/// Fetch `image_ref` with a hard `timeout`; a timeout is reported as
/// [`ImageFetchFailure::Timeout`].
pub async fn fetch_with_timeout<F: ImageFetcher>(
    fetcher: &F,
    image_ref: &str,
    timeout: Duration,
) -> FetchResult {
    if image_ref.trim().is_empty() {
        return Err(ImageFetchFailure::MissingReference);
    }

    match tokio::time::timeout(timeout, fetcher.fetch(image_ref.trim())).await {
        Ok(result) => result,
        Err(_) => Err(ImageFetchFailure::Timeout(timeout)),
    }
}

/// Check that `bytes` hold a decodable image and read its dimensions
pub fn decode_image_data(bytes: Vec<u8>) -> FetchResult {
    let reader = image::ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|e| ImageFetchFailure::Decode(e.to_string()))?;

    if reader.format().is_none() {
        return Err(ImageFetchFailure::Decode("unknown image format".to_string()));
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ImageFetchFailure::Decode(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(ImageFetchFailure::Decode("empty image".to_string()));
    }

    Ok(ImageData {
        bytes,
        width,
        height,
    })
}

/// Build the image URL for `image_ref` from a template containing `{ref}`
pub fn image_url(template: &str, image_ref: &str) -> String {
    template.replace(REF_PLACEHOLDER, image_ref)
}

// =============================================================================
// HTTP
// =============================================================================

/// Fetches images over HTTP(S) from a templated URL
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    url_template: String,
}

impl HttpImageFetcher {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url_template)
    }

    pub fn with_client(client: reqwest::Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    pub fn url_for(&self, image_ref: &str) -> String {
        image_url(&self.url_template, image_ref)
    }
}

impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, image_ref: &str) -> FetchResult {
        let url = self.url_for(image_ref);
        log::debug!("Fetching image {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ImageFetchFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchFailure::Http(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageFetchFailure::Transport(e.to_string()))?;

        decode_image_data(bytes.to_vec())
    }
}

// =============================================================================
// Local files
// =============================================================================

/// Resolves image references as file names inside a directory
#[derive(Debug, Clone)]
pub struct FileImageFetcher {
    root: PathBuf,
}

impl FileImageFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageFetcher for FileImageFetcher {
    async fn fetch(&self, image_ref: &str) -> FetchResult {
        let path = self.root.join(image_ref);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ImageFetchFailure::Transport(format!("{}: {}", path.display(), e)))?;
        decode_image_data(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageEncoder, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    struct SlowFetcher(Duration);

    impl ImageFetcher for SlowFetcher {
        async fn fetch(&self, _image_ref: &str) -> FetchResult {
            tokio::time::sleep(self.0).await;
            decode_image_data(png_bytes(2, 2))
        }
    }

    #[test]
    fn test_url_template() {
        assert_eq!(
            image_url(DEFAULT_URL_TEMPLATE, "abc/123.jpg"),
            "https://arquivos.mercos.com/media/abc/123.jpg"
        );
        let fetcher = HttpImageFetcher::new("http://proxy.local/img?url={ref}&w=400");
        assert_eq!(fetcher.url_for("x.png"), "http://proxy.local/img?url=x.png&w=400");
    }

    #[test]
    fn test_decode_reads_dimensions() {
        let data = decode_image_data(png_bytes(40, 30)).unwrap();
        assert_eq!((data.width, data.height), (40, 30));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_image_data(b"<html>not found</html>".to_vec());
        assert!(matches!(result, Err(ImageFetchFailure::Decode(_))));
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure_value() {
        let fetcher = SlowFetcher(Duration::from_millis(200));
        let result = fetch_with_timeout(&fetcher, "a.png", Duration::from_millis(10)).await;
        assert_eq!(
            result,
            Err(ImageFetchFailure::Timeout(Duration::from_millis(10)))
        );
    }

    #[tokio::test]
    async fn test_fast_fetch_succeeds_within_timeout() {
        let fetcher = SlowFetcher(Duration::from_millis(1));
        let result = fetch_with_timeout(&fetcher, "a.png", Duration::from_secs(5)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_empty_reference_is_not_fetched() {
        let fetcher = SlowFetcher(Duration::from_secs(60));
        let result = fetch_with_timeout(&fetcher, "  ", Duration::from_secs(5)).await;
        assert_eq!(result, Err(ImageFetchFailure::MissingReference));
    }

    #[tokio::test]
    async fn test_file_fetcher() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.png"), png_bytes(8, 4)).unwrap();
        let fetcher = FileImageFetcher::new(dir.path());

        let ok = fetcher.fetch("ok.png").await.unwrap();
        assert_eq!((ok.width, ok.height), (8, 4));

        let missing = fetcher.fetch("missing.png").await;
        assert!(matches!(missing, Err(ImageFetchFailure::Transport(_))));
    }
}
