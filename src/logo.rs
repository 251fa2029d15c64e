//! # Logo Resolution
//!
//! Turns a caller-supplied logo source into an RGBA raster sized for its
//! slot.
//!
//! ## Supported Sources
//!
//! - `data:image/<type>;base64,<payload>` - inline image, decoded locally
//! - anything else - treated as a URL and fetched once over HTTP
//!
//! Fetching is a single attempt with a bounded timeout and a bounded body
//! size. Sources are resolved fresh for every request; nothing is cached.
//!
//! Inline payloads are decoded leniently: padding is optional and ASCII
//! whitespace (line-wrapped encoders) is ignored.

use async_trait::async_trait;
use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use image::{DynamicImage, RgbaImage, imageops::FilterType};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{PlacardError, Result};

/// Prefix identifying an inline image source.
pub const INLINE_PREFIX: &str = "data:image/";

/// Default timeout for remote logo fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest remote logo body accepted, matching the inbound request limit.
pub const MAX_LOGO_BYTES: usize = 25 * 1024 * 1024;

/// Standard alphabet, padding optional.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Classified logo source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoSource<'a> {
    /// Inline payload: everything after the first `,` of a data URI.
    /// `None` when the URI has no separator.
    Inline { payload: Option<&'a str> },
    /// Remote location.
    Remote(&'a str),
}

impl<'a> LogoSource<'a> {
    pub fn parse(source: &'a str) -> Self {
        if source.starts_with(INLINE_PREFIX) {
            LogoSource::Inline {
                payload: source.split_once(',').map(|(_, payload)| payload),
            }
        } else {
            LogoSource::Remote(source)
        }
    }
}

/// Retrieves raw bytes for a remote logo.
#[async_trait]
pub trait LogoFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP fetcher backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("placard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PlacardError::LogoFetch(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            client,
            max_bytes: MAX_LOGO_BYTES,
        })
    }

    /// Override the body size cap.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn too_large(&self, url: &str) -> PlacardError {
        PlacardError::LogoFetch(format!(
            "Logo at {} exceeds {} bytes",
            url, self.max_bytes
        ))
    }
}

#[async_trait]
impl LogoFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                PlacardError::LogoFetch(format!("Timed out downloading {}", url))
            } else {
                PlacardError::LogoFetch(format!("Failed to download {}: {}", url, e))
            }
        })?;

        if !response.status().is_success() {
            return Err(PlacardError::LogoFetch(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(self.too_large(url));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| PlacardError::LogoFetch(format!("Failed to read {}: {}", url, e)))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

/// Resolves logo sources into slot-sized rasters.
#[derive(Clone)]
pub struct LogoResolver {
    fetcher: Arc<dyn LogoFetcher>,
}

impl std::fmt::Debug for LogoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoResolver").finish_non_exhaustive()
    }
}

impl LogoResolver {
    pub fn new(fetcher: Arc<dyn LogoFetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolver that fetches over HTTP with the given timeout.
    pub fn http(timeout: Duration) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpFetcher::new(timeout)?)))
    }

    /// Load and decode a source at its native size.
    pub async fn load(&self, source: &str) -> Result<DynamicImage> {
        let bytes = match LogoSource::parse(source) {
            LogoSource::Inline { payload } => decode_inline(payload)?,
            LogoSource::Remote(url) => {
                tracing::debug!(url, "fetching logo");
                self.fetcher.fetch(url).await?
            }
        };

        image::load_from_memory(&bytes)
            .map_err(|e| PlacardError::LogoDecode(format!("Failed to decode image: {}", e)))
    }

    /// Load a source and force it to exactly `width`x`height`.
    pub async fn resolve(&self, source: &str, width: u32, height: u32) -> Result<RgbaImage> {
        let image = self.load(source).await?;
        tokio::task::spawn_blocking(move || resize_to_slot(&image, width, height))
            .await
            .map_err(|e| PlacardError::Task(e.to_string()))
    }
}

fn decode_inline(payload: Option<&str>) -> Result<Vec<u8>> {
    let payload = payload.ok_or_else(|| {
        PlacardError::LogoDecode("Inline image has no ',' separator".to_string())
    })?;
    let compact: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    LENIENT_BASE64
        .decode(compact)
        .map_err(|e| PlacardError::LogoDecode(format!("Invalid base64 payload: {}", e)))
}

/// Resize to exact dimensions, ignoring the source aspect ratio.
pub fn resize_to_slot(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    image
        .resize_exact(width, height, FilterType::Lanczos3)
        .to_rgba8()
}
