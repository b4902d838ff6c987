use std::{io::Read, path::Path, time::Duration};

use crate::{
    assets::decode::{decode_data_uri, decode_image},
    assets::source::ImageSource,
    foundation::error::{PackshotError, PackshotResult},
    foundation::raster::RasterImage,
};

/// Network and size bounds for [`ImageLoader`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Whole-request timeout for remote sources.
    pub timeout_ms: u64,
    /// Largest accepted encoded payload.
    pub max_bytes: u64,
    /// `User-Agent` header sent with remote requests.
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            max_bytes: 32 * 1024 * 1024,
            user_agent: concat!("packshot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Resolves an [`ImageSource`] to decoded pixels.
///
/// Remote fetches are bounded by [`LoaderConfig::timeout_ms`] and never retried here.
pub struct ImageLoader {
    config: LoaderConfig,
    client: reqwest::blocking::Client,
}

impl ImageLoader {
    /// Build a loader with its own HTTP client.
    pub fn new(config: LoaderConfig) -> PackshotResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms.max(1)))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PackshotError::fetch(format!("build http client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Active configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load and decode `source`.
    #[tracing::instrument(skip(self, source), fields(source = %source.describe()))]
    pub fn load(&self, source: &ImageSource) -> PackshotResult<RasterImage> {
        let bytes = self.read_bytes(source)?;
        decode_image(&bytes)
    }

    /// Resolve `source` to its encoded bytes without decoding.
    pub fn read_bytes(&self, source: &ImageSource) -> PackshotResult<Vec<u8>> {
        let bytes = match source {
            ImageSource::Bytes(b) => b.clone(),
            ImageSource::DataUri(uri) => decode_data_uri(uri)?,
            ImageSource::Url(url) => self.fetch(url)?,
            ImageSource::Path(path) => self.read_file(path)?,
        };
        if bytes.len() as u64 > self.config.max_bytes {
            return Err(PackshotError::fetch(format!(
                "source is {} bytes, limit is {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }
        Ok(bytes)
    }

    fn read_file(&self, path: &Path) -> PackshotResult<Vec<u8>> {
        let io_err =
            |e: std::io::Error| PackshotError::fetch(format!("read '{}': {e}", path.display()));
        let file = std::fs::File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();
        if len > self.config.max_bytes {
            return Err(PackshotError::fetch(format!(
                "'{}' is {len} bytes, limit is {}",
                path.display(),
                self.config.max_bytes
            )));
        }

        let mut bytes = Vec::with_capacity(len as usize);
        file.take(self.config.max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(io_err)?;
        Ok(bytes)
    }

    fn fetch(&self, url: &str) -> PackshotResult<Vec<u8>> {
        tracing::debug!(url, "fetching image");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| PackshotError::fetch(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PackshotError::fetch(format!("HTTP {status}: {url}")));
        }
        if let Some(len) = response.content_length()
            && len > self.config.max_bytes
        {
            return Err(PackshotError::fetch(format!(
                "{url} declares {len} bytes, limit is {}",
                self.config.max_bytes
            )));
        }

        // Read one byte past the limit so oversize bodies without a length header are caught.
        let mut body = Vec::new();
        response
            .take(self.config.max_bytes.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| PackshotError::fetch(format!("read body of {url}: {e}")))?;
        tracing::debug!(url, bytes = body.len(), "fetched image");
        Ok(body)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
