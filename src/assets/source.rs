use std::path::PathBuf;

/// Reference to an image the compositor should load.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Already-fetched encoded bytes.
    Bytes(Vec<u8>),
    /// Embedded `data:` URI, e.g. `data:image/png;base64,...`.
    DataUri(String),
    /// Remote `http://` or `https://` URL.
    Url(String),
    /// Local file.
    Path(PathBuf),
}

impl ImageSource {
    /// Classify a textual reference by its scheme.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let lower = trimmed
            .get(..8)
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| trimmed.to_ascii_lowercase());
        if lower.starts_with("data:") {
            Self::DataUri(trimmed.to_string())
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    /// Short description safe for logs (no payload bytes).
    pub fn describe(&self) -> String {
        match self {
            Self::Bytes(b) => format!("bytes({})", b.len()),
            Self::DataUri(s) => {
                let head = s.split(',').next().unwrap_or("data:");
                format!("{head},<{} chars>", s.len())
            }
            Self::Url(u) => u.clone(),
            Self::Path(p) => p.display().to_string(),
        }
    }
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ImageSource").field(&self.describe()).finish()
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
