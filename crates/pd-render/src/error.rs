//! Image fetch and decode errors.

use thiserror::Error;

/// Why an image failed to load. The loader stores the `Display` text per
/// id; nothing above the fetcher ever propagates it.
#[derive(Debug, Error)]
pub enum ImageError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed data URL: {0}")]
    DataUrl(String),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("invalid image URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("decode task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("no async runtime to load images on")]
    NoRuntime,

    #[cfg(target_arch = "wasm32")]
    #[error("browser: {0}")]
    Browser(String),
}

#[cfg(not(target_arch = "wasm32"))]
impl From<base64::DecodeError> for ImageError {
    fn from(e: base64::DecodeError) -> Self {
        Self::DataUrl(e.to_string())
    }
}
