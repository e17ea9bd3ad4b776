//! The production [`ImageFetcher`]: HTTP(S) via `reqwest`, inline
//! `data:` URLs via `base64`, decoding via `image`.

use crate::error::ImageError;
use crate::images::{Bitmap, ImageFetcher};
use base64::{Engine as _, engine::general_purpose};
use pd_core::proxy::ProxyRule;
use url::Url;

pub struct HttpImageFetcher {
    client: reqwest::Client,
    /// Relative URLs (including the proxy endpoint) are joined onto this.
    base: Option<Url>,
}

impl HttpImageFetcher {
    pub fn new(base: Option<Url>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    /// A fetcher that resolves relative URLs against the rule's page origin.
    pub fn for_rule(rule: &ProxyRule) -> Self {
        Self::new(rule.origin().cloned())
    }

    fn locate(&self, raw: &str) -> Result<Url, ImageError> {
        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base {
                Some(base) => base.join(raw)?,
                None => return Err(url::ParseError::RelativeUrlWithoutBase.into()),
            },
            Err(e) => return Err(e.into()),
        };
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ImageError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: String) -> Result<Bitmap, ImageError> {
        let bytes = if url.starts_with("data:") {
            decode_data_url(&url)?
        } else {
            let target = self.locate(&url)?;
            let response = self.client.get(target.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ImageError::Status {
                    status: status.as_u16(),
                    url: target.to_string(),
                });
            }
            response.bytes().await?.to_vec()
        };
        tokio::task::spawn_blocking(move || decode_bitmap(&bytes)).await?
    }
}

/// Payload bytes of a base64 `data:` URL.
pub fn decode_data_url(raw: &str) -> Result<Vec<u8>, ImageError> {
    let rest = raw
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::DataUrl("missing data: prefix".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::DataUrl("missing ',' separator".into()))?;
    if !meta.ends_with(";base64") {
        return Err(ImageError::DataUrl(format!("unsupported encoding '{meta}'")));
    }
    Ok(general_purpose::STANDARD.decode(payload.trim())?)
}

/// Decode any format the `image` crate recognises into RGBA8.
pub fn decode_bitmap(bytes: &[u8]) -> Result<Bitmap, ImageError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    Ok(Bitmap {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}
