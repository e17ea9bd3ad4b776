//! CORS-safety rewrite rule for image URLs.
//!
//! Canvas exports taint on cross-origin pixels, so any absolute http(s)
//! URL on another origin is routed through a same-origin proxy endpoint.
//! Data, blob and relative URLs pass through unchanged, as do URLs that
//! already point at the proxy.

use crate::config::EditorConfig;
use std::borrow::Cow;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRule {
    origin: Option<Url>,
    endpoint: String,
}

impl ProxyRule {
    /// `origin` is the page origin; `None` treats every absolute URL as
    /// cross-origin.
    ///
    /// # Errors
    /// Returns the parse error if `origin` is not an absolute URL.
    pub fn new(endpoint: impl Into<String>, origin: Option<&str>) -> Result<Self, url::ParseError> {
        Ok(Self {
            origin: origin.map(Url::parse).transpose()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &EditorConfig) -> Result<Self, url::ParseError> {
        Self::new(config.proxy_endpoint.clone(), config.origin.as_deref())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }

    /// Whether `raw` must be fetched through the proxy.
    pub fn needs_proxy(&self, raw: &str) -> bool {
        let raw = raw.trim();
        if raw.is_empty()
            || raw.starts_with("data:")
            || raw.starts_with("blob:")
            || raw.starts_with(&self.endpoint)
        {
            return false;
        }
        let absolute: Cow<'_, str> = if raw.starts_with("//") {
            Cow::Owned(format!("https:{raw}"))
        } else {
            Cow::Borrowed(raw)
        };
        let Ok(url) = Url::parse(&absolute) else {
            // Relative (or unparseable) URLs resolve against the page.
            return false;
        };
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        self.origin
            .as_ref()
            .is_none_or(|origin| origin.origin() != url.origin())
    }

    /// Rewrite `raw` to go through the proxy when it is cross-origin.
    pub fn proxied_url<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if !self.needs_proxy(raw) {
            return Cow::Borrowed(raw);
        }
        let encoded: String = url::form_urlencoded::byte_serialize(raw.trim().as_bytes()).collect();
        Cow::Owned(format!("{}?url={encoded}", self.endpoint))
    }
}

impl Default for ProxyRule {
    fn default() -> Self {
        Self {
            origin: None,
            endpoint: EditorConfig::default().proxy_endpoint,
        }
    }
}
