//! Asynchronous image resources keyed by element id.
//!
//! Each id moves through `Unrequested → Loading → Loaded | Failed`.
//! `resolve` deduplicates: an id that is loading or has failed is left
//! alone, and only `retry` reloads a failure. Loads run through a
//! [`Spawn`] (tokio natively, the microtask queue in the browser) and finish
//! out of order; every state change is published on a broadcast channel so
//! the canvas can re-render.

use crate::error::ImageError;
use crate::spawn::{DefaultSpawner, LoadTask, MaybeSend, MaybeSync, Spawn};
use pd_core::id::ElementId;
use pd_core::proxy::ProxyRule;
use pd_core::Size;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Decoded RGBA8 pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bitmap({}×{})", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    Unrequested,
    Loading,
    Loaded,
    Failed,
}

impl ImageState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unrequested => "unrequested",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }
}

/// Published whenever an id changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageEvent {
    pub id: ElementId,
    pub state: ImageState,
}

/// Turns a (possibly proxied) URL into pixels.
pub trait ImageFetcher: MaybeSend + MaybeSync + 'static {
    fn fetch(&self, url: String) -> impl Future<Output = Result<Bitmap, ImageError>> + MaybeSend;
}

#[derive(Debug, Default)]
struct Entry {
    state: ImageState,
    /// The URL as the element referenced it, before proxying.
    url: String,
    bitmap: Option<Arc<Bitmap>>,
    error: Option<String>,
    /// Number of the load this entry waits for; completions of any other
    /// load (before a `retry` or `forget`) are dropped.
    generation: u64,
}

struct Inner<F> {
    fetcher: F,
    spawner: Box<dyn Spawn>,
    proxy: ProxyRule,
    next_load: AtomicU64,
    entries: Mutex<HashMap<ElementId, Entry>>,
    events: broadcast::Sender<ImageEvent>,
}

impl<F> Inner<F> {
    fn entries(&self) -> MutexGuard<'_, HashMap<ElementId, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, id: ElementId, state: ImageState) {
        // No receivers is fine.
        let _ = self.events.send(ImageEvent { id, state });
    }

    fn finish(&self, id: ElementId, generation: u64, result: Result<Bitmap, ImageError>) {
        let state = {
            let mut entries = self.entries();
            let Some(entry) = entries.get_mut(&id) else {
                return;
            };
            if entry.generation != generation {
                log::trace!("image {id}: dropping stale load #{generation}");
                return;
            }
            match result {
                Ok(bitmap) => {
                    log::debug!("image {id}: loaded {}×{}", bitmap.width, bitmap.height);
                    entry.state = ImageState::Loaded;
                    entry.bitmap = Some(Arc::new(bitmap));
                    entry.error = None;
                }
                Err(e) => {
                    log::warn!("image {id}: failed to load {}: {e}", entry.url);
                    entry.state = ImageState::Failed;
                    entry.bitmap = None;
                    entry.error = Some(e.to_string());
                }
            }
            entry.state
        };
        self.publish(id, state);
    }
}

/// Shared handle to the image cache. Clones refer to the same cache.
pub struct ImageLoader<F> {
    inner: Arc<Inner<F>>,
}

impl<F> Clone for ImageLoader<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: ImageFetcher> ImageLoader<F> {
    pub fn new(fetcher: F, proxy: ProxyRule) -> Self {
        Self::with_spawner(fetcher, proxy, DefaultSpawner::default())
    }

    pub fn with_spawner(fetcher: F, proxy: ProxyRule, spawner: impl Spawn) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                fetcher,
                spawner: Box::new(spawner),
                proxy,
                next_load: AtomicU64::new(1),
                entries: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    pub fn proxy(&self) -> &ProxyRule {
        &self.inner.proxy
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ImageEvent> {
        self.inner.events.subscribe()
    }

    /// Start loading `raw_url` for `id` unless that id is already loading,
    /// has failed, or is loaded from the same URL. Returns whether a load
    /// was started.
    ///
    /// If the spawner refuses the load (natively: no tokio runtime on this
    /// thread) the id is marked failed.
    pub fn resolve(&self, id: ElementId, raw_url: &str) -> bool {
        let raw_url = raw_url.trim();
        if raw_url.is_empty() {
            return false;
        }

        let generation = {
            let mut entries = self.inner.entries();
            let entry = entries.entry(id).or_default();
            match entry.state {
                ImageState::Loading | ImageState::Failed => return false,
                ImageState::Loaded if entry.url == raw_url => return false,
                ImageState::Loaded | ImageState::Unrequested => {}
            }
            entry.generation = self.inner.next_load.fetch_add(1, Ordering::Relaxed);
            entry.state = ImageState::Loading;
            entry.url = raw_url.to_string();
            entry.error = None;
            entry.generation
        };

        let url = self.inner.proxy.proxied_url(raw_url).into_owned();
        log::debug!("image {id}: loading {url}");
        // `Loading` always precedes the result event.
        self.inner.publish(id, ImageState::Loading);
        let inner = Arc::clone(&self.inner);
        let task: LoadTask = Box::pin(async move {
            let result = inner.fetcher.fetch(url).await;
            inner.finish(id, generation, result);
        });
        if let Err(e) = self.inner.spawner.spawn(task) {
            self.inner.finish(id, generation, Err(e));
            return false;
        }
        true
    }

    /// Forget any failed or in-flight load for `id` and resolve again.
    pub fn retry(&self, id: ElementId, raw_url: &str) -> bool {
        if let Some(entry) = self.inner.entries().get_mut(&id) {
            entry.state = ImageState::Unrequested;
            entry.error = None;
        }
        self.resolve(id, raw_url)
    }

    pub fn state(&self, id: ElementId) -> ImageState {
        self.inner
            .entries()
            .get(&id)
            .map_or(ImageState::Unrequested, |e| e.state)
    }

    /// The URL last requested for `id`, before proxying.
    pub fn url(&self, id: ElementId) -> Option<String> {
        self.inner.entries().get(&id).map(|e| e.url.clone())
    }

    pub fn bitmap(&self, id: ElementId) -> Option<Arc<Bitmap>> {
        self.inner.entries().get(&id).and_then(|e| e.bitmap.clone())
    }

    pub fn error(&self, id: ElementId) -> Option<String> {
        self.inner.entries().get(&id).and_then(|e| e.error.clone())
    }

    /// Drop the entry for `id`, bitmap included. A load still in flight
    /// for it is discarded when it completes.
    pub fn forget(&self, id: ElementId) -> bool {
        self.inner.entries().remove(&id).is_some()
    }

    /// Keep only the entries whose id passes `keep`, e.g. the ids still in
    /// the scene. Returns how many were dropped.
    pub fn retain(&self, mut keep: impl FnMut(ElementId) -> bool) -> usize {
        let mut entries = self.inner.entries();
        let before = entries.len();
        entries.retain(|id, _| keep(*id));
        let dropped = before - entries.len();
        if dropped > 0 {
            log::debug!("dropped {dropped} cached image(s)");
        }
        dropped
    }

    /// Drop every cached entry. In-flight loads finish into the void.
    pub fn clear(&self) {
        self.inner.entries().clear();
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    struct Solid;

    impl ImageFetcher for Solid {
        async fn fetch(&self, _url: String) -> Result<Bitmap, ImageError> {
            Ok(Bitmap {
                width: 2,
                height: 1,
                pixels: vec![255; 8],
            })
        }
    }

    #[test]
    fn without_runtime_marks_failed() {
        let loader = ImageLoader::new(Solid, ProxyRule::default());
        let id = ElementId::intern("img_no_rt");
        assert!(!loader.resolve(id, "https://cdn.example.com/a.png"));
        assert_eq!(loader.state(id), ImageState::Failed);
        assert!(loader.error(id).is_some_and(|e| e.contains("runtime")));
    }

    #[test]
    fn forget_and_retain_drop_entries() {
        let loader = ImageLoader::new(Solid, ProxyRule::default());
        let gone = ElementId::intern("img_gone");
        let kept = ElementId::intern("img_kept");
        let other = ElementId::intern("img_other");
        for id in [gone, kept, other] {
            loader.resolve(id, "https://cdn.example.com/a.png");
        }

        assert!(loader.forget(gone));
        assert!(!loader.forget(gone));
        assert_eq!(loader.state(gone), ImageState::Unrequested);

        assert_eq!(loader.retain(|id| id == kept), 1);
        assert_eq!(loader.state(kept), ImageState::Failed);
        assert_eq!(loader.url(other), None);
    }

    #[test]
    fn blank_url_is_ignored() {
        let loader = ImageLoader::new(Solid, ProxyRule::default());
        let id = ElementId::intern("img_blank");
        assert!(!loader.resolve(id, "   "));
        assert_eq!(loader.state(id), ImageState::Unrequested);
        assert_eq!(loader.url(id), None);
    }

    #[tokio::test]
    async fn loads_and_publishes() {
        let loader = ImageLoader::new(Solid, ProxyRule::default());
        let mut events = loader.subscribe();
        let id = ElementId::intern("img_ok");

        assert!(loader.resolve(id, "https://cdn.example.com/a.png"));
        assert_eq!(events.recv().await.unwrap().state, ImageState::Loading);
        assert_eq!(events.recv().await.unwrap(), ImageEvent {
            id,
            state: ImageState::Loaded
        });
        assert_eq!(loader.bitmap(id).unwrap().size(), Size::new(2.0, 1.0));
        assert_eq!(loader.error(id), None);
    }
}
