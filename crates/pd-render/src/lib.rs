pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod fetch;
#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod images;
pub mod scene;
pub mod spawn;

#[cfg(target_arch = "wasm32")]
pub use browser::ImageElementFetcher;
pub use error::ImageError;
#[cfg(not(target_arch = "wasm32"))]
pub use fetch::HttpImageFetcher;
pub use images::{Bitmap, ImageEvent, ImageFetcher, ImageLoader, ImageState};
pub use scene::{ItemPaint, RenderContext, RenderItem, ResolvedScene, request_images, resolve_scene};
pub use spawn::{DefaultSpawner, Spawn};

/// The fetcher for the current target: `<img>` elements in the browser,
/// HTTP natively.
#[cfg(target_arch = "wasm32")]
pub type PlatformFetcher = ImageElementFetcher;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformFetcher = HttpImageFetcher;
