//! Where image loads run.
//!
//! Native builds spawn onto the ambient tokio runtime. In the browser there
//! is one thread and JS promises are `!Send`, so loads go to the
//! `wasm-bindgen-futures` microtask queue and the `Send` bounds fall away.

use crate::error::ImageError;
use std::future::Future;
use std::pin::Pin;

#[cfg(not(target_arch = "wasm32"))]
mod bounds {
    pub trait MaybeSend: Send {}
    impl<T: Send + ?Sized> MaybeSend for T {}

    pub trait MaybeSync: Sync {}
    impl<T: Sync + ?Sized> MaybeSync for T {}
}

#[cfg(target_arch = "wasm32")]
mod bounds {
    pub trait MaybeSend {}
    impl<T: ?Sized> MaybeSend for T {}

    pub trait MaybeSync {}
    impl<T: ?Sized> MaybeSync for T {}
}

/// `Send` natively, nothing on wasm32.
pub use bounds::MaybeSend;
/// `Sync` natively, nothing on wasm32.
pub use bounds::MaybeSync;

/// One image load, fetch through cache update.
#[cfg(not(target_arch = "wasm32"))]
pub type LoadTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
#[cfg(target_arch = "wasm32")]
pub type LoadTask = Pin<Box<dyn Future<Output = ()> + 'static>>;

/// Runs load tasks to completion in the background.
pub trait Spawn: MaybeSend + MaybeSync + 'static {
    /// Start `task`. An error means it will never run.
    fn spawn(&self, task: LoadTask) -> Result<(), ImageError>;
}

/// Spawns onto the tokio runtime of the calling thread.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

#[cfg(not(target_arch = "wasm32"))]
impl Spawn for TokioSpawner {
    fn spawn(&self, task: LoadTask) -> Result<(), ImageError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| ImageError::NoRuntime)?;
        handle.spawn(task);
        Ok(())
    }
}

/// Spawns onto the browser's microtask queue.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSpawner;

#[cfg(target_arch = "wasm32")]
impl Spawn for LocalSpawner {
    fn spawn(&self, task: LoadTask) -> Result<(), ImageError> {
        wasm_bindgen_futures::spawn_local(task);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub type DefaultSpawner = TokioSpawner;
#[cfg(target_arch = "wasm32")]
pub type DefaultSpawner = LocalSpawner;
