//! Catalog loading.
//!
//! The catalog is fetched once at startup through a [`CatalogProvider`].
//! Loading never fails outright: if the source cannot be read or parsed the
//! single built-in fallback record is used so the gallery still renders.

use std::future::Future;
use std::path::PathBuf;

use crate::data::Catalog;
use crate::error::CatalogError;
use crate::parser::parse_catalog;

/// Loading phase indicator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingPhase {
    /// Not loading anything
    Idle,
    /// Catalog fetch in flight
    Fetching,
    /// Catalog available (possibly the fallback)
    Ready,
}

/// Where the loaded catalog came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    /// Read and parsed from the provider
    Provider,
    /// The provider failed; holds the reason
    Fallback(String),
}

/// Result of [`load_catalog`].
#[derive(Clone, Debug)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub source: CatalogSource,
}

impl LoadedCatalog {
    /// Check whether the fallback record is in use.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, CatalogSource::Fallback(_))
    }
}

/// Result type for catalog loading operations
pub type LoadResult<T> = Result<T, CatalogError>;

/// Trait for async catalog sources.
///
/// Implement this trait to read the catalog document from your I/O mechanism
/// (fetch API, filesystem, bundled data, ...).
///
/// No `Send` bounds, so it works in both native and WASM (single-threaded) contexts.
pub trait CatalogProvider {
    /// Read the raw catalog document.
    fn fetch_catalog(&self) -> impl Future<Output = LoadResult<String>>;
}

/// Provider serving a document held in memory.
#[derive(Clone, Debug)]
pub struct StaticCatalogProvider {
    text: String,
}

impl StaticCatalogProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Provider for the catalog bundled with the crate.
    pub fn bundled() -> Self {
        Self::new(crate::data::BUNDLED_CATALOG)
    }
}

impl CatalogProvider for StaticCatalogProvider {
    async fn fetch_catalog(&self) -> LoadResult<String> {
        Ok(self.text.clone())
    }
}

/// Provider reading a document from the filesystem.
#[derive(Clone, Debug)]
pub struct FileCatalogProvider {
    path: PathBuf,
}

impl FileCatalogProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogProvider for FileCatalogProvider {
    async fn fetch_catalog(&self) -> LoadResult<String> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| CatalogError::Source(format!("{}: {}", self.path.display(), e)))
    }
}

/// Load the catalog, falling back to the built-in record on any failure.
///
/// ## Example
///
/// ```rust
/// use kaomoji_core_view::loader::{load_catalog, StaticCatalogProvider};
///
/// # tokio_test_block_on(async {
/// let loaded = load_catalog(&StaticCatalogProvider::new("not json")).await;
/// assert!(loaded.is_fallback());
/// assert_eq!(loaded.catalog.len(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub async fn load_catalog<P: CatalogProvider>(provider: &P) -> LoadedCatalog {
    let result = match provider.fetch_catalog().await {
        Ok(text) => parse_catalog(&text),
        Err(e) => Err(e),
    };

    match result {
        Ok(catalog) => {
            log::info!("loaded {} stickers", catalog.len());
            LoadedCatalog {
                catalog,
                source: CatalogSource::Provider,
            }
        }
        Err(e) => {
            log::warn!("failed to load catalog, using fallback: {e}");
            LoadedCatalog {
                catalog: Catalog::fallback(),
                source: CatalogSource::Fallback(e.to_string()),
            }
        }
    }
}

/// Tracks the startup catalog load so a host can gate its first render.
#[derive(Clone, Debug)]
pub struct CatalogLoaderState {
    pub phase: LoadingPhase,
    pub loaded: Option<LoadedCatalog>,
}

impl Default for CatalogLoaderState {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogLoaderState {
    pub fn new() -> Self {
        Self {
            phase: LoadingPhase::Idle,
            loaded: None,
        }
    }

    /// Mark the fetch as started.
    pub fn start_loading(&mut self) {
        self.phase = LoadingPhase::Fetching;
        self.loaded = None;
    }

    /// Store the loaded catalog.
    pub fn finish_loading(&mut self, loaded: LoadedCatalog) {
        self.loaded = Some(loaded);
        self.phase = LoadingPhase::Ready;
    }

    /// Check if the gallery can render.
    pub fn can_render(&self) -> bool {
        self.phase == LoadingPhase::Ready && self.loaded.is_some()
    }

    /// Drive a full load through `provider`.
    pub async fn load<P: CatalogProvider>(&mut self, provider: &P) {
        self.start_loading();
        let loaded = load_catalog(provider).await;
        self.finish_loading(loaded);
    }
}

/// Provider fetching the document over HTTP with the browser's `fetch`.
#[cfg(feature = "web")]
#[derive(Clone, Debug)]
pub struct FetchCatalogProvider {
    url: String,
}

#[cfg(feature = "web")]
impl FetchCatalogProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(feature = "web")]
impl CatalogProvider for FetchCatalogProvider {
    async fn fetch_catalog(&self) -> LoadResult<String> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let window = web_sys::window().ok_or_else(|| CatalogError::Source("No window available".into()))?;
        let response = JsFuture::from(window.fetch_with_str(&self.url))
            .await
            .map_err(|e| CatalogError::Source(format!("{e:?}")))?
            .dyn_into::<web_sys::Response>()
            .map_err(|_| CatalogError::Source("fetch did not return a Response".into()))?;
        if !response.ok() {
            return Err(CatalogError::Source(format!("HTTP {} for {}", response.status(), self.url)));
        }
        let text = JsFuture::from(response.text().map_err(|e| CatalogError::Source(format!("{e:?}")))?)
            .await
            .map_err(|e| CatalogError::Source(format!("{e:?}")))?;
        text.as_string()
            .ok_or_else(|| CatalogError::Source("response body is not text".into()))
    }
}

/// Yield control back to the browser event loop.
///
/// Pass this as the `yield_fn` of a paced export to keep the page
/// responsive while frames are sampled.
#[cfg(feature = "web")]
pub async fn yield_to_event_loop() {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        if let Some(window) = web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0);
        } else {
            let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
