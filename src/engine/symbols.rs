//! Mana symbol resolution
//!
//! Symbol keys (`W`, `2`, `W/U`, ...) map to small raster icons. Every key is
//! loaded at most once for the life of the resolver: the first request starts
//! the load and later requests, including ones arriving while it is still in
//! flight, share the same pending result. Failed loads resolve to `None` so a
//! missing icon never fails a render.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use image::RgbaImage;
use parking_lot::Mutex;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::TypeGroup;

/// Symbol loading errors
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("Symbol not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to decode symbol image: {0}")]
    Decode(#[from] image::ImageError),
}

/// A loaded icon, or `None` when the asset could not be loaded
pub type SymbolHandle = Option<Arc<RgbaImage>>;

/// Resolved icons keyed by symbol
pub type SymbolMap = HashMap<String, SymbolHandle>;

/// Where symbol images come from
#[async_trait]
pub trait SymbolSource: Send + Sync {
    async fn load(&self, key: &str) -> Result<RgbaImage, SymbolError>;
}

/// File name for a symbol key; keys like `W/U` contain path separators
pub fn symbol_file_name(key: &str) -> String {
    format!("{}.png", utf8_percent_encode(key, NON_ALPHANUMERIC))
}

/// Extract `{...}` tokens from a mana cost, left to right
///
/// `"{2}{W}{W}"` gives `["2", "W", "W"]`; empty input gives nothing.
pub fn parse_mana_cost(mana_cost: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = mana_cost;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        if close > 0 {
            tokens.push(after[..close].to_string());
        }
        rest = &after[close + 1..];
    }
    tokens
}

/// PNG icons in a local directory
pub struct DirSymbolSource {
    dir: PathBuf,
}

impl DirSymbolSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirSymbolSource { dir: dir.into() }
    }
}

#[async_trait]
impl SymbolSource for DirSymbolSource {
    async fn load(&self, key: &str) -> Result<RgbaImage, SymbolError> {
        let path = self.dir.join(symbol_file_name(key));
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SymbolError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

/// PNG icons served over HTTP under a base URL
pub struct HttpSymbolSource {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpSymbolSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SymbolError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent(concat!("deckprint/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpSymbolSource {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }
}

#[async_trait]
impl SymbolSource for HttpSymbolSource {
    async fn load(&self, key: &str) -> Result<RgbaImage, SymbolError> {
        let url = format!("{}/{}", self.base_url, symbol_file_name(key));
        let response = self.http_client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SymbolError::NotFound(format!("HTTP {}: {}", response.status(), url)));
        }
        let bytes = response.bytes().await?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

type PendingSymbol = Shared<BoxFuture<'static, SymbolHandle>>;

/// Append-only symbol cache in front of a [`SymbolSource`]
pub struct SymbolResolver {
    source: Arc<dyn SymbolSource>,
    cache: Mutex<HashMap<String, PendingSymbol>>,
}

impl SymbolResolver {
    pub fn new(source: Arc<dyn SymbolSource>) -> Self {
        SymbolResolver {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Load one symbol, sharing any load already started for the key
    pub fn load(&self, key: &str) -> impl std::future::Future<Output = SymbolHandle> {
        let mut cache = self.cache.lock();
        if let Some(pending) = cache.get(key) {
            return pending.clone();
        }

        debug!(key = %key, "Loading symbol");
        let source = Arc::clone(&self.source);
        let owned_key = key.to_string();
        let pending = async move {
            match source.load(&owned_key).await {
                Ok(image) => Some(Arc::new(image)),
                Err(e) => {
                    warn!(key = %owned_key, error = %e, "Symbol unavailable, skipping");
                    None
                }
            }
        }
        .boxed()
        .shared();

        cache.insert(key.to_string(), pending.clone());
        pending
    }

    /// Resolve a batch of keys, waiting for all loads together
    pub async fn resolve<I, K>(&self, keys: I) -> SymbolMap
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for key in keys {
            let key = key.as_ref();
            if seen.insert(key.to_string()) {
                unique.push(key.to_string());
            }
        }

        let loads: Vec<_> = unique.iter().map(|k| self.load(k)).collect();
        let handles = join_all(loads).await;
        unique.into_iter().zip(handles).collect()
    }

    /// Resolve every symbol used by the cards in `groups`
    pub async fn preload(&self, groups: &[TypeGroup]) -> SymbolMap {
        let keys = groups
            .iter()
            .flat_map(|g| g.cards.iter())
            .flat_map(|c| parse_mana_cost(&c.mana_cost));
        self.resolve(keys).await
    }

    /// Number of keys ever requested
    pub fn cached_count(&self) -> usize {
        self.cache.lock().len()
    }
}
