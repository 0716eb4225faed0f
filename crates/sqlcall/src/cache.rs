//! Compiled call caching with LRU eviction.
//!
//! Compiling a call costs a round trip for database info and another for
//! the procedure columns. Applications calling the same procedure many
//! times compile it once and share the result. [`CallCache`] keeps compiled
//! calls keyed by the whole call definition; [`SharedCallCache`] wraps it
//! for use from many tasks.
//!
//! Row mappers are not part of the key: two definitions differing only in
//! the mapper attached to a parameter share one compiled call.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use sqlcall_metadata::MetadataSource;
use sqlcall_types::{ParameterDirection, ParameterSpec, SqlType};

use crate::call::Call;
use crate::config::CallConfig;
use crate::error::Result;
use crate::state::{Compiled, Declaring};

/// Default maximum number of compiled calls to cache.
pub const DEFAULT_MAX_CALLS: usize = 128;

/// The parts of a declared parameter that affect compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DeclaredKey {
    name: Option<String>,
    direction: ParameterDirection,
    sql_type: SqlType,
    type_name: Option<String>,
}

impl From<&ParameterSpec> for DeclaredKey {
    fn from(param: &ParameterSpec) -> Self {
        Self {
            name: param.name().map(str::to_owned),
            direction: param.direction(),
            sql_type: param.sql_type(),
            type_name: param.type_name().map(str::to_owned),
        }
    }
}

/// Cache key for a compiled call.
///
/// Covers the qualified name (case-insensitively), the call kind, every
/// configuration flag that changes reconciliation, and the declared
/// parameters in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallKey {
    qualified_name: String,
    is_function: bool,
    return_value_required: bool,
    access_call_parameter_metadata: bool,
    function_return_name: String,
    limited_in_parameter_names: Vec<String>,
    declared: Vec<DeclaredKey>,
}

impl CallKey {
    /// Create the key of a call with default options and no declared
    /// parameters. The name is compared case-insensitively.
    pub fn new(qualified_name: &str, is_function: bool) -> Self {
        let defaults = CallConfig::default();
        Self {
            qualified_name: qualified_name.to_lowercase(),
            is_function,
            return_value_required: defaults.return_value_required,
            access_call_parameter_metadata: defaults.access_call_parameter_metadata,
            function_return_name: defaults.function_return_name.to_lowercase(),
            limited_in_parameter_names: Vec::new(),
            declared: Vec::new(),
        }
    }

    /// Create the key for a call configuration without declared parameters.
    #[must_use]
    pub fn from_config(config: &CallConfig) -> Self {
        Self::from_definition(config, &[])
    }

    /// Create the key for a call configuration and its declared parameters.
    #[must_use]
    pub fn from_definition(config: &CallConfig, declared: &[Arc<ParameterSpec>]) -> Self {
        let mut limited: Vec<String> = config
            .limited_in_parameter_names
            .iter()
            .map(|n| n.to_lowercase())
            .collect();
        limited.sort();
        limited.dedup();

        Self {
            qualified_name: config.qualified_name().to_lowercase(),
            is_function: config.is_function,
            return_value_required: config.return_value_required,
            access_call_parameter_metadata: config.access_call_parameter_metadata,
            function_return_name: config.function_return_name.to_lowercase(),
            limited_in_parameter_names: limited,
            declared: declared.iter().map(|p| DeclaredKey::from(p.as_ref())).collect(),
        }
    }

    /// Get the lower-cased qualified name.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Check if the key is for a function.
    #[must_use]
    pub fn is_function(&self) -> bool {
        self.is_function
    }
}

/// LRU cache of compiled calls.
pub struct CallCache {
    cache: LruCache<CallKey, Arc<Call<Compiled>>>,
    max_size: usize,
    hits: u64,
    misses: u64,
}

impl CallCache {
    /// Create a cache holding at most `max_size` calls (at least one).
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            max_size: capacity.get(),
            hits: 0,
            misses: 0,
        }
    }

    /// Create a cache with the default maximum size.
    #[must_use]
    pub fn with_default_size() -> Self {
        Self::new(DEFAULT_MAX_CALLS)
    }

    /// Look up a compiled call. Updates the LRU order.
    pub fn get(&mut self, key: &CallKey) -> Option<Arc<Call<Compiled>>> {
        if let Some(call) = self.cache.get(key) {
            self.hits += 1;
            tracing::trace!(call = key.qualified_name(), "call cache hit");
            Some(Arc::clone(call))
        } else {
            self.misses += 1;
            tracing::trace!(call = key.qualified_name(), "call cache miss");
            None
        }
    }

    /// Peek at a compiled call without updating LRU order or statistics.
    #[must_use]
    pub fn peek(&self, key: &CallKey) -> Option<&Arc<Call<Compiled>>> {
        self.cache.peek(key)
    }

    /// Insert a compiled call.
    ///
    /// Returns the call evicted to make room, if any.
    pub fn insert(&mut self, call: Arc<Call<Compiled>>) -> Option<Arc<Call<Compiled>>> {
        let key = call.cache_key();
        tracing::debug!(call = key.qualified_name(), "caching compiled call");

        let evicted = if self.cache.len() >= self.max_size && !self.cache.contains(&key) {
            self.cache.pop_lru().map(|(_, call)| call)
        } else {
            None
        };

        self.cache.put(key, call);
        evicted
    }

    /// Remove a compiled call.
    pub fn remove(&mut self, key: &CallKey) -> Option<Arc<Call<Compiled>>> {
        self.cache.pop(key)
    }

    /// Drop every cached call, for example after a schema change.
    pub fn clear(&mut self) {
        let count = self.cache.len();
        self.cache.clear();
        tracing::debug!(count, "cleared call cache");
    }

    /// Get the number of cached calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get the maximum cache size.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Get the number of cache hits.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Get the number of cache misses.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Get the cache hit ratio (0.0 to 1.0).
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Reset cache statistics.
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }
}

impl Default for CallCache {
    fn default() -> Self {
        Self::with_default_size()
    }
}

impl std::fmt::Debug for CallCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallCache")
            .field("len", &self.cache.len())
            .field("max_size", &self.max_size)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

/// Configuration for call caching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallCacheConfig {
    /// Whether compiled calls are cached.
    pub enabled: bool,
    /// Maximum number of calls to cache.
    pub max_size: usize,
}

impl Default for CallCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: DEFAULT_MAX_CALLS,
        }
    }
}

impl CallCacheConfig {
    /// Create a configuration with caching disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_size: 0,
        }
    }

    /// Create a configuration with a custom max size.
    #[must_use]
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            enabled: true,
            max_size,
        }
    }
}

/// A [`CallCache`] shared between tasks.
///
/// The lock is never held while compiling, so two tasks missing on the same
/// key at once may both compile; the first to finish wins and both get the
/// cached call.
#[derive(Debug)]
pub struct SharedCallCache {
    inner: Mutex<CallCache>,
    enabled: bool,
}

impl SharedCallCache {
    /// Create a shared cache from a configuration.
    #[must_use]
    pub fn new(config: &CallCacheConfig) -> Self {
        Self {
            inner: Mutex::new(CallCache::new(config.max_size)),
            enabled: config.enabled,
        }
    }

    /// Return the cached compiled call for `call`, compiling it on a miss.
    pub async fn get_or_compile(
        &self,
        call: Call<Declaring>,
        source: &dyn MetadataSource,
    ) -> Result<Arc<Call<Compiled>>> {
        if !self.enabled {
            return Ok(Arc::new(call.compile(source).await?));
        }

        let key = call.cache_key();
        let cached = self.inner.lock().get(&key);
        if let Some(cached) = cached {
            return Ok(cached);
        }

        let compiled = Arc::new(call.compile(source).await?);

        let mut cache = self.inner.lock();
        if let Some(existing) = cache.peek(&key) {
            return Ok(Arc::clone(existing));
        }
        cache.insert(Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Remove a compiled call.
    pub fn invalidate(&self, key: &CallKey) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    /// Drop every cached call.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Get the number of cached calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Get `(hits, misses)`.
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        let cache = self.inner.lock();
        (cache.hits(), cache.misses())
    }
}

impl Default for SharedCallCache {
    fn default() -> Self {
        Self::new(&CallCacheConfig::default())
    }
}
