//! Thread-local cache of compiled patterns
//!
//! Wildcard comparisons and grammar checks run the same handful of patterns
//! over and over while a state is virtualized. Compiling a regex is far more
//! expensive than running it, so compiled forms are kept per thread.

use std::{cell::RefCell, num::NonZeroUsize};

use lru::LruCache;
use regex::Regex;

use crate::error::Result;

const DEFAULT_CAPACITY: usize = 1024;

thread_local! {
    static CACHE: RefCell<PatternCache> = RefCell::new(PatternCache::new(DEFAULT_CAPACITY));
}

/// LRU cache from regex source to compiled regex
pub struct PatternCache {
    cache: LruCache<String, Regex>,

    hits: u64,
    misses: u64,
}

impl PatternCache {
    /// Create a new pattern cache with specified size
    pub fn new(size: usize) -> Self {
        let capacity = NonZeroUsize::new(size)
            .or(NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        PatternCache {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the compiled form of `pattern`, compiling it on a miss
    pub fn get_or_compile(&mut self, pattern: &str) -> Result<Regex> {
        if let Some(regex) = self.cache.get(pattern) {
            self.hits += 1;
            return Ok(regex.clone());
        }
        self.misses += 1;
        let regex = Regex::new(pattern)?;
        self.cache.put(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    /// Clear the cache and its counters
    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            hit_rate: if self.hits + self.misses > 0 {
                self.hits as f64 / (self.hits + self.misses) as f64
            } else {
                0.0
            },
            total_items: self.cache.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Cache hit rate (0.0 to 1.0)
    pub hit_rate: f64,
    /// Number of compiled patterns held
    pub total_items: usize,
}

/// Compile `pattern` through the thread-local cache
pub fn compiled(pattern: &str) -> Result<Regex> {
    CACHE.with(|cache| cache.borrow_mut().get_or_compile(pattern))
}

/// Clear thread-local cache
pub fn clear_cache() {
    CACHE.with(|cache| {
        cache.borrow_mut().clear();
    });
}

/// Get cache statistics
pub fn cache_stats() -> CacheStats {
    CACHE.with(|cache| cache.borrow().stats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_pattern_hits_cache() {
        let mut cache = PatternCache::new(4);
        let first = cache.get_or_compile("^a.*b$").unwrap();
        let second = cache.get_or_compile("^a.*b$").unwrap();

        assert!(first.is_match("axxb"));
        assert!(second.is_match("ab"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_items, 1);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let mut cache = PatternCache::new(4);
        assert!(cache.get_or_compile("(unclosed").is_err());
        assert_eq!(cache.stats().total_items, 0);
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        let mut cache = PatternCache::new(0);
        assert!(cache.get_or_compile("x").is_ok());
        assert_eq!(cache.stats().total_items, 1);
    }

    #[test]
    fn test_thread_local_cache() {
        clear_cache();
        assert!(compiled("^x+$").unwrap().is_match("xxx"));
        assert!(compiled("^x+$").unwrap().is_match("x"));

        let stats = cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!(stats.hit_rate > 0.49 && stats.hit_rate < 0.51);

        clear_cache();
        assert_eq!(cache_stats().total_items, 0);
    }

    #[test]
    fn test_eviction_keeps_capacity() {
        let mut cache = PatternCache::new(2);
        cache.get_or_compile("a").unwrap();
        cache.get_or_compile("b").unwrap();
        cache.get_or_compile("c").unwrap();
        assert_eq!(cache.stats().total_items, 2);

        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.total_items, 0);
        assert_eq!(stats.hits + stats.misses, 0);
    }
}
