use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::Result;

use super::SpellSuggester;

/// Thread-safe LRU cache of suggestion lists, keyed by the exact query word.
#[derive(Clone)]
pub struct SuggestionCache {
    cache: Arc<Mutex<LruCache<String, Vec<String>>>>,
}

impl SuggestionCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Vec<String>>> {
        // Poisoned locks still hold a consistent cache
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, word: &str) -> Option<Vec<String>> {
        self.lock().get(word).cloned()
    }

    pub fn put(&self, word: String, suggestions: Vec<String>) {
        self.lock().put(word, suggestions);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wraps a suggester with a [`SuggestionCache`]. Errors are never cached.
pub struct CachedSuggester {
    inner: Arc<dyn SpellSuggester>,
    cache: SuggestionCache,
}

impl CachedSuggester {
    pub fn new(inner: Arc<dyn SpellSuggester>, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: SuggestionCache::new(capacity),
        }
    }
}

#[async_trait]
impl SpellSuggester for CachedSuggester {
    async fn suggest(&self, word: &str) -> Result<Vec<String>> {
        if let Some(hit) = self.cache.get(word) {
            return Ok(hit);
        }

        let suggestions = self.inner.suggest(word).await?;
        self.cache.put(word.to_string(), suggestions.clone());
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarfError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSuggester {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SpellSuggester for CountingSuggester {
        async fn suggest(&self, word: &str) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(HarfError::Morphology("nope".into()));
            }
            Ok(vec![format!("{word}!")])
        }
    }

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_cache_hit_after_put() {
        let cache = SuggestionCache::new(capacity(4));
        cache.put("kitab".into(), vec!["kitap".into()]);
        assert_eq!(cache.get("kitab"), Some(vec!["kitap".to_string()]));
        assert_eq!(cache.get("okl"), None);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = SuggestionCache::new(capacity(2));
        cache.put("a".into(), vec![]);
        cache.put("b".into(), vec![]);
        cache.get("a");
        cache.put("c".into(), vec![]);

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_cached_suggester_calls_inner_once() {
        let inner = Arc::new(CountingSuggester {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let cached = CachedSuggester::new(inner.clone(), capacity(8));

        assert_eq!(cached.suggest("okl").await.unwrap(), vec!["okl!"]);
        assert_eq!(cached.suggest("okl").await.unwrap(), vec!["okl!"]);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let inner = Arc::new(CountingSuggester {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let cached = CachedSuggester::new(inner.clone(), capacity(8));

        assert!(cached.suggest("okl").await.is_err());
        assert!(cached.suggest("okl").await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
