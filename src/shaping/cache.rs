use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::glyph_id::GlyphId;
use crate::shaping::{GlyphPlanEntry, ShapedGlyphPlan};

/// How the shaping cache bounds its memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Keep every plan for the lifetime of the cache.
    #[default]
    Unbounded,
    /// Keep at most `capacity` strings, dropping the least recently used.
    Lru { capacity: NonZeroUsize },
    /// Keep at most `max_glyphs` glyphs across all plans, dropping the least
    /// recently used strings. A single plan larger than the budget is still
    /// returned, and kept until the next insertion.
    GlyphBudget { max_glyphs: NonZeroUsize },
}

enum Store {
    Unbounded(HashMap<String, Arc<ShapedGlyphPlan>, fxhash::FxBuildHasher>),
    Lru {
        plans: LruCache<String, Arc<ShapedGlyphPlan>, fxhash::FxBuildHasher>,
        glyphs: usize,
        max_glyphs: Option<usize>,
    },
}

impl Store {
    fn new(policy: EvictionPolicy) -> Self {
        let hasher = fxhash::FxBuildHasher::default();
        match policy {
            EvictionPolicy::Unbounded => Store::Unbounded(HashMap::with_hasher(hasher)),
            EvictionPolicy::Lru { capacity } => Store::Lru {
                plans: LruCache::with_hasher(capacity, hasher),
                glyphs: 0,
                max_glyphs: None,
            },
            EvictionPolicy::GlyphBudget { max_glyphs } => Store::Lru {
                plans: LruCache::unbounded_with_hasher(hasher),
                glyphs: 0,
                max_glyphs: Some(max_glyphs.get()),
            },
        }
    }

    fn get(&mut self, text: &str) -> Option<Arc<ShapedGlyphPlan>> {
        match self {
            Store::Unbounded(plans) => plans.get(text).cloned(),
            Store::Lru { plans, .. } => plans.get(text).cloned(),
        }
    }

    fn insert(&mut self, text: &str, plan: Arc<ShapedGlyphPlan>) {
        match self {
            Store::Unbounded(plans) => {
                plans.insert(text.to_owned(), plan);
            }
            Store::Lru {
                plans,
                glyphs,
                max_glyphs,
            } => {
                if let Some(max_glyphs) = *max_glyphs {
                    while *glyphs + plan.len() > max_glyphs {
                        let Some((evicted, old)) = plans.pop_lru() else {
                            break;
                        };
                        *glyphs -= old.len();
                        log::debug!("shaping cache evicted {evicted:?}");
                    }
                }

                *glyphs += plan.len();
                if let Some((evicted, old)) = plans.push(text.to_owned(), plan) {
                    *glyphs -= old.len();
                    log::debug!("shaping cache evicted {evicted:?}");
                }
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Store::Unbounded(plans) => plans.len(),
            Store::Lru { plans, .. } => plans.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            Store::Unbounded(plans) => plans.clear(),
            Store::Lru { plans, glyphs, .. } => {
                plans.clear();
                *glyphs = 0;
            }
        }
    }
}

/// Maps strings to their shaped glyph plans, shaping each string at most once
/// while it stays cached.
///
/// Keys are compared byte for byte: canonically equivalent strings with
/// different encodings get separate entries.
///
/// The lock is held from lookup through shaping to insertion, so two threads
/// missing on the same string never shape it twice and never see a partial plan.
/// Misses on different strings are serialized as a consequence.
pub struct ShapingCache {
    policy: EvictionPolicy,
    store: Mutex<Store>,
}

impl Default for ShapingCache {
    fn default() -> Self {
        Self::new(EvictionPolicy::default())
    }
}

impl ShapingCache {
    /// An empty cache bounded by `policy`.
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            policy,
            store: Mutex::new(Store::new(policy)),
        }
    }

    /// The eviction policy this cache was built with.
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Returns the plan for `text`, calling `shape` only on a miss.
    ///
    /// `shape` must return glyphs in emission order; they are stored as-is.
    pub fn plan(
        &self,
        text: &str,
        shape: impl FnOnce(&str) -> Vec<GlyphPlanEntry>,
    ) -> Arc<ShapedGlyphPlan> {
        let mut store = self.store.lock();
        if let Some(plan) = store.get(text) {
            return plan;
        }

        log::debug!("shaping cache miss for {text:?}");
        let plan = Arc::new(ShapedGlyphPlan::new(shape(text)));
        store.insert(text, Arc::clone(&plan));
        plan
    }

    /// The glyph ids of the plan for `text`.
    pub fn glyph_ids(
        &self,
        text: &str,
        shape: impl FnOnce(&str) -> Vec<GlyphPlanEntry>,
    ) -> Vec<GlyphId> {
        self.plan(text, shape).glyph_ids().collect()
    }

    /// Whether `text` currently has a cached plan. Does not touch LRU order.
    pub fn contains(&self, text: &str) -> bool {
        match &*self.store.lock() {
            Store::Unbounded(plans) => plans.contains_key(text),
            Store::Lru { plans, .. } => plans.contains(text),
        }
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Whether no plan is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached plan. Plans already handed out stay valid.
    pub fn clear(&self) {
        self.store.lock().clear();
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use euclid::default::Vector2D;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// One glyph per char, glyph id = code point truncated, advance = 10.
    fn fake_shape(text: &str) -> Vec<GlyphPlanEntry> {
        text.chars()
            .map(|c| GlyphPlanEntry::new(GlyphId(c as u16), 10.0, Vector2D::new(1.0, -1.0)))
            .collect()
    }

    #[test]
    fn test_hit_returns_same_plan() {
        let cache = ShapingCache::default();
        let calls = AtomicUsize::new(0);
        let shape = |text: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            fake_shape(text)
        };

        let first = cache.plan("abc", shape);
        let second = cache.plan("abc", shape);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_emission_order_preserved() {
        let cache = ShapingCache::default();
        let ids = cache.glyph_ids("cab", fake_shape);
        assert_eq!(ids, vec![GlyphId(b'c' as u16), GlyphId(b'a' as u16), GlyphId(b'b' as u16)]);
    }

    #[test]
    fn test_keys_are_not_normalized() {
        let cache = ShapingCache::default();
        let composed = "\u{e9}";
        let decomposed = "e\u{301}";

        let a = cache.plan(composed, fake_shape);
        let b = cache.plan(decomposed, fake_shape);

        assert_eq!(cache.len(), 2);
        assert_ne!(a.len(), b.len());
    }

    #[test]
    fn test_empty_string_is_cached() {
        let cache = ShapingCache::default();
        let plan = cache.plan("", fake_shape);
        assert!(plan.is_empty());
        assert!(cache.contains(""));
    }

    #[test]
    fn test_lru_capacity() {
        let cache = ShapingCache::new(EvictionPolicy::Lru {
            capacity: NonZeroUsize::new(2).unwrap(),
        });

        cache.plan("a", fake_shape);
        cache.plan("b", fake_shape);
        // Touch "a" so "b" becomes the oldest.
        cache.plan("a", |_| unreachable!("cached"));
        cache.plan("c", fake_shape);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_glyph_budget() {
        let cache = ShapingCache::new(EvictionPolicy::GlyphBudget {
            max_glyphs: NonZeroUsize::new(5).unwrap(),
        });

        cache.plan("abc", fake_shape);
        cache.plan("de", fake_shape);
        assert_eq!(cache.len(), 2);

        // 3 + 2 + 1 > 5, so "abc" goes.
        cache.plan("f", fake_shape);
        assert!(!cache.contains("abc"));
        assert!(cache.contains("de"));
        assert!(cache.contains("f"));

        // Larger than the whole budget: everything else goes, the plan is still returned.
        let big = cache.plan("ghijklm", fake_shape);
        assert_eq!(big.len(), 7);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_keeps_handed_out_plans() {
        let cache = ShapingCache::default();
        let plan = cache.plan("xy", fake_shape);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_concurrent_misses_shape_once() {
        let cache = Arc::new(ShapingCache::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    cache.plan("👨\u{200D}👩", |text| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(5));
                        fake_shape(text)
                    })
                })
            })
            .collect::<Vec<_>>();

        let plans = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(plans.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }
}
