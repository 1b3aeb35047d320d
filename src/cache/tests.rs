//! Cache Module Tests
//!
//! ## Test Scopes
//! - **Get-and-replace**: absent keys stay absent, present keys swap values.
//! - **Conditional mutations**: replace/remove with an expected old value.
//! - **Expiry**: creation, update and zero TTLs, driven by a manual clock.
//! - **Completion events**: published only when a completion id is supplied.

#[cfg(test)]
mod tests {
    use crate::cache::expiry::ExpiryPolicy;
    use crate::cache::record_store::{CacheRecordStore, Clock};
    use crate::events::{BroadcastSink, CompletionOutcome, LoggingSink};
    use crate::serialization::Data;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    fn manual_clock(start: u64) -> (Arc<AtomicU64>, Clock) {
        let now = Arc::new(AtomicU64::new(start));
        let handle = now.clone();
        let clock: Clock = Arc::new(move || handle.load(Ordering::SeqCst));
        (now, clock)
    }

    fn store() -> CacheRecordStore {
        let (_, clock) = manual_clock(1_000);
        CacheRecordStore::new("books", 0, Arc::new(LoggingSink), clock)
    }

    fn d(s: &str) -> Data {
        Data::from(s)
    }

    // ============================================================
    // GET AND REPLACE
    // ============================================================

    #[test]
    fn test_get_and_replace_on_missing_key_does_nothing() {
        let mut store = store();

        let previous = store.get_and_replace(d("k"), d("v"), None, None);

        assert_eq!(previous, None);
        assert!(!store.contains_key(&d("k")));
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_get_and_replace_swaps_value() {
        let mut store = store();
        store.put(d("k"), d("v1"), None, false, None);

        let previous = store.get_and_replace(d("k"), d("v2"), None, None);

        assert_eq!(previous, Some(d("v1")));
        assert_eq!(store.get(&d("k"), None), Some(d("v2")));
    }

    #[test]
    fn test_get_and_replace_reapplies_update_expiry() {
        let (now, clock) = manual_clock(1_000);
        let mut store = CacheRecordStore::new("books", 0, Arc::new(LoggingSink), clock);

        store.put(
            d("k"),
            d("v1"),
            Some(ExpiryPolicy::created(Duration::from_millis(100))),
            false,
            None,
        );
        assert_eq!(store.record(&d("k")).unwrap().expires_at, Some(1_100));

        now.store(1_050, Ordering::SeqCst);
        store.get_and_replace(
            d("k"),
            d("v2"),
            Some(ExpiryPolicy::modified(Duration::from_millis(500))),
            None,
        );
        assert_eq!(store.record(&d("k")).unwrap().expires_at, Some(1_550));

        now.store(1_200, Ordering::SeqCst);
        assert_eq!(store.get(&d("k"), None), Some(d("v2")));

        now.store(1_550, Ordering::SeqCst);
        assert_eq!(store.get(&d("k"), None), None);
    }

    #[test]
    fn test_get_and_replace_treats_expired_entry_as_missing() {
        let (now, clock) = manual_clock(1_000);
        let mut store = CacheRecordStore::new("books", 0, Arc::new(LoggingSink), clock);
        store.put(
            d("k"),
            d("v1"),
            Some(ExpiryPolicy::created(Duration::from_millis(10))),
            false,
            None,
        );

        now.store(2_000, Ordering::SeqCst);
        assert_eq!(store.get_and_replace(d("k"), d("v2"), None, None), None);
        assert!(!store.contains_key(&d("k")));
    }

    // ============================================================
    // OTHER MUTATIONS
    // ============================================================

    #[test]
    fn test_put_returns_previous_only_when_asked() {
        let mut store = store();
        assert_eq!(store.put(d("k"), d("a"), None, true, None), None);
        assert_eq!(store.put(d("k"), d("b"), None, false, None), None);
        assert_eq!(store.put(d("k"), d("c"), None, true, None), Some(d("b")));
    }

    #[test]
    fn test_put_if_absent() {
        let mut store = store();
        assert!(store.put_if_absent(d("k"), d("a"), None, None));
        assert!(!store.put_if_absent(d("k"), d("b"), None, None));
        assert_eq!(store.get(&d("k"), None), Some(d("a")));
    }

    #[test]
    fn test_conditional_replace() {
        let mut store = store();
        assert!(!store.replace(d("k"), None, d("x"), None, None));

        store.put(d("k"), d("a"), None, false, None);
        assert!(!store.replace(d("k"), Some(&d("wrong")), d("b"), None, None));
        assert_eq!(store.get(&d("k"), None), Some(d("a")));

        assert!(store.replace(d("k"), Some(&d("a")), d("b"), None, None));
        assert_eq!(store.get(&d("k"), None), Some(d("b")));

        assert!(store.replace(d("k"), None, d("c"), None, None));
        assert_eq!(store.get(&d("k"), None), Some(d("c")));
    }

    #[test]
    fn test_conditional_remove_and_get_and_remove() {
        let mut store = store();
        store.put(d("k"), d("a"), None, false, None);

        assert!(!store.remove(&d("k"), Some(&d("b")), None));
        assert!(store.remove(&d("k"), Some(&d("a")), None));
        assert!(!store.remove(&d("k"), None, None));

        store.put(d("k"), d("z"), None, false, None);
        assert_eq!(store.get_and_remove(&d("k"), None), Some(d("z")));
        assert_eq!(store.get_and_remove(&d("k"), None), None);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut store = store();
        store.put(
            d("k"),
            d("v"),
            Some(ExpiryPolicy::created(Duration::ZERO)),
            false,
            None,
        );
        assert_eq!(store.get(&d("k"), None), None);
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_live_count_skips_expired_without_evicting() {
        let (now, clock) = manual_clock(1_000);
        let mut store = CacheRecordStore::new("books", 0, Arc::new(LoggingSink), clock);
        store.put(
            d("short"),
            d("v"),
            Some(ExpiryPolicy::created(Duration::from_millis(10))),
            false,
            None,
        );
        store.put(d("long"), d("v"), None, false, None);

        now.store(2_000, Ordering::SeqCst);

        assert_eq!(store.live_count(), 1);
        assert!(store.record(&d("short")).is_some());
        assert_eq!(store.size(), 1);
        assert!(store.record(&d("short")).is_none());
    }

    #[test]
    fn test_touched_policy_extends_on_access() {
        let (now, clock) = manual_clock(0);
        let mut store = CacheRecordStore::new("books", 0, Arc::new(LoggingSink), clock);
        let policy = ExpiryPolicy::touched(Duration::from_millis(100));
        store.put(d("k"), d("v"), Some(policy), false, None);

        now.store(90, Ordering::SeqCst);
        assert_eq!(store.get(&d("k"), Some(policy)), Some(d("v")));

        now.store(180, Ordering::SeqCst);
        assert_eq!(store.get(&d("k"), Some(policy)), Some(d("v")));
        assert_eq!(store.record(&d("k")).unwrap().hits, 2);
    }

    // ============================================================
    // COMPLETION EVENTS
    // ============================================================

    #[test]
    fn test_completion_events_follow_outcome() {
        let sink = Arc::new(BroadcastSink::new(16));
        let mut events = sink.subscribe();
        let (_, clock) = manual_clock(0);
        let mut store = CacheRecordStore::new("books", 3, sink.clone(), clock);

        store.get_and_replace(d("k"), d("v"), None, Some(7));
        store.put(d("k"), d("v1"), None, false, None);
        store.get_and_replace(d("k"), d("v2"), None, Some(8));

        let first = events.try_recv().unwrap();
        assert_eq!(first.completion_id, 7);
        assert_eq!(first.outcome, CompletionOutcome::Unchanged);
        assert_eq!(first.cache_name, "books");

        let second = events.try_recv().unwrap();
        assert_eq!(second.completion_id, 8);
        assert_eq!(second.outcome, CompletionOutcome::Updated);
        assert_eq!(second.key, d("k"));

        assert!(events.try_recv().is_err());
    }
}
