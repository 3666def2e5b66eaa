//! Integration Tests for the dual-backend coordinator
//!
//! Exercises the cache through its public API with both stores wired to an
//! in-process remote backend.

use std::sync::Arc;
use std::time::Duration;

use dual_cache::cache::{LocalStore, MemoryBackend, RemoteBackend, RemoteStore};
use dual_cache::{CacheError, DualCache};

fn shared_backend_cache(namespace: &str) -> (DualCache, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let cache = DualCache::new(
        Arc::new(LocalStore::new()),
        Arc::new(RemoteStore::new(backend.clone(), namespace)),
    );
    (cache, backend)
}

#[tokio::test]
async fn test_capacity_two_evicts_oldest() {
    let cache = DualCache::in_memory("e2e");

    cache.set("a", "1", 2, -1).await.unwrap();
    cache.set("b", "2", 2, -1).await.unwrap();
    cache.set("c", "3", 2, -1).await.unwrap();

    assert_eq!(cache.print_local().await, "c:3, b:2");
    assert_eq!(cache.print_remote().await.unwrap(), "c:3, b:2");
    assert_eq!(cache.get("a").await.unwrap(), None);
    assert_eq!(cache.get("c").await.unwrap(), Some("3".to_string()));
}

#[tokio::test]
async fn test_read_protects_key_from_eviction() {
    let cache = DualCache::in_memory("e2e");

    cache.set("a", "1", 2, -1).await.unwrap();
    cache.set("b", "2", 2, -1).await.unwrap();
    assert_eq!(cache.get("a").await.unwrap(), Some("1".to_string()));

    cache.set("c", "3", 2, -1).await.unwrap();

    assert_eq!(cache.get("b").await.unwrap(), None);
    assert_eq!(cache.get("a").await.unwrap(), Some("1".to_string()));
    assert_eq!(cache.get("c").await.unwrap(), Some("3".to_string()));
}

#[tokio::test]
async fn test_expiration_in_both_stores() {
    let cache = DualCache::in_memory("e2e");

    cache.set("t", "v", 10, 1).await.unwrap();
    assert_eq!(cache.get("t").await.unwrap(), Some("v".to_string()));

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(cache.local().get("t").await, None);
    assert_eq!(cache.remote().get("t").await.unwrap(), None);
    assert_eq!(cache.get("t").await.unwrap(), None);
}

#[tokio::test]
async fn test_no_expiration_default() {
    let cache = DualCache::in_memory("e2e");

    cache.set("forever", "v", 10, -1).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(cache.get("forever").await.unwrap(), Some("v".to_string()));
}

#[tokio::test]
async fn test_remote_only_removal_reads_as_miss() {
    let (cache, backend) = shared_backend_cache("e2e");

    cache.set("k", "v", 10, -1).await.unwrap();
    backend.delete("e2e:v:k").await.unwrap();

    assert_eq!(cache.get("k").await.unwrap(), None);
    // The local copy is still there; only the combined read refuses it
    assert_eq!(cache.print_local().await, "k:v");
}

#[tokio::test]
async fn test_oversized_ttl_leaves_both_stores_untouched() {
    let cache = DualCache::in_memory("e2e");

    cache.set("a", "1", 2, -1).await.unwrap();
    cache.set("b", "2", 2, -1).await.unwrap();

    let result = cache.set("c", "3", 2, i64::MAX).await;

    assert!(matches!(result, Err(CacheError::InvalidTtl(i64::MAX))));
    assert_eq!(cache.print_local().await, "b:2, a:1");
    assert_eq!(cache.print_remote().await.unwrap(), "b:2, a:1");
}

#[tokio::test]
async fn test_key_named_like_order_list() {
    let cache = DualCache::in_memory("e2e");

    cache.set("a", "1", 3, -1).await.unwrap();
    cache.set("__order", "x", 3, -1).await.unwrap();
    cache.del("__order").await.unwrap();
    cache.set("b", "2", 3, -1).await.unwrap();

    assert_eq!(cache.get("a").await.unwrap(), Some("1".to_string()));
    assert_eq!(cache.print_remote().await.unwrap(), "a:1, b:2");
    assert_eq!(cache.print_local().await, "a:1, b:2");
}

#[tokio::test]
async fn test_del_absent_key_is_noop() {
    let cache = DualCache::in_memory("e2e");

    cache.del("ghost").await.unwrap();
    cache.set("a", "1", 10, -1).await.unwrap();
    cache.del("ghost").await.unwrap();

    assert_eq!(cache.get("a").await.unwrap(), Some("1".to_string()));
}

#[tokio::test]
async fn test_del_all_clears_both_stores() {
    let (cache, backend) = shared_backend_cache("e2e");
    backend.set("other-tenant", "keep", None).await.unwrap();

    for (key, value) in [("a", "1"), ("b", "2"), ("c", "3")] {
        cache.set(key, value, 10, -1).await.unwrap();
    }
    cache.del_all().await.unwrap();

    for key in ["a", "b", "c"] {
        assert_eq!(cache.local().get(key).await, None);
        assert_eq!(cache.remote().get(key).await.unwrap(), None);
    }
    assert_eq!(
        backend.get("other-tenant").await.unwrap(),
        Some("keep".to_string())
    );
}

#[tokio::test]
async fn test_remote_failure_propagates_without_rollback() {
    let (cache, backend) = shared_backend_cache("e2e");
    backend.set_failing(true);

    let result = cache.set("k", "v", 10, -1).await;

    assert!(matches!(result, Err(CacheError::Remote(_))));
    assert_eq!(cache.print_local().await, "k:v");

    backend.set_failing(false);
    // Backends disagree now, so the read is a miss rather than an error
    assert_eq!(cache.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn test_concurrent_writers_keep_capacity() {
    let cache = DualCache::in_memory("e2e");

    let writers: Vec<_> = (0..16)
        .map(|i| {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .set(&format!("key{}", i), &i.to_string(), 4, -1)
                    .await
            })
        })
        .collect();

    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    assert!(cache.local().len().await <= 4);
    assert!(cache.remote().len().await.unwrap() <= 4);
}
