use dramlog::api::DiaryApi;
use dramlog::store::memory::InMemoryStore;
use dramlog::test_utils::{jpeg_bytes, png_bytes, test_cache, TestEnv};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn write_image(dir: &TempDir, name: &str, bytes: &[u8]) -> String {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_fetch_decodes_and_caches_local_file() {
    let dir = TempDir::new().unwrap();
    let source = write_image(&dir, "dram.jpg", &jpeg_bytes());
    let cache = test_cache();

    let image = cache.fetch(&source).await.unwrap();
    assert_eq!((image.width(), image.height()), (4, 4));
    assert!(cache.contains(&source));

    // Served from cache once the file is gone.
    fs::remove_file(&source).unwrap();
    let again = cache.fetch(&source).await.unwrap();
    assert!(Arc::ptr_eq(&image, &again));
}

#[tokio::test]
async fn test_fetch_accepts_file_urls() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "label.png", &png_bytes());
    let url = format!("file://{}", path);

    let cache = test_cache();
    assert!(cache.fetch(&url).await.is_some());
}

#[tokio::test]
async fn test_fetch_missing_file_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("nope.jpg").to_string_lossy().into_owned();
    let cache = test_cache();

    assert!(cache.fetch(&source).await.is_none());
    assert!(!cache.contains(&source));
}

#[tokio::test]
async fn test_fetch_undecodable_file_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let source = write_image(&dir, "broken.jpg", b"definitely not a jpeg");
    let cache = test_cache();

    assert!(cache.fetch(&source).await.is_none());
    assert!(cache.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_fetches_share_result() {
    let dir = TempDir::new().unwrap();
    let source = write_image(&dir, "shared.jpg", &jpeg_bytes());
    let cache = test_cache();

    let (first, second) = tokio::join!(cache.fetch(&source), cache.fetch(&source));
    let (first, second) = (first.unwrap(), second.unwrap());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_api_fetch_goes_through_shared_cache() {
    let dir = TempDir::new().unwrap();
    let source = write_image(&dir, "bottle.jpg", &jpeg_bytes());
    let api = DiaryApi::new(InMemoryStore::new(), test_cache());

    assert!(api.fetch_image(&source).await.is_some());
    assert!(api.images().contains(&source));
}

#[tokio::test]
async fn test_api_fetch_can_be_spawned_with_sqlite_store() {
    let dir = TempDir::new().unwrap();
    let source = write_image(&dir, "cask.png", &png_bytes());
    let env = TestEnv::new();
    let api = DiaryApi::new(env.store, test_cache());

    let handle = tokio::spawn(api.fetch_image(&source));
    let image = handle.await.unwrap().unwrap();
    assert_eq!((image.width(), image.height()), (4, 4));
    assert!(api.images().contains(&source));
}
