//! Tests for StateManager

use super::*;
use tempfile::tempdir;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/tap-criteo-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(
        manager.path().to_str().unwrap(),
        "/tmp/tap-criteo-state.json"
    );
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[tokio::test]
async fn test_from_json() {
    let manager = StateManager::from_json(
        r#"{"bookmarks": {"CampaignPerformance_111": {"date": "2024-03-10T00:00:00.000000Z"}}}"#,
    )
    .unwrap();

    let key = BookmarkKey::partitioned("CampaignPerformance", Some("111"));
    assert_eq!(
        manager.get_bookmark(&key, DATE_BOOKMARK).await,
        Some("2024-03-10T00:00:00.000000Z".to_string())
    );
}

#[test]
fn test_from_json_empty_and_invalid() {
    assert!(StateManager::from_json("").is_ok());
    assert!(StateManager::from_json("{}").is_ok());
    assert!(StateManager::from_json("not json").is_err());
}

// ============================================================================
// Bookmark Tests
// ============================================================================

#[tokio::test]
async fn test_get_set_bookmark() {
    let manager = StateManager::in_memory();
    let key = BookmarkKey::new("FacebookDPA");

    assert!(manager.get_bookmark(&key, DATE_BOOKMARK).await.is_none());

    manager
        .set_bookmark(&key, DATE_BOOKMARK, "2024-01-01T00:00:00.000000Z")
        .await
        .unwrap();
    manager
        .set_bookmark(&key, DATE_BOOKMARK, "2024-01-02T00:00:00.000000Z")
        .await
        .unwrap();

    assert_eq!(
        manager.get_bookmark(&key, DATE_BOOKMARK).await,
        Some("2024-01-02T00:00:00.000000Z".to_string())
    );
}

#[tokio::test]
async fn test_partitions_are_isolated() {
    let manager = StateManager::in_memory();
    let a = BookmarkKey::partitioned("CampaignPerformance", Some("A"));
    let b = BookmarkKey::partitioned("CampaignPerformance", Some("B"));

    manager
        .set_bookmark(&a, ATTRIBUTION_WINDOW_BOOKMARK, "2024-01-05T00:00:00.000000Z")
        .await
        .unwrap();
    manager
        .set_bookmark(&b, ATTRIBUTION_WINDOW_BOOKMARK, "2024-02-05T00:00:00.000000Z")
        .await
        .unwrap();

    manager
        .clear_bookmark(&a, ATTRIBUTION_WINDOW_BOOKMARK)
        .await
        .unwrap();

    assert!(manager
        .get_bookmark(&a, ATTRIBUTION_WINDOW_BOOKMARK)
        .await
        .is_none());
    assert_eq!(
        manager.get_bookmark(&b, ATTRIBUTION_WINDOW_BOOKMARK).await,
        Some("2024-02-05T00:00:00.000000Z".to_string())
    );
}

#[tokio::test]
async fn test_clear_missing_bookmark_is_noop() {
    let manager = StateManager::in_memory();
    let key = BookmarkKey::new("TransactionID");

    manager
        .clear_bookmark(&key, ATTRIBUTION_WINDOW_BOOKMARK)
        .await
        .unwrap();

    assert!(manager.snapshot().await.bookmarks.is_empty());
}

#[tokio::test]
async fn test_clone_shares_state() {
    let manager = StateManager::in_memory();
    let clone = manager.clone();
    let key = BookmarkKey::new("FacebookDPA");

    clone
        .set_bookmark(&key, DATE_BOOKMARK, "2024-05-01T00:00:00.000000Z")
        .await
        .unwrap();

    assert!(manager.get_bookmark(&key, DATE_BOOKMARK).await.is_some());
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_set_bookmark_persists_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let key = BookmarkKey::partitioned("CampaignPerformance", Some("111"));

    {
        let manager = StateManager::from_file(&path).unwrap();
        manager
            .set_bookmark(&key, DATE_BOOKMARK, "2024-01-03T00:00:00.000000Z")
            .await
            .unwrap();
    }

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(
        reloaded.get_bookmark(&key, DATE_BOOKMARK).await,
        Some("2024-01-03T00:00:00.000000Z".to_string())
    );
}

#[tokio::test]
async fn test_from_file_missing_is_empty() {
    let dir = tempdir().unwrap();
    let manager = StateManager::from_file(dir.path().join("nope.json")).unwrap();
    assert!(manager.snapshot().await.bookmarks.is_empty());
}

#[tokio::test]
async fn test_in_memory_save_is_noop() {
    let manager = StateManager::in_memory();
    manager.save().await.unwrap();
}

#[tokio::test]
async fn test_to_json() {
    let manager = StateManager::in_memory();
    manager
        .set_bookmark(&BookmarkKey::new("X"), DATE_BOOKMARK, "d")
        .await
        .unwrap();
    let json = manager.to_json().await.unwrap();
    assert_eq!(json, r#"{"bookmarks":{"X":{"date":"d"}}}"#);
}
