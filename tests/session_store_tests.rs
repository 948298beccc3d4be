// Integration tests for the file-per-session store
//
// These tests exercise create/list/get/update/delete semantics over real
// files in a temporary directory.

use anyhow::Result;
use med_scribe::{SessionStore, SessionUpdate};
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_create_persists_immediately() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());

    let session = store.create().await?;
    assert_eq!(session.id.len(), 8, "Session id should be a short id");

    let on_disk = temp_dir.path().join(format!("s_{}.json", session.id));
    assert!(on_disk.exists(), "Session file should exist right after create");

    let fetched = store.get(&session.id).await.expect("session should exist");
    assert_eq!(fetched.id, session.id);
    assert!(fetched.scribe_transcript.is_empty());
    assert!(fetched.synthesize_result.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_get_missing_session_returns_none() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());

    assert!(store.get("deadbeef").await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_update_merges_fields_and_bumps_timestamp() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());

    let session = store.create().await?;
    let before = session.updated_at;

    tokio::time::sleep(Duration::from_millis(5)).await;

    let patch = SessionUpdate {
        scribe_transcript: Some("patient reports chest pain".to_string()),
        scribe_context: Some("follow-up visit".to_string()),
        ..Default::default()
    };
    store.update(&session.id, &patch).await?;

    let updated = store.get(&session.id).await.expect("session should exist");
    assert_eq!(updated.scribe_transcript, "patient reports chest pain");
    assert_eq!(updated.scribe_context, "follow-up visit");
    assert!(updated.scribe_note.is_empty(), "Unspecified fields stay put");
    assert!(
        updated.updated_at > before,
        "updated_at should be strictly greater after an update"
    );
    assert_eq!(updated.created_at, session.created_at);

    Ok(())
}

#[tokio::test]
async fn test_update_unknown_id_is_a_silent_noop() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());

    let patch = SessionUpdate {
        scribe_note: Some("orphan".to_string()),
        ..Default::default()
    };
    store.update("deadbeef", &patch).await?;

    assert!(store.get("deadbeef").await.is_none());
    assert!(store.list().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_list_orders_by_updated_at_descending() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());

    let first = store.create().await?;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = store.create().await?;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let third = store.create().await?;

    let sessions = store.list().await?;
    assert_eq!(sessions.len(), 3);
    assert_eq!(sessions[0].id, third.id);
    assert_eq!(sessions[2].id, first.id);

    // Touching the oldest session moves it to the front
    tokio::time::sleep(Duration::from_millis(5)).await;
    let patch = SessionUpdate {
        edit_original: Some("note v1".to_string()),
        ..Default::default()
    };
    store.update(&first.id, &patch).await?;

    let sessions = store.list().await?;
    assert_eq!(sessions[0].id, first.id);
    assert_eq!(sessions[1].id, third.id);
    assert_eq!(sessions[2].id, second.id);

    Ok(())
}

#[tokio::test]
async fn test_list_skips_corrupt_records() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());

    let session = store.create().await?;
    std::fs::write(temp_dir.path().join("s_corrupt1.json"), "{not valid json")?;
    std::fs::write(temp_dir.path().join("unrelated.txt"), "ignored")?;

    let sessions = store.list().await?;
    assert_eq!(sessions.len(), 1, "Only the healthy record should be listed");
    assert_eq!(sessions[0].id, session.id);

    assert!(store.get("corrupt1").await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_delete_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());

    let session = store.create().await?;

    store.delete(&session.id).await?;
    assert!(store.get(&session.id).await.is_none());
    assert!(store.list().await?.is_empty());

    // Second delete of the same id is not an error
    store.delete(&session.id).await?;
    assert!(store.get(&session.id).await.is_none());

    Ok(())
}
