//! Persistence tests for JsonFileStore

use std::fs;

use googl_core::knowledge::{self, JsonFileStore, KnowledgeBase, KnowledgeEntry, KnowledgeStore};
use googl_core::StoreError;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Helper to create a knowledge base with a few entries
fn create_test_base() -> KnowledgeBase {
    KnowledgeBase::with_entries(vec![
        KnowledgeEntry::new("What is your name?", "GooglBot"),
        KnowledgeEntry::new("How old are you?", "Brand new"),
        KnowledgeEntry::new("Où est la gare ?", "À gauche"),
    ])
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("knowledge_base.json"));

    let kb = store.load().unwrap();
    assert!(kb.is_empty());
    assert!(!store.path().exists());
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("kb.json"));

    let kb = create_test_base();
    store.save(&kb).unwrap();

    assert_eq!(store.load().unwrap(), kb);
}

#[test]
fn test_round_trip_preserves_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kb.json");
    fs::write(
        &path,
        r#"{"questions": [
            {"question": "b", "answer": "2"},
            {"question": "a", "answer": "1"},
            {"question": "b", "answer": "dup"}
        ]}"#,
    )
    .unwrap();

    let kb = knowledge::load(&path).unwrap();
    knowledge::save(&path, &kb).unwrap();

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        written,
        serde_json::json!({"questions": [
            {"question": "b", "answer": "2"},
            {"question": "a", "answer": "1"},
            {"question": "b", "answer": "dup"}
        ]})
    );
}

#[test]
fn test_round_trip_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kb.json");
    let original = r#"{
  "version": 2,
  "questions": [
    {
      "answer": "GooglBot",
      "question": "What is your name?",
      "added": "2024-01-01"
    },
    {
      "question": "How old are you?",
      "tags": [
        "age",
        "small talk"
      ],
      "answer": "Brand new"
    }
  ],
  "owner": {
    "name": "ops"
  }
}"#;
    fs::write(&path, original).unwrap();

    let kb = knowledge::load(&path).unwrap();
    assert_eq!(kb.answer_for("What is your name?"), Some("GooglBot"));
    knowledge::save(&path, &kb).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_learning_keeps_unknown_fields() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("kb.json"));
    fs::write(
        store.path(),
        r#"{"questions": [{"answer": "a", "question": "q", "added": "2024-01-01"}], "version": 2}"#,
    )
    .unwrap();

    let mut kb = store.load().unwrap();
    kb.push("Favourite colour?", "Blue");
    store.save(&kb).unwrap();

    let text = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        text,
        "{\n  \"questions\": [\n    {\n      \"answer\": \"a\",\n      \"question\": \"q\",\n      \"added\": \"2024-01-01\"\n    },\n    {\n      \"question\": \"Favourite colour?\",\n      \"answer\": \"Blue\"\n    }\n  ],\n  \"version\": 2\n}"
    );
}

#[test]
fn test_saved_file_is_indented_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kb.json");
    knowledge::save(&path, &KnowledgeBase::with_entries(vec![KnowledgeEntry::new("q", "a")]))
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "{\n  \"questions\": [\n    {\n      \"question\": \"q\",\n      \"answer\": \"a\"\n    }\n  ]\n}"
    );
}

#[test]
fn test_append_and_save_adds_one_entry() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("kb.json"));
    store.save(&create_test_base()).unwrap();

    let mut kb = store.load().unwrap();
    kb.push("Favourite colour?", "Blue");
    store.save(&kb).unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.len(), 4);
    assert_eq!(reloaded, kb);
    assert_eq!(reloaded.answer_for("Favourite colour?"), Some("Blue"));
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kb.json");
    fs::write(&path, "{ not json").unwrap();

    let err = knowledge::load(&path).unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
    assert!(err.to_string().contains("kb.json"));
}

#[test]
fn test_wrong_shape_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kb.json");
    fs::write(&path, r#"{"questions": [{"question": "q"}]}"#).unwrap();

    assert!(matches!(
        knowledge::load(&path),
        Err(StoreError::Parse { .. })
    ));
}

#[test]
fn test_unreadable_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    // A directory exists but cannot be read as a file
    let err = knowledge::load(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Read { .. } | StoreError::Parse { .. }
    ));
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("kb.json");

    let err = knowledge::save(&path, &create_test_base()).unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }));
}
