//! Scripted console sessions

use std::fs;
use std::io::Cursor;

use googl_bot::{Error, Session, GREETING, LEARNED, PROMPT, SKIPPED, TEACH_PROMPT, UNKNOWN};
use googl_core::knowledge::{JsonFileStore, KnowledgeBase, KnowledgeEntry, KnowledgeStore};
use googl_core::{FuzzyEngine, MemoryStore, StoreError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Helper to create a store holding the two stock questions
fn seeded_store() -> MemoryStore {
    MemoryStore::with_base(KnowledgeBase::with_entries(vec![
        KnowledgeEntry::new("What is your name?", "GooglBot"),
        KnowledgeEntry::new("How old are you?", "Brand new"),
    ]))
}

/// Run a whole conversation and return what the bot printed
fn converse<S: KnowledgeStore>(session: &mut Session<S>, script: &str) -> String {
    let mut output = Vec::new();
    session
        .run(Cursor::new(script.as_bytes()), &mut output)
        .unwrap();
    String::from_utf8(output).unwrap()
}

/// Build the expected transcript from the bot's side of each turn
fn transcript(turns: &[&str]) -> String {
    let mut expected = format!("{}\n", GREETING);
    for turn in turns {
        expected.push_str(turn);
    }
    expected
}

fn said(line: &str) -> String {
    format!("{}{}\n", PROMPT, line)
}

#[test]
fn test_math_then_quit() {
    let mut session = Session::open(seeded_store(), FuzzyEngine::new()).unwrap();
    let output = converse(&mut session, "2^3\n1/4\nquit\n");

    assert_eq!(
        output,
        transcript(&[&said("GooglBot: 8"), &said("GooglBot: 0.25"), PROMPT])
    );
    assert_eq!(session.store().saves(), 0);
}

#[test]
fn test_variables_persist_across_lines() {
    let mut session = Session::open(MemoryStore::new(), FuzzyEngine::new()).unwrap();
    let output = converse(&mut session, "x = 5\nx + 1\nquit\n");

    assert_eq!(
        output,
        transcript(&[&said("GooglBot: 5"), &said("GooglBot: 6"), PROMPT])
    );
    assert_eq!(session.evaluator().variables().get("x"), Some(5.0));
}

#[test]
fn test_answers_close_question() {
    let mut session = Session::open(seeded_store(), FuzzyEngine::new()).unwrap();
    let output = converse(&mut session, "what is ur name\n  how old r u  \nquit\n");

    assert_eq!(
        output,
        transcript(&[&said("GooglBot: GooglBot"), &said("GooglBot: Brand new"), PROMPT])
    );
}

#[test]
fn test_teach_new_answer() {
    let mut session = Session::open(seeded_store(), FuzzyEngine::new()).unwrap();
    let output = converse(
        &mut session,
        "Capital of France?\n  Paris  \nCapital of France?\nquit\n",
    );

    let teach = format!("{}{}\n{}{}\n", PROMPT, UNKNOWN, TEACH_PROMPT, LEARNED);
    assert_eq!(
        output,
        transcript(&[&teach, &said("GooglBot: Paris"), PROMPT])
    );

    let kb = session.knowledge();
    assert_eq!(kb.len(), 3);
    assert_eq!(kb.entries()[2], KnowledgeEntry::new("Capital of France?", "Paris"));
    assert_eq!(session.store().saves(), 1);
    assert_eq!(session.store().stored(), kb);
}

#[test]
fn test_skip_is_case_insensitive() {
    let mut session = Session::open(seeded_store(), FuzzyEngine::new()).unwrap();
    let output = converse(&mut session, "completely unrelated gibberish\nSKIP\nquit\n");

    let teach = format!("{}{}\n{}{}\n", PROMPT, UNKNOWN, TEACH_PROMPT, SKIPPED);
    assert_eq!(output, transcript(&[&teach, PROMPT]));
    assert_eq!(session.knowledge().len(), 2);
    assert_eq!(session.store().saves(), 0);
}

#[test]
fn test_unsafe_input_falls_through_to_teaching() {
    let mut session = Session::open(MemoryStore::new(), FuzzyEngine::new()).unwrap();
    let output = converse(&mut session, "__import__('os').system('ls')\nskip\nquit\n");

    assert!(output.contains(UNKNOWN));
    assert!(output.contains(SKIPPED));
}

#[test]
fn test_quit_is_case_insensitive_and_trimmed() {
    for script in ["QUIT\n2^3\n", "  Quit \n2^3\n", "quit"] {
        let mut session = Session::open(MemoryStore::new(), FuzzyEngine::new()).unwrap();
        let output = converse(&mut session, script);
        assert_eq!(output, transcript(&[PROMPT]), "{:?}", script);
    }
}

#[test]
fn test_end_of_input_ends_session() {
    let mut session = Session::open(MemoryStore::new(), FuzzyEngine::new()).unwrap();
    assert_eq!(converse(&mut session, ""), transcript(&[PROMPT, "\n"]));

    // End of input at the teach-me prompt learns nothing
    let mut session = Session::open(MemoryStore::new(), FuzzyEngine::new()).unwrap();
    let output = converse(&mut session, "Capital of France?\n");
    let teach = format!("{}{}\n{}\n", PROMPT, UNKNOWN, TEACH_PROMPT);
    assert_eq!(output, transcript(&[&teach]));
    assert!(session.knowledge().is_empty());
    assert_eq!(session.store().saves(), 0);
}

#[test]
fn test_learning_persists_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("knowledge_base.json");

    let mut session = Session::open(JsonFileStore::new(&path), FuzzyEngine::new()).unwrap();
    assert!(session.knowledge().is_empty());
    converse(&mut session, "Capital of France?\nParis\nquit\n");

    let on_disk = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(&on_disk, session.knowledge());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"questions": [
            {"question": "Capital of France?", "answer": "Paris"}
        ]})
    );

    // A later session picks the answer up from disk
    let mut later = Session::open(JsonFileStore::new(&path), FuzzyEngine::new()).unwrap();
    let output = converse(&mut later, "capital of france\nquit\n");
    assert_eq!(output, transcript(&[&said("GooglBot: Paris"), PROMPT]));
}

#[test]
fn test_malformed_file_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("knowledge_base.json");
    fs::write(&path, "not json").unwrap();

    let result = Session::open(JsonFileStore::new(&path), FuzzyEngine::new());
    assert!(matches!(
        result,
        Err(Error::Store(StoreError::Parse { .. }))
    ));
}

#[test]
fn test_save_failure_ends_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("knowledge_base.json");

    let mut session = Session::open(JsonFileStore::new(&path), FuzzyEngine::new()).unwrap();
    let mut output = Vec::new();
    let result = session.run(
        Cursor::new("Capital of France?\nParis\n2^3\nquit\n".as_bytes()),
        &mut output,
    );

    assert!(matches!(
        result,
        Err(Error::Store(StoreError::Write { .. }))
    ));
    let output = String::from_utf8(output).unwrap();
    assert!(!output.contains(LEARNED));
    assert!(!output.contains("GooglBot: 8"));
}
