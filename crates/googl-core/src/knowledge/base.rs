//! Knowledge base model
//!
//! The document is kept as raw JSON maps so fields this crate does not use
//! survive a load/save cycle with their key order intact.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const QUESTIONS: &str = "questions";
const QUESTION: &str = "question";
const ANSWER: &str = "answer";

/// One learned question/answer pair, plus any other fields it was stored with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct KnowledgeEntry {
    fields: Map<String, Value>,
}

impl KnowledgeEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(QUESTION.to_string(), Value::String(question.into()));
        fields.insert(ANSWER.to_string(), Value::String(answer.into()));
        Self { fields }
    }

    pub fn question(&self) -> &str {
        self.text(QUESTION)
    }

    pub fn answer(&self) -> &str {
        self.text(ANSWER)
    }

    /// Every stored field in stored order, including `question` and `answer`
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn text(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}

impl TryFrom<Map<String, Value>> for KnowledgeEntry {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        for key in [QUESTION, ANSWER] {
            match fields.get(key) {
                Some(Value::String(_)) => {}
                Some(_) => return Err(format!("field `{key}` must be a string")),
                None => return Err(format!("missing field `{key}`")),
            }
        }
        Ok(Self { fields })
    }
}

impl From<KnowledgeEntry> for Map<String, Value> {
    fn from(entry: KnowledgeEntry) -> Self {
        entry.fields
    }
}

/// The persisted question/answer corpus.
///
/// Entries keep their stored order and questions are not required to be
/// unique; lookups return the first match. Top-level keys other than
/// `questions` are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    questions: Vec<KnowledgeEntry>,
    /// Every top-level key in stored order; `questions` holds a placeholder
    document: Map<String, Value>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::with_entries(Vec::new())
    }
}

impl Serialize for KnowledgeBase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.document.len()))?;
        for (key, value) in &self.document {
            if key == QUESTIONS {
                map.serialize_entry(key, &self.questions)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KnowledgeBase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut document = Map::deserialize(deserializer)?;
        let raw = document
            .get_mut(QUESTIONS)
            .map(Value::take)
            .ok_or_else(|| de::Error::missing_field(QUESTIONS))?;
        let questions = Vec::<KnowledgeEntry>::deserialize(raw).map_err(de::Error::custom)?;
        Ok(Self {
            questions,
            document,
        })
    }
}

impl KnowledgeBase {
    /// Create an empty knowledge base
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a knowledge base from existing entries
    pub fn with_entries(entries: Vec<KnowledgeEntry>) -> Self {
        let mut document = Map::new();
        document.insert(QUESTIONS.to_string(), Value::Null);
        Self {
            questions: entries,
            document,
        }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.questions
    }

    /// Every stored question, in stored order
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|entry| entry.question())
    }

    /// Answer of the first entry whose question matches exactly.
    ///
    /// Case-sensitive, no normalization.
    pub fn answer_for(&self, question: &str) -> Option<&str> {
        self.questions
            .iter()
            .find(|entry| entry.question() == question)
            .map(KnowledgeEntry::answer)
    }

    /// Append an entry, even if the question already exists
    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.questions.push(KnowledgeEntry::new(question, answer));
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> KnowledgeBase {
        KnowledgeBase::with_entries(vec![
            KnowledgeEntry::new("What is your name?", "GooglBot"),
            KnowledgeEntry::new("How old are you?", "Brand new"),
            KnowledgeEntry::new("What is your name?", "Still GooglBot"),
        ])
    }

    #[test]
    fn test_answer_for_exact() {
        let kb = sample();
        assert_eq!(kb.answer_for("How old are you?"), Some("Brand new"));
    }

    #[test]
    fn test_answer_for_first_duplicate_wins() {
        let kb = sample();
        assert_eq!(kb.answer_for("What is your name?"), Some("GooglBot"));
    }

    #[test]
    fn test_answer_for_is_case_sensitive() {
        let kb = sample();
        assert_eq!(kb.answer_for("what is your name?"), None);
        assert_eq!(kb.answer_for("What is your name"), None);
    }

    #[test]
    fn test_push_keeps_order() {
        let mut kb = KnowledgeBase::new();
        assert!(kb.is_empty());
        kb.push("b", "2");
        kb.push("a", "1");
        assert_eq!(kb.questions().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(kb.len(), 2);
    }

    #[test]
    fn test_json_shape() {
        let kb = KnowledgeBase::with_entries(vec![KnowledgeEntry::new("q", "a")]);
        let json = serde_json::to_value(&kb).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"questions": [{"question": "q", "answer": "a"}]})
        );
    }

    #[test]
    fn test_missing_questions_key_rejected() {
        assert!(serde_json::from_str::<KnowledgeBase>("{}").is_err());
    }

    #[test]
    fn test_entry_requires_string_fields() {
        let missing = r#"{"questions": [{"question": "q"}]}"#;
        assert!(serde_json::from_str::<KnowledgeBase>(missing).is_err());
        let numeric = r#"{"questions": [{"question": "q", "answer": 4}]}"#;
        assert!(serde_json::from_str::<KnowledgeBase>(numeric).is_err());
    }

    #[test]
    fn test_extra_fields_and_key_order_kept() {
        let text = r#"{"version":2,"questions":[{"answer":"a","question":"q","added":"2024-01-01"}],"owner":"me"}"#;
        let mut kb: KnowledgeBase = serde_json::from_str(text).unwrap();
        assert_eq!(kb.answer_for("q"), Some("a"));
        assert_eq!(serde_json::to_string(&kb).unwrap(), text);

        kb.push("q2", "a2");
        let saved = serde_json::to_string(&kb).unwrap();
        assert_eq!(
            saved,
            r#"{"version":2,"questions":[{"answer":"a","question":"q","added":"2024-01-01"},{"question":"q2","answer":"a2"}],"owner":"me"}"#
        );
    }

    #[test]
    fn test_loaded_equals_constructed() {
        let loaded: KnowledgeBase =
            serde_json::from_str(r#"{"questions": [{"question": "q", "answer": "a"}]}"#).unwrap();
        let built = KnowledgeBase::with_entries(vec![KnowledgeEntry::new("q", "a")]);
        assert_eq!(loaded, built);
        let empty: KnowledgeBase = serde_json::from_str(r#"{"questions": []}"#).unwrap();
        assert_eq!(KnowledgeBase::new(), empty);
    }
}
