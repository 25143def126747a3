//! The console dispatch loop.
//!
//! Each line goes to the evaluator first, then to the knowledge base, and
//! finally to the teach-me prompt. The loop is generic over its reader and
//! writer so a whole conversation can be scripted in tests.

use std::io::{BufRead, Write};

use googl_core::eval::{Evaluator, Value};
use googl_core::fuzzy::FuzzyEngine;
use googl_core::knowledge::{KnowledgeBase, KnowledgeStore};
use tracing::{debug, info};

use crate::error::Result;

pub const GREETING: &str =
    "GooglBot: Hello! Ask me math questions or anything else. Type 'quit' to exit.";
pub const PROMPT: &str = "You: ";
pub const UNKNOWN: &str = "GooglBot: I don't know the answer. Can you teach me?";
pub const TEACH_PROMPT: &str = "Type the answer or \"skip\" to skip: ";
pub const SKIPPED: &str = "GooglBot: Okay, maybe next time.";
pub const LEARNED: &str = "GooglBot: Thank you! I learned a new response!";

const SPEAKER: &str = "GooglBot: ";
const QUIT: &str = "quit";
const SKIP: &str = "skip";

/// How the bot answers one line of input
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The line was a math expression
    Math(Value),
    /// A stored question was close enough
    Known(String),
    /// Nothing matched; the bot wants to be taught
    Unknown,
}

/// One conversation: evaluator state, knowledge and where it is persisted
pub struct Session<S> {
    evaluator: Evaluator,
    engine: FuzzyEngine,
    knowledge: KnowledgeBase,
    store: S,
}

impl<S: KnowledgeStore> Session<S> {
    /// Load the knowledge base from `store` and start a fresh session
    pub fn open(store: S, engine: FuzzyEngine) -> Result<Self> {
        let knowledge = store.load()?;
        Ok(Self::with_knowledge(store, knowledge, engine))
    }

    /// Start a session over an already loaded knowledge base
    pub fn with_knowledge(store: S, knowledge: KnowledgeBase, engine: FuzzyEngine) -> Self {
        Self {
            evaluator: Evaluator::new(),
            engine,
            knowledge,
            store,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Answer one trimmed line without any console I/O
    pub fn respond(&mut self, input: &str) -> Reply {
        if let Some(value) = self.evaluator.attempt(input) {
            return Reply::Math(value);
        }

        let answer = self
            .engine
            .best_match(input, self.knowledge.questions())
            .and_then(|question| self.knowledge.answer_for(&question).map(str::to_string));

        match answer {
            Some(answer) => Reply::Known(answer),
            None => Reply::Unknown,
        }
    }

    /// Append a new entry and persist the whole knowledge base
    pub fn learn(&mut self, question: &str, answer: &str) -> Result<()> {
        self.knowledge.push(question, answer);
        self.store.save(&self.knowledge)?;
        info!(question, entries = self.knowledge.len(), "learned new response");
        Ok(())
    }

    /// Drive the conversation until `quit` or end of input.
    ///
    /// Console I/O errors and store failures end the session with an error.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        writeln!(output, "{}", GREETING)?;

        loop {
            let line = match prompt(&mut input, &mut output, PROMPT)? {
                Some(line) => line,
                None => break,
            };
            let line = line.trim();
            if line.eq_ignore_ascii_case(QUIT) {
                debug!("quit requested");
                return Ok(());
            }

            match self.respond(line) {
                Reply::Math(value) => writeln!(output, "{}{}", SPEAKER, value)?,
                Reply::Known(answer) => writeln!(output, "{}{}", SPEAKER, answer)?,
                Reply::Unknown => {
                    writeln!(output, "{}", UNKNOWN)?;
                    let answer = match prompt(&mut input, &mut output, TEACH_PROMPT)? {
                        Some(answer) => answer,
                        None => break,
                    };
                    let answer = answer.trim();
                    if answer.eq_ignore_ascii_case(SKIP) {
                        writeln!(output, "{}", SKIPPED)?;
                    } else {
                        self.learn(line, answer)?;
                        writeln!(output, "{}", LEARNED)?;
                    }
                }
            }
        }

        debug!("end of input");
        Ok(())
    }
}

/// Print `text` without a newline and read one line; `None` at end of input
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        // Keep the transcript on its own line after an unanswered prompt
        writeln!(output)?;
        return Ok(None);
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use googl_core::knowledge::{KnowledgeEntry, MemoryStore};

    fn session() -> Session<MemoryStore> {
        let kb = KnowledgeBase::with_entries(vec![
            KnowledgeEntry::new("What is your name?", "GooglBot"),
            KnowledgeEntry::new("How old are you?", "Brand new"),
        ]);
        Session::with_knowledge(MemoryStore::new(), kb, FuzzyEngine::new())
    }

    #[test]
    fn test_math_wins_over_knowledge() {
        let mut session = session();
        assert_eq!(session.respond("2^3"), Reply::Math(Value::Number(8.0)));
    }

    #[test]
    fn test_known_question() {
        let mut session = session();
        assert_eq!(
            session.respond("what is ur name"),
            Reply::Known("GooglBot".to_string())
        );
        assert_eq!(
            session.respond("how old r u"),
            Reply::Known("Brand new".to_string())
        );
    }

    #[test]
    fn test_unknown_question() {
        let mut session = session();
        assert_eq!(session.respond("completely unrelated gibberish"), Reply::Unknown);
    }

    #[test]
    fn test_learn_saves_once() {
        let mut session = session();
        session.learn("Favourite colour?", "Blue").unwrap();
        assert_eq!(session.knowledge().len(), 3);
        assert_eq!(session.store().saves(), 1);
        assert_eq!(session.store().stored(), session.knowledge());
        assert_eq!(
            session.respond("Favourite colour?"),
            Reply::Known("Blue".to_string())
        );
    }
}
