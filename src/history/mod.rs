//! Session-scoped conversation history.
//!
//! An ordered, append-only record of attributed turns. The caller owns one
//! [`ConversationHistory`] per interactive session and passes it by `&mut`
//! into every pipeline invocation. There is no interior locking: concurrent
//! sessions must use independent instances.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transcript name of the end user. Reserved: no persona may use it.
pub const USER_SPEAKER: &str = "User";

/// Who produced a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The end user.
    User,
    /// The active persona, by name.
    Persona(String),
}

impl Speaker {
    pub fn is_user(&self) -> bool {
        matches!(self, Speaker::User)
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => f.write_str(USER_SPEAKER),
            Speaker::Persona(name) => f.write_str(name),
        }
    }
}

/// One attributed utterance. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn persona(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Persona(name.into()),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Transcript line: `speaker: text`, always a single line.
    ///
    /// Line breaks inside the text are flattened to spaces so one turn can
    /// never be read back as several. The stored text is left unchanged.
    pub fn transcript_line(&self) -> String {
        let flat = self
            .text
            .replace("\r\n", " ")
            .replace(|c: char| c == '\n' || c == '\r', " ");
        format!("{}: {}", self.speaker, flat)
    }
}

/// Ordered, append-only sequence of turns for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// Read-only view of all turns in insertion order.
    pub fn snapshot(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Drop every turn (session reset).
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Render every turn as `speaker: text`, one per line.
    pub fn transcript(&self) -> String {
        render_transcript(&self.turns)
    }
}

/// Render turns as `speaker: text`, one per line, in the given order.
pub fn render_transcript(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(ConversationTurn::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}
