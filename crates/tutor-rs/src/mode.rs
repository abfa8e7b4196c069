//! Learning modes and the instruction each one injects into the prompt.
//!
//! The catalog is closed: [`Mode`] only has three variants and request
//! validation rejects anything else via [`FromStr`]. Lookups by raw tag
//! ([`instruction_for_tag`], [`Mode::from_tag_or_default`]) are total and
//! fall back to [`Mode::Explain`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const EXPLAIN_INSTRUCTION: &str = "Explain the concept clearly with examples using only the notes provided below. Be thorough but concise.";

const SIMPLIFY_INSTRUCTION: &str = "Explain the concept in very simple words like teaching a beginner or child. Use analogies and everyday examples.";

const QUIZ_INSTRUCTION: &str = "\
Conduct a multiple-choice quiz based on the notes.
1. Ask ONE question at a time with 4 options (A, B, C, D).
2. Start with a question about a RANDOM concept from the notes (do not always start with the definition).
3. When the student answers, start with 'Correct!' or 'Incorrect!' followed by a brief explanation.
4. ONLY AFTER the explanation, ask the NEXT question.
5. Number your questions (e.g., Question 1, Question 2).
6. Continue asking questions indefinitely until the student explicitly says 'stop'. Do not end the quiz automatically.
7. If the student asks for a 'new quiz', 'restart', or 'start over', ignore the previous conversation and start a fresh quiz from Question 1.
8. If the student says 'end quiz', 'stop', or 'quit', conclude the quiz and say 'Quiz ended. Type \"new quiz\" to start again.' Do not resume the quiz unless the student asks for a new one.";

/// Tutoring strategy selected by the student.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Explain,
    Quiz,
    Simplify,
}

impl Mode {
    /// Every mode, in display order.
    pub const ALL: [Mode; 3] = [Mode::Explain, Mode::Quiz, Mode::Simplify];

    /// The wire tag for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Explain => "explain",
            Mode::Quiz => "quiz",
            Mode::Simplify => "simplify",
        }
    }

    /// The behavioral instruction injected into the prompt for this mode.
    pub fn instruction(self) -> &'static str {
        match self {
            Mode::Explain => EXPLAIN_INSTRUCTION,
            Mode::Quiz => QUIZ_INSTRUCTION,
            Mode::Simplify => SIMPLIFY_INSTRUCTION,
        }
    }

    /// Parse a tag, defaulting to [`Mode::Explain`] for anything unknown.
    pub fn from_tag_or_default(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    /// Comma-separated list of valid tags, for error messages.
    pub fn valid_tags() -> String {
        Self::ALL
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a tag is outside the mode catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "explain" => Ok(Mode::Explain),
            "quiz" => Ok(Mode::Quiz),
            "simplify" => Ok(Mode::Simplify),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Instruction text for a raw mode tag. Unknown tags get the explain
/// instruction.
pub fn instruction_for_tag(tag: &str) -> &'static str {
    Mode::from_tag_or_default(tag).instruction()
}
