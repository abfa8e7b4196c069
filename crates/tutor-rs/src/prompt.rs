//! Tutor prompt assembly.
//!
//! Every prompt is built in the same order: persona, study notes, mode
//! instruction, grounding directive, conversation history, new message.
//! [`PromptBuilder`] handles the section joining; [`build_prompt`] fixes the
//! order and content.

use crate::conversation::ChatTurn;
use crate::knowledge::{self, KnowledgeDocument};
use crate::mode::Mode;

/// Persona sentence that opens every prompt.
pub const TUTOR_PREAMBLE: &str =
    "You are a helpful AI tutor. Your role is to teach students based on the provided study notes.";

/// Keeps the model from answering outside the notes.
pub const GROUNDING_DIRECTIVE: &str =
    "IMPORTANT: Only use information from the study notes above. Do not add external information.";

/// Builder for labelled plain-text prompt sections.
///
/// Sections are joined with blank lines. A labelled section renders as
/// `LABEL:\n<content>` and is skipped when its content is empty.
///
/// # Example
///
/// ```
/// use tutor_rs::prompt::PromptBuilder;
///
/// let prompt = PromptBuilder::new("You are a tutor.")
///     .section("NOTES", "Plants need light.")
///     .section("HISTORY", "")
///     .raw("Student's message: hi")
///     .build();
///
/// assert_eq!(prompt, "You are a tutor.\n\nNOTES:\nPlants need light.\n\nStudent's message: hi");
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    sections: Vec<String>,
}

impl PromptBuilder {
    /// Start a prompt with a preamble that is included as-is.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            sections: vec![preamble.into()],
        }
    }

    /// Append `LABEL:\n<content>`. Skipped if `content` is empty.
    pub fn section(mut self, label: &str, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.sections.push(format!("{label}:\n{content}"));
        }
        self
    }

    /// Append text with no label. Skipped if empty.
    pub fn raw(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.sections.push(text);
        }
        self
    }

    /// Conditionally append a labelled section. `content_fn` only runs when
    /// `condition` holds.
    pub fn section_if(
        self,
        condition: bool,
        label: &str,
        content_fn: impl FnOnce() -> String,
    ) -> Self {
        if condition {
            self.section(label, content_fn())
        } else {
            self
        }
    }

    pub fn build(self) -> String {
        self.sections.join("\n\n")
    }
}

/// Everything the prompt depends on for a single request.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub message: &'a str,
    pub mode: Mode,
    pub history: &'a [ChatTurn],
    /// Topic name interpolated into the instructions. Does not change the notes.
    pub topic: Option<&'a str>,
    /// Language the reply should be written in.
    pub language: Option<&'a str>,
    /// Keep only the most recent N history turns. `None` keeps all of them.
    pub max_history_turns: Option<usize>,
}

impl<'a> PromptInput<'a> {
    pub fn new(message: &'a str, mode: Mode) -> Self {
        Self {
            message,
            mode,
            history: &[],
            topic: None,
            language: None,
            max_history_turns: None,
        }
    }

    pub fn with_history(mut self, history: &'a [ChatTurn]) -> Self {
        self.history = history;
        self
    }

    pub fn with_topic(mut self, topic: Option<&'a str>) -> Self {
        self.topic = topic;
        self
    }

    pub fn with_language(mut self, language: Option<&'a str>) -> Self {
        self.language = language;
        self
    }

    pub fn with_max_history_turns(mut self, max: Option<usize>) -> Self {
        self.max_history_turns = max;
        self
    }

    fn visible_history(&self) -> &'a [ChatTurn] {
        match self.max_history_turns {
            Some(max) if self.history.len() > max => &self.history[self.history.len() - max..],
            _ => self.history,
        }
    }
}

/// Build the prompt against the default study notes.
pub fn build_prompt(input: &PromptInput<'_>) -> String {
    build_prompt_with(knowledge::default_document(), input)
}

/// Build the prompt against a specific document.
pub fn build_prompt_with(document: &KnowledgeDocument, input: &PromptInput<'_>) -> String {
    let history = input.visible_history();
    let history_text = history
        .iter()
        .map(ChatTurn::render)
        .collect::<Vec<_>>()
        .join("\n");

    PromptBuilder::new(TUTOR_PREAMBLE)
        .section("STUDY NOTES", document.notes)
        .section("INSTRUCTIONS", instructions(input))
        .raw(GROUNDING_DIRECTIVE)
        .section_if(!history.is_empty(), "CONVERSATION HISTORY", || history_text)
        .raw(format!("Student's message: {}", input.message))
        .build()
}

fn instructions(input: &PromptInput<'_>) -> String {
    let mut text = input.mode.instruction().to_string();
    if let Some(topic) = non_blank(input.topic) {
        text.push_str(&format!("\nFocus on the topic: {topic}."));
    }
    if let Some(language) = non_blank(input.language) {
        text.push_str(&format!("\nRespond in {language}."));
    }
    text
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_omits_history_section() {
        for mode in Mode::ALL {
            let prompt = build_prompt(&PromptInput::new("What is ATP?", mode));
            assert!(prompt.contains(mode.instruction()), "mode {mode}");
            assert!(!prompt.contains("CONVERSATION HISTORY"), "mode {mode}");
        }
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let history = vec![ChatTurn::student("hi"), ChatTurn::tutor("hello")];
        let prompt = build_prompt(&PromptInput::new("next", Mode::Explain).with_history(&history));

        let positions: Vec<usize> = [
            TUTOR_PREAMBLE,
            "STUDY NOTES:",
            "INSTRUCTIONS:",
            GROUNDING_DIRECTIVE,
            "CONVERSATION HISTORY:",
            "Student's message: next",
        ]
        .iter()
        .map(|needle| prompt.find(needle).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn history_rendered_in_order_and_message_is_last_line() {
        let history = vec![
            ChatTurn::student("What is photosynthesis?"),
            ChatTurn::tutor("It turns light into sugar."),
            ChatTurn::student("Where does it happen?"),
        ];
        let prompt =
            build_prompt(&PromptInput::new("Tell me more", Mode::Simplify).with_history(&history));

        assert!(prompt.contains(
            "CONVERSATION HISTORY:\n\
             Student: What is photosynthesis?\n\
             Tutor: It turns light into sugar.\n\
             Student: Where does it happen?\n\n\
             Student's message: Tell me more"
        ));
        assert_eq!(prompt.lines().last(), Some("Student's message: Tell me more"));
    }

    #[test]
    fn prompt_without_history_has_expected_tail() {
        let prompt = build_prompt(&PromptInput::new("hi", Mode::Explain));
        assert!(prompt.ends_with(&format!("{GROUNDING_DIRECTIVE}\n\nStudent's message: hi")));
        assert!(prompt.starts_with(TUTOR_PREAMBLE));
    }

    #[test]
    fn topic_and_language_are_interpolated_into_instructions() {
        let prompt = build_prompt(
            &PromptInput::new("hi", Mode::Explain)
                .with_topic(Some("Calvin Cycle"))
                .with_language(Some("Spanish")),
        );
        let instructions_at = prompt.find("INSTRUCTIONS:").unwrap();
        let topic_at = prompt.find("Focus on the topic: Calvin Cycle.").unwrap();
        let language_at = prompt.find("Respond in Spanish.").unwrap();
        let grounding_at = prompt.find(GROUNDING_DIRECTIVE).unwrap();
        assert!(instructions_at < topic_at && topic_at < language_at && language_at < grounding_at);
    }

    #[test]
    fn blank_topic_is_ignored() {
        let prompt = build_prompt(&PromptInput::new("hi", Mode::Explain).with_topic(Some("  ")));
        assert!(!prompt.contains("Focus on the topic"));
    }

    #[test]
    fn max_history_turns_keeps_most_recent() {
        let history = vec![
            ChatTurn::student("one"),
            ChatTurn::tutor("two"),
            ChatTurn::student("three"),
        ];
        let prompt = build_prompt(
            &PromptInput::new("four", Mode::Quiz)
                .with_history(&history)
                .with_max_history_turns(Some(2)),
        );
        assert!(!prompt.contains("Student: one"));
        assert!(prompt.contains("Tutor: two\nStudent: three"));
    }

    #[test]
    fn zero_history_cap_drops_section() {
        let history = vec![ChatTurn::student("one")];
        let prompt = build_prompt(
            &PromptInput::new("two", Mode::Quiz)
                .with_history(&history)
                .with_max_history_turns(Some(0)),
        );
        assert!(!prompt.contains("CONVERSATION HISTORY"));
    }

    #[test]
    fn builder_skips_empty_sections() {
        let prompt = PromptBuilder::new("pre")
            .section("A", "")
            .section_if(false, "B", || "never".into())
            .raw("")
            .section("C", "body")
            .build();
        assert_eq!(prompt, "pre\n\nC:\nbody");
    }
}
