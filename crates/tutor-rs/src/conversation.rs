//! Caller-maintained conversation history.
//!
//! The server keeps no history of its own. Clients resend the turns they want
//! the tutor to see with every request.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Who spoke a turn.
///
/// On the wire this is a lowercase string. `"user"` and `"student"` map to
/// [`ChatRole::Student`]; every other value is treated as the tutor, so
/// clients that label replies `"ai"` or `"assistant"` work unchanged.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ChatRole {
    Student,
    Tutor,
}

impl From<String> for ChatRole {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "user" | "student" => ChatRole::Student,
            _ => ChatRole::Tutor,
        }
    }
}

impl ChatRole {
    /// Label used when rendering the turn into a prompt.
    pub fn label(self) -> &'static str {
        match self {
            ChatRole::Student => "Student",
            ChatRole::Tutor => "Tutor",
        }
    }
}

/// A single message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn student(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Student,
            content: content.into(),
        }
    }

    pub fn tutor(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tutor,
            content: content.into(),
        }
    }

    /// `"<Role>: <content>"`.
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.label(), self.content)
    }
}

/// Read a JSON array of turns from disk.
pub fn load_history(path: &Path) -> Result<Vec<ChatTurn>, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read history {}: {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| format!("failed to parse history {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn user_and_student_map_to_student() {
        let turns: Vec<ChatTurn> = serde_json::from_str(
            r#"[{"role":"user","content":"a"},{"role":"student","content":"b"}]"#,
        )
        .unwrap();
        assert!(turns.iter().all(|t| t.role == ChatRole::Student));
    }

    #[test]
    fn other_roles_map_to_tutor() {
        let turns: Vec<ChatTurn> = serde_json::from_str(
            r#"[{"role":"ai","content":"a"},{"role":"assistant","content":"b"},{"role":"tutor","content":"c"}]"#,
        )
        .unwrap();
        assert!(turns.iter().all(|t| t.role == ChatRole::Tutor));
    }

    #[test]
    fn render_uses_role_label() {
        assert_eq!(ChatTurn::student("hi").render(), "Student: hi");
        assert_eq!(ChatTurn::tutor("hello").render(), "Tutor: hello");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_value(ChatTurn::tutor("x")).unwrap();
        assert_eq!(json["role"], "tutor");
    }

    #[test]
    fn load_history_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"role":"user","content":"What is ATP?"}},{{"role":"ai","content":"Energy."}}]"#
        )
        .unwrap();

        let turns = load_history(file.path()).unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], ChatTurn::student("What is ATP?"));
        assert_eq!(turns[1], ChatTurn::tutor("Energy."));
    }

    #[test]
    fn load_history_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_history(file.path()).unwrap_err();
        assert!(err.contains("failed to parse history"));
    }
}
