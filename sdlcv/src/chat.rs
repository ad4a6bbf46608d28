//! Conversation manager for the analysis assistant chat.
//!
//! An append-only transcript seeded with the assistant greeting, plus a
//! single-flight flag. `send` validates and appends the user message
//! optimistically; `apply_reply` appends exactly one assistant message for
//! every accepted send, substituting a fixed fallback on failure so the
//! transcript never stalls.

use sdlcv_core::error::VerifierError;
use sdlcv_core::types::{ChatMessage, Role};

/// Greeting the transcript is seeded with.
pub const GREETING: &str = "Hello! I'm your SDLC Analysis Assistant. I can help you \
understand your project analysis results and answer questions about SDLC best \
practices. How can I help you today?";

/// Assistant message appended when the backend call fails.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

/// The chat transcript and its single-flight state.
pub struct Conversation {
    /// Append-only; messages are never edited, removed, or reordered.
    pub messages: Vec<ChatMessage>,
    /// True between an accepted `send` and its `apply_reply`.
    pub awaiting_reply: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage { role: Role::Ai, content: GREETING.to_string() }],
            awaiting_reply: false,
        }
    }
}

impl Conversation {
    /// Accepts a user message for sending.
    ///
    /// Rejects blank or whitespace-only input and re-entry while a reply is
    /// pending; neither rejection touches the transcript. On acceptance the
    /// message is appended as typed (untrimmed) and returned for dispatch.
    pub fn send(&mut self, input: &str) -> Result<String, VerifierError> {
        if input.trim().is_empty() {
            return Err(VerifierError::Validation("Message is empty".into()));
        }
        if self.awaiting_reply {
            return Err(VerifierError::Validation("Waiting for a reply".into()));
        }
        self.messages.push(ChatMessage { role: Role::User, content: input.to_string() });
        self.awaiting_reply = true;
        Ok(input.to_string())
    }

    /// Appends the assistant reply for the pending send.
    ///
    /// A successful reply is reformatted so numbered items start on their own
    /// line; a failure appends the fixed fallback instead. Either way exactly
    /// one assistant message is appended and the flight flag clears.
    pub fn apply_reply(&mut self, result: Result<String, VerifierError>) {
        let content = match result {
            Ok(text) => break_numbered_items(&text),
            Err(_) => FALLBACK_REPLY.to_string(),
        };
        self.messages.push(ChatMessage { role: Role::Ai, content });
        self.awaiting_reply = false;
    }
}

/// Inserts a line break before each inline numbered item (`1. `, `2. ` ...)
/// so backend replies that run list items together render as a list.
///
/// An item already at the start of a line is left alone.
fn break_numbered_items(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        // A digit run followed by ". " marks an item; break unless we are
        // already at the start of a line.
        let mut j = i;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        let is_item = j > i
            && j + 1 < chars.len()
            && chars[j] == '.'
            && chars[j + 1] == ' ';
        if is_item && i > 0 && chars[i - 1] != '\n' {
            out.push('\n');
        }
        if is_item {
            for &c in &chars[i..=j + 1] {
                out.push(c);
            }
            i = j + 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_starts_with_greeting() {
        let chat = Conversation::default();
        assert_eq!(chat.messages.len(), 1);
        assert_eq!(chat.messages[0].role, Role::Ai);
        assert_eq!(chat.messages[0].content, GREETING);
    }

    #[test]
    fn blank_input_leaves_transcript_unchanged() {
        let mut chat = Conversation::default();
        assert!(chat.send("   ").is_err());
        assert!(chat.send("").is_err());
        assert_eq!(chat.messages.len(), 1);
        assert!(!chat.awaiting_reply);
    }

    #[test]
    fn send_rejects_reentry_while_awaiting() {
        let mut chat = Conversation::default();
        chat.send("first").unwrap();
        assert!(chat.awaiting_reply);
        assert!(chat.send("second").is_err());
        assert_eq!(chat.messages.len(), 2);
    }

    #[test]
    fn failure_appends_exactly_one_fallback() {
        let mut chat = Conversation::default();
        chat.send("what is my score?").unwrap();
        chat.apply_reply(Err(VerifierError::Network("timeout".into())));
        assert_eq!(chat.messages.len(), 3);
        assert_eq!(chat.messages[1].role, Role::User);
        assert_eq!(chat.messages[2].role, Role::Ai);
        assert_eq!(chat.messages[2].content, FALLBACK_REPLY);
        assert!(!chat.awaiting_reply);
    }

    #[test]
    fn user_message_is_kept_untrimmed() {
        let mut chat = Conversation::default();
        chat.send("  hello  ").unwrap();
        assert_eq!(chat.messages[1].content, "  hello  ");
    }

    #[test]
    fn numbered_items_break_onto_fresh_lines() {
        assert_eq!(
            break_numbered_items("Steps: 1. upload 2. analyze"),
            "Steps: \n1. upload \n2. analyze"
        );
        // Items already at line start are untouched.
        assert_eq!(break_numbered_items("1. first\n2. second"), "1. first\n2. second");
        // Plain numbers without the dot-space marker are untouched.
        assert_eq!(break_numbered_items("scored 85. nice"), "scored \n85. nice");
        assert_eq!(break_numbered_items("version 1.2 shipped"), "version 1.2 shipped");
    }
}
