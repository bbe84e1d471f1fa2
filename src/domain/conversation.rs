use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
}

/// One side of an exchange, in the `{role, parts:[{text}]}` shape the caller
/// sends and receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<TextPart>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![TextPart { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![TextPart { text: text.into() }],
        }
    }

    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The full history of one intake session. Owned by the caller across
/// requests; the handler appends each side of a turn exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// What the model did with its turn: either a free-text clarification to
/// relay to the operator, or a structured tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Clarification(String),
    ToolInvocation(ToolCall),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_serde_matches_request_shape() {
        let json = serde_json::json!([
            { "role": "user", "parts": [{ "text": "rack is down" }] },
            { "role": "model", "parts": [{ "text": "Which floor?" }] }
        ]);
        let conversation: Conversation = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.turns()[0].role, Role::User);
        assert_eq!(conversation.turns()[1].text(), "Which floor?");
        assert_eq!(serde_json::to_value(&conversation).unwrap(), json);
    }

    #[test]
    fn multi_part_turns_join_text() {
        let turn = Turn {
            role: Role::Model,
            parts: vec![
                TextPart {
                    text: "Noted.".to_string(),
                },
                TextPart {
                    text: "Which aisle?".to_string(),
                },
            ],
        };
        assert_eq!(turn.text(), "Noted.\nWhich aisle?");
    }
}
