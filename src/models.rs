use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Originator of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Bot => "bot",
        }
    }
}

impl From<&str> for ChatRole {
    fn from(value: &str) -> Self {
        match value {
            "bot" => ChatRole::Bot,
            _ => ChatRole::User,
        }
    }
}

/// A persisted conversation turn. Immutable once written; ordered by
/// timestamp ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(skip_serializing)]
    pub id: i64,
    pub role: ChatRole,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_text_round_trip() {
        assert_eq!(ChatRole::from(ChatRole::User.as_str()), ChatRole::User);
        assert_eq!(ChatRole::from(ChatRole::Bot.as_str()), ChatRole::Bot);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::Bot).unwrap(), "\"bot\"");
    }
}
