use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Whether a turn holds a real answer or marks a failed model call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Ok,
    Failed,
}

/// One entry in the session's conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub status: TurnStatus,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            status: TurnStatus::Ok,
        }
    }

    /// Assistant turn recording that the model call failed
    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            status: TurnStatus::Failed,
            ..Self::new(Role::Assistant, description)
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == TurnStatus::Failed
    }
}
