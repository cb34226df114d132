use serde::{Deserialize, Serialize};

use super::DateTime;

/// Why a conversation was removed from the conversation list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalStage {
    JustNotification,
    MessageRequest,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    // Display title, may be a placeholder for unknown contacts.
    pub title: String,
    // False when the title is a placeholder rather than a real name.
    #[serde(default = "default_true")]
    pub title_no_default: bool,
    // Name from the system address book.
    #[serde(default)]
    pub system_given_name: Option<String>,
    // Name obtained from the remote profile.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub e164: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub active_at: Option<DateTime>,
    #[serde(default)]
    pub removal_stage: Option<RemovalStage>,
    #[serde(default)]
    pub is_me: bool,
}

impl ConversationSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            title_no_default: true,
            system_given_name: None,
            name: None,
            e164: None,
            username: None,
            active_at: None,
            removal_stage: None,
            is_me: false,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.removal_stage.is_some()
    }

    /// Name shown when this conversation is referenced from another message.
    pub fn display_name(&self) -> &str {
        self.system_given_name.as_deref().unwrap_or(&self.title)
    }
}

fn default_true() -> bool {
    true
}
