use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::models::{CallHistoryDetails, ConversationSummary};

/// Conversations and call history read from a JSON file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub conversations: Vec<ConversationSummary>,
    pub calls: Vec<CallHistoryDetails>,
}

impl Fixture {
    pub fn from_json(data: &str) -> Result<Self, anyhow::Error> {
        serde_json::from_str(data).context("Failed to parse fixture")
    }

    pub async fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let data = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::from_json(&data)
    }

    pub fn conversation(&self, id: &str) -> Option<&ConversationSummary> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn call(&self, call_id: &str) -> Option<&CallHistoryDetails> {
        self.calls.iter().find(|c| c.call_id == call_id)
    }
}
