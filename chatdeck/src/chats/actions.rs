use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Conversation lifecycle actions dispatched by the chats tab.
pub trait ConversationActions: Send + Sync {
    fn on_conversation_closed(&self, conversation_id: &str, reason: &str);

    fn on_conversation_opened(&self, conversation_id: &str, targeted_message_id: Option<&str>);

    fn scroll_to_message(&self, conversation_id: &str, message_id: &str);

    fn show_conversation(&self, conversation_id: &str);
}

/// Mutable conversation object owned by the conversation store.
pub trait ConversationModel: Send + Sync {
    fn set_marked_unread(&self, marked_unread: bool);
}

pub trait ConversationLookup: Send + Sync {
    fn get(&self, conversation_id: &str) -> Option<Arc<dyn ConversationModel>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toast {
    StickerPackInstallFailed,
}

impl Toast {
    /// Message id of the toast text.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::StickerPackInstallFailed => "icu:StickerPackInstallFailed",
        }
    }
}

pub trait ToastPresenter: Send + Sync {
    fn show_toast(&self, toast: Toast);
}

/// Hooks for automated UI test harnesses.
pub trait CiHandler: Send + Sync {
    fn handle_event(&self, event: &str);
}

/// Why a message is targeted in the open conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetedMessageSource {
    Reset,
    NavigateToMessage,
    /// Targeted only to move keyboard focus; never scrolls.
    Focus,
}

/// Slice of the conversations state the chats tab reacts to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationsState {
    pub selected_conversation_id: Option<String>,
    pub targeted_message: Option<String>,
    pub targeted_message_source: Option<TargetedMessageSource>,
}

impl ConversationsState {
    pub fn selected(conversation_id: impl Into<String>) -> Self {
        Self {
            selected_conversation_id: Some(conversation_id.into()),
            ..Default::default()
        }
    }

    pub fn with_targeted_message(
        mut self,
        message_id: impl Into<String>,
        source: TargetedMessageSource,
    ) -> Self {
        self.targeted_message = Some(message_id.into());
        self.targeted_message_source = Some(source);
        self
    }
}
