use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use anyhow::anyhow;
use parking_lot::Mutex;

use crate::config::Settings;
use crate::events::{AppEvent, EventBus, EventKind, Subscription};

use super::{
    CiHandler, ConversationActions, ConversationLookup, ConversationsState, TargetedMessageSource,
    Toast, ToastPresenter,
};

pub const CLOSE_REASON_OPENED_ANOTHER: &str = "opened another conversation";
pub const CLOSE_REASON_FORCE_UNLOAD: &str = "force unload requested";
pub const CI_EVENT_EMPTY_INBOX: &str = "empty-inbox:rendered";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatsTabProps {
    pub nav_tabs_collapsed: bool,
    pub prev_conversation_id: Option<String>,
    pub selected_conversation_id: Option<String>,
}

struct TabState {
    // Selection seen by the last update.
    open_conversation_id: Option<String>,
    // Selection seen by the update before that.
    prev_conversation_id: Option<String>,
    // Targeted message seen by the last update.
    targeted: Targeted,
    updated: bool,
}

type Targeted = (Option<String>, Option<TargetedMessageSource>);

/// What an update has to do, decided under the state lock and run after it
/// is released.
enum Transition {
    Switch {
        close: Option<String>,
        open: Option<String>,
    },
    Scroll {
        conversation_id: String,
        message_id: String,
    },
    Stay,
}

/// Keeps the open conversation in line with the selection and reacts to
/// application events while mounted.
pub struct ChatsTab {
    actions: Arc<dyn ConversationActions>,
    lookup: Arc<dyn ConversationLookup>,
    toasts: Arc<dyn ToastPresenter>,
    events: EventBus,
    ci: Option<Arc<dyn CiHandler>>,
    state: Mutex<TabState>,
    mounted: AtomicBool,
}

impl ChatsTab {
    /// Creates the tab for the given initial state. The initial selection
    /// counts as already open.
    pub fn new(
        initial: &ConversationsState,
        actions: Arc<dyn ConversationActions>,
        lookup: Arc<dyn ConversationLookup>,
        toasts: Arc<dyn ToastPresenter>,
        events: EventBus,
    ) -> Self {
        Self {
            actions,
            lookup,
            toasts,
            events,
            ci: None,
            state: Mutex::new(TabState {
                open_conversation_id: initial.selected_conversation_id.clone(),
                prev_conversation_id: initial.selected_conversation_id.clone(),
                targeted: (
                    initial.targeted_message.clone(),
                    initial.targeted_message_source,
                ),
                updated: false,
            }),
            mounted: AtomicBool::new(false),
        }
    }

    pub fn with_ci_handler(mut self, ci: Arc<dyn CiHandler>) -> Self {
        self.ci = Some(ci);
        self
    }

    pub fn open_conversation_id(&self) -> Option<String> {
        self.state.lock().open_conversation_id.clone()
    }

    pub fn props(&self, settings: &Settings) -> ChatsTabProps {
        let state = self.state.lock();
        ChatsTabProps {
            nav_tabs_collapsed: settings.nav_tabs_collapsed,
            prev_conversation_id: state.prev_conversation_id.clone(),
            selected_conversation_id: state.open_conversation_id.clone(),
        }
    }

    /// Applies a new conversations state.
    ///
    /// Fails if the selected conversation is unknown to the lookup, which
    /// means the conversation store is out of sync.
    pub fn update(&self, conversations: &ConversationsState) -> Result<(), anyhow::Error> {
        let selected = conversations.selected_conversation_id.clone();
        let (transition, selection_changed, first_update) = {
            let mut state = self.state.lock();
            let previous = state.open_conversation_id.clone();
            let selection_changed = previous != selected;
            let targeted = (
                conversations.targeted_message.clone(),
                conversations.targeted_message_source,
            );
            let targeted_changed = state.targeted != targeted;
            let transition = if selection_changed {
                Transition::Switch {
                    close: previous.clone(),
                    open: selected.clone(),
                }
            } else if targeted_changed {
                match (&selected, &conversations.targeted_message) {
                    (Some(conversation_id), Some(message_id))
                        if conversations.targeted_message_source
                            != Some(TargetedMessageSource::Focus) =>
                    {
                        Transition::Scroll {
                            conversation_id: conversation_id.clone(),
                            message_id: message_id.clone(),
                        }
                    }
                    _ => Transition::Stay,
                }
            } else {
                Transition::Stay
            };
            let first_update = !state.updated;
            state.targeted = targeted;
            state.prev_conversation_id = previous;
            state.open_conversation_id = selected.clone();
            state.updated = true;
            (transition, selection_changed, first_update)
        };

        match transition {
            Transition::Switch { close, open } => {
                if let Some(conversation_id) = close {
                    tracing::debug!(%conversation_id, "Closing conversation");
                    self.actions
                        .on_conversation_closed(&conversation_id, CLOSE_REASON_OPENED_ANOTHER);
                }
                if let Some(conversation_id) = open {
                    tracing::debug!(%conversation_id, "Opening conversation");
                    self.actions.on_conversation_opened(
                        &conversation_id,
                        conversations.targeted_message.as_deref(),
                    );
                }
            }
            Transition::Scroll {
                conversation_id,
                message_id,
            } => {
                tracing::debug!(%conversation_id, %message_id, "Scrolling to message");
                self.actions.scroll_to_message(&conversation_id, &message_id);
            }
            Transition::Stay => {}
        }

        let Some(conversation_id) = selected else {
            if selection_changed || first_update {
                if let Some(ci) = &self.ci {
                    ci.handle_event(CI_EVENT_EMPTY_INBOX);
                }
            }
            return Ok(());
        };
        let conversation = self
            .lookup
            .get(&conversation_id)
            .ok_or_else(|| anyhow!("Conversation must be found: {conversation_id}"))?;
        conversation.set_marked_unread(false);
        Ok(())
    }

    /// Subscribes to application events for as long as the returned guard
    /// lives. Fails if the tab is already mounted.
    pub fn mount(self: &Arc<Self>) -> Result<MountedChatsTab, anyhow::Error> {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return Err(anyhow!("Chats tab is already mounted"));
        }
        let subscriptions = vec![
            self.subscribe(EventKind::PackInstallFailed, |tab, _| {
                tab.toasts.show_toast(Toast::StickerPackInstallFailed);
            }),
            self.subscribe(EventKind::RefreshConversation, |tab, event| {
                if let AppEvent::RefreshConversation { old_id, new_id } = event {
                    tab.refresh_conversation(old_id, new_id);
                }
            }),
            self.subscribe(EventKind::SetupAsNewDevice, |tab, _| {
                tab.unload();
            }),
        ];
        tracing::debug!("Chats tab mounted");
        Ok(MountedChatsTab {
            tab: self.clone(),
            subscriptions,
        })
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn subscribe<F>(self: &Arc<Self>, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&ChatsTab, &AppEvent) + Send + Sync + 'static,
    {
        let tab: Weak<Self> = Arc::downgrade(self);
        self.events.subscribe(kind, move |event| {
            if let Some(tab) = tab.upgrade() {
                handler(&tab, event);
            }
        })
    }

    fn refresh_conversation(&self, old_id: &str, new_id: &str) {
        let open = self.open_conversation_id();
        if open.as_deref() == Some(old_id) {
            tracing::info!(%old_id, %new_id, "Reopening refreshed conversation");
            self.actions.show_conversation(new_id);
        }
    }

    // Closes the open conversation so that it is reloaded after relinking.
    fn unload(&self) {
        let Some(conversation_id) = self.open_conversation_id() else {
            return;
        };
        tracing::info!(%conversation_id, "Force unloading conversation");
        self.actions
            .on_conversation_closed(&conversation_id, CLOSE_REASON_FORCE_UNLOAD);
    }
}

/// Mounted chats tab. Dropping it releases the event subscriptions.
pub struct MountedChatsTab {
    tab: Arc<ChatsTab>,
    subscriptions: Vec<Subscription>,
}

impl MountedChatsTab {
    pub fn tab(&self) -> &Arc<ChatsTab> {
        &self.tab
    }

    pub fn unmount(self) {}
}

impl Drop for MountedChatsTab {
    fn drop(&mut self) {
        self.subscriptions.clear();
        self.tab.mounted.store(false, Ordering::SeqCst);
        tracing::debug!("Chats tab unmounted");
    }
}
