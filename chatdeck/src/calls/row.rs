use crate::i18n::Localizer;
use crate::models::{
    CallExternalState, CallHistoryDetails, CallHistoryGroup, CallingIcon, CallingNotification,
    ConversationSummary, DateTime,
};
use crate::notification::{get_calling_icon, get_calling_notification_text};

/// Display data of one calls list row.
#[derive(Clone, Debug, PartialEq)]
pub struct CallHistoryRow {
    pub peer_id: String,
    pub title: String,
    pub text: String,
    pub icon: CallingIcon,
    pub call_count: usize,
    pub timestamp: DateTime,
}

/// Formats `group` for the calls list. `creator` is the conversation that
/// started a group call, if known.
pub fn call_history_row(
    group: &CallHistoryGroup,
    peer: Option<&ConversationSummary>,
    creator: Option<&ConversationSummary>,
    external_state: CallExternalState,
    i18n: &dyn Localizer,
) -> Result<CallHistoryRow, anyhow::Error> {
    let newest_call_id = group
        .children
        .first()
        .map(|child| child.call_id.clone())
        .unwrap_or_default();
    let notification = CallingNotification {
        call_history: CallHistoryDetails {
            call_id: newest_call_id,
            peer_id: group.peer_id.clone(),
            ringer_id: creator.map(|c| c.id.clone()),
            mode: group.mode,
            call_type: group.call_type,
            direction: group.direction,
            status: group.status,
            timestamp: group.timestamp,
        },
        call_creator: creator.cloned(),
        call_external_state: external_state,
        device_count: 0,
        max_devices: 0,
    };
    Ok(CallHistoryRow {
        peer_id: group.peer_id.clone(),
        title: peer.map_or_else(|| group.peer_id.clone(), |p| p.title.clone()),
        text: get_calling_notification_text(&notification, i18n)?,
        icon: get_calling_icon(group.call_type, group.direction, group.status)?,
        call_count: group.children.len(),
        timestamp: group.timestamp,
    })
}
