use std::fmt;

use serde::{Deserialize, Serialize};

use super::DateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallMode {
    None,
    Direct,
    Group,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallDirection {
    Incoming,
    Outgoing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallType {
    Audio,
    Video,
    Group,
    Adhoc,
}

/// Outcome of a call. Direct calls use `Pending` through `Deleted`, group
/// calls may additionally be in one of the ring/join states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallStatus {
    Pending,
    Accepted,
    Missed,
    Declined,
    Deleted,
    GenericGroupCall,
    OutgoingRing,
    Ringing,
    Joined,
}

impl CallStatus {
    pub fn is_missed_or_declined(self) -> bool {
        matches!(self, Self::Missed | Self::Declined)
    }
}

/// Live state of a call, derived at render time and never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallExternalState {
    Active,
    Full,
    Joined,
    Ended,
    InOtherCall,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallHistoryDetails {
    pub call_id: String,
    // Conversation the call belongs to.
    pub peer_id: String,
    // Who started ringing, group calls only.
    #[serde(default)]
    pub ringer_id: Option<String>,
    pub mode: CallMode,
    #[serde(rename = "type")]
    pub call_type: CallType,
    pub direction: CallDirection,
    pub status: CallStatus,
    pub timestamp: DateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallingNotification {
    pub call_history: CallHistoryDetails,
    pub call_creator: Option<super::ConversationSummary>,
    pub call_external_state: CallExternalState,
    pub device_count: usize,
    pub max_devices: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallHistoryFilterStatus {
    #[default]
    All,
    Missed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallHistoryFilterOptions {
    pub query: String,
    pub status: CallHistoryFilterStatus,
}

impl CallHistoryFilterOptions {
    pub fn new(query: impl Into<String>, status: CallHistoryFilterStatus) -> Self {
        Self {
            query: query.into(),
            status,
        }
    }
}

/// Query sent to the call history store. `conversation_ids` of `None` matches
/// every conversation; `Some` is never empty and keeps relevance order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallHistoryFilter {
    pub status: CallHistoryFilterStatus,
    pub conversation_ids: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallHistoryPagination {
    pub offset: usize,
    pub limit: usize,
}

impl CallHistoryPagination {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallHistoryGroupChild {
    pub call_id: String,
    pub timestamp: DateTime,
}

/// Adjacent calls with the same peer and outcome shown as a single row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallHistoryGroup {
    pub peer_id: String,
    pub mode: CallMode,
    #[serde(rename = "type")]
    pub call_type: CallType,
    pub direction: CallDirection,
    pub status: CallStatus,
    // Timestamp of the newest call in the group.
    pub timestamp: DateTime,
    pub children: Vec<CallHistoryGroupChild>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallingIcon {
    AudioIncoming,
    AudioMissed,
    AudioOutgoing,
    Phone,
    Video,
    VideoIncoming,
    VideoMissed,
    VideoOutgoing,
}

impl CallingIcon {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AudioIncoming => "audio-incoming",
            Self::AudioMissed => "audio-missed",
            Self::AudioOutgoing => "audio-outgoing",
            Self::Phone => "phone",
            Self::Video => "video",
            Self::VideoIncoming => "video-incoming",
            Self::VideoMissed => "video-missed",
            Self::VideoOutgoing => "video-outgoing",
        }
    }
}

impl fmt::Display for CallingIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
