use anyhow::anyhow;

use crate::i18n::Localizer;
use crate::models::{
    CallDirection, CallExternalState, CallMode, CallStatus, CallType, CallingNotification,
    ConversationSummary,
};

/// Renders the text of a call history notification.
///
/// Fails for records that can never be displayed: calls without a mode,
/// deleted direct calls and direct calls carrying a group-only status.
pub fn get_calling_notification_text(
    notification: &CallingNotification,
    i18n: &dyn Localizer,
) -> Result<String, anyhow::Error> {
    let call_history = &notification.call_history;
    match call_history.mode {
        CallMode::Direct => direct_call_text(
            call_history.direction,
            call_history.call_type,
            call_history.status,
            i18n,
        ),
        CallMode::Group => Ok(group_call_text(
            notification.call_external_state,
            notification.call_creator.as_ref(),
            i18n,
        )),
        CallMode::None => Err(anyhow!(
            "get_calling_notification_text: cannot render call history details with mode = None"
        )),
    }
}

fn direct_call_text(
    direction: CallDirection,
    call_type: CallType,
    status: CallStatus,
    i18n: &dyn Localizer,
) -> Result<String, anyhow::Error> {
    use CallDirection::{Incoming, Outgoing};

    let video = call_type == CallType::Video;
    let key = match (status, direction) {
        (CallStatus::Pending, Incoming) => {
            pick(video, "icu:incomingVideoCall", "icu:incomingAudioCall")
        }
        (CallStatus::Pending, Outgoing) => {
            pick(video, "icu:outgoingVideoCall", "icu:outgoingAudioCall")
        }
        (CallStatus::Accepted, Incoming) => pick(
            video,
            "icu:acceptedIncomingVideoCall",
            "icu:acceptedIncomingAudioCall",
        ),
        (CallStatus::Accepted, Outgoing) => pick(
            video,
            "icu:acceptedOutgoingVideoCall",
            "icu:acceptedOutgoingAudioCall",
        ),
        (CallStatus::Declined, Incoming) => pick(
            video,
            "icu:declinedIncomingVideoCall",
            "icu:declinedIncomingAudioCall",
        ),
        (CallStatus::Missed, Incoming) => pick(
            video,
            "icu:missedIncomingVideoCall",
            "icu:missedIncomingAudioCall",
        ),
        // An unanswered outgoing call reads the same whether it was missed or declined.
        (CallStatus::Declined | CallStatus::Missed, Outgoing) => pick(
            video,
            "icu:missedOrDeclinedOutgoingVideoCall",
            "icu:missedOrDeclinedOutgoingAudioCall",
        ),
        (CallStatus::Deleted, _) => {
            return Err(anyhow!("direct_call_text: cannot render deleted call"));
        }
        (
            CallStatus::GenericGroupCall
            | CallStatus::OutgoingRing
            | CallStatus::Ringing
            | CallStatus::Joined,
            _,
        ) => {
            return Err(anyhow!(
                "direct_call_text: unexpected status {status:?} for a direct call"
            ));
        }
    };
    Ok(i18n.message(key, &[]))
}

fn group_call_text(
    external_state: CallExternalState,
    creator: Option<&ConversationSummary>,
    i18n: &dyn Localizer,
) -> String {
    if external_state == CallExternalState::Ended {
        return i18n.message("icu:calling__call-notification__ended", &[]);
    }
    match creator {
        None => i18n.message("icu:calling__call-notification__started-by-someone", &[]),
        Some(creator) if creator.is_me => {
            i18n.message("icu:calling__call-notification__started-by-you", &[])
        }
        Some(creator) => i18n.message(
            "icu:calling__call-notification__started",
            &[("name", creator.display_name())],
        ),
    }
}

fn pick(video: bool, video_key: &'static str, audio_key: &'static str) -> &'static str {
    if video { video_key } else { audio_key }
}
