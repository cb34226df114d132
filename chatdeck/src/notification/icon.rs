use anyhow::anyhow;

use crate::models::{CallDirection, CallStatus, CallType, CallingIcon};

/// Picks the icon of a call history row.
pub fn get_calling_icon(
    call_type: CallType,
    direction: CallDirection,
    status: CallStatus,
) -> Result<CallingIcon, anyhow::Error> {
    let icon = match call_type {
        CallType::Audio => match (status, direction) {
            (CallStatus::Accepted, CallDirection::Incoming) => CallingIcon::AudioIncoming,
            (CallStatus::Accepted, CallDirection::Outgoing) => CallingIcon::AudioOutgoing,
            (CallStatus::Missed | CallStatus::Declined, _) => CallingIcon::AudioMissed,
            _ => CallingIcon::Phone,
        },
        CallType::Video => match (status, direction) {
            (CallStatus::Accepted, CallDirection::Incoming) => CallingIcon::VideoIncoming,
            (CallStatus::Accepted, CallDirection::Outgoing) => CallingIcon::VideoOutgoing,
            (CallStatus::Missed | CallStatus::Declined, _) => CallingIcon::VideoMissed,
            _ => CallingIcon::Video,
        },
        // Group calls look the same whatever their direction or outcome.
        CallType::Group => CallingIcon::Video,
        CallType::Adhoc => {
            return Err(anyhow!(
                "get_calling_icon: unexpected call type {call_type:?}"
            ));
        }
    };
    Ok(icon)
}
