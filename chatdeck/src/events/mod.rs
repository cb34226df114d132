mod bus;

pub use bus::*;

/// Application wide events the tabs react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    PackInstallFailed,
    /// A conversation was merged or re-keyed and now lives under `new_id`.
    RefreshConversation {
        old_id: String,
        new_id: String,
    },
    SetupAsNewDevice,
}

impl AppEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PackInstallFailed => EventKind::PackInstallFailed,
            Self::RefreshConversation { .. } => EventKind::RefreshConversation,
            Self::SetupAsNewDevice => EventKind::SetupAsNewDevice,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PackInstallFailed,
    RefreshConversation,
    SetupAsNewDevice,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PackInstallFailed => "pack-install-failed",
            Self::RefreshConversation => "refreshConversation",
            Self::SetupAsNewDevice => "setupAsNewDevice",
        }
    }
}
