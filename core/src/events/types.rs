use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::status::{AppMode, UnauthReason, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    UserLoggedIn,
    UserLoggedOut,
    ModeChanged,
    DemoAccountChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::UserLoggedIn,
        EventKind::UserLoggedOut,
        EventKind::ModeChanged,
        EventKind::DemoAccountChanged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserLoggedIn => "USER_LOGGED_IN",
            Self::UserLoggedOut => "USER_LOGGED_OUT",
            Self::ModeChanged => "MODE_CHANGED",
            Self::DemoAccountChanged => "DEMO_ACCOUNT_CHANGED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event value object. Handlers only ever see `&Event`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    UserLoggedIn {
        user: UserProfile,
    },
    UserLoggedOut {
        reason: UnauthReason,
        timestamp: DateTime<Utc>,
    },
    ModeChanged {
        previous_mode: AppMode,
        new_mode: AppMode,
        timestamp: DateTime<Utc>,
    },
    DemoAccountChanged {
        is_demo_account: bool,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::UserLoggedIn { .. } => EventKind::UserLoggedIn,
            Self::UserLoggedOut { .. } => EventKind::UserLoggedOut,
            Self::ModeChanged { .. } => EventKind::ModeChanged,
            Self::DemoAccountChanged { .. } => EventKind::DemoAccountChanged,
        }
    }
}
