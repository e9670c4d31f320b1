//! Session status in its canonical tagged form plus the coarse projection
//! used by gating code that does not care about reason codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier issued by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Placeholder identity used when only the coarse `authenticated` tag is known.
    pub const ANONYMOUS: &'static str = "anonymous";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn anonymous() -> Self {
        Self(Self::ANONYMOUS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_demo: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnauthReason {
    Logout,
    Expired,
    Initial,
    Demo,
}

impl UnauthReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Logout => "logout",
            Self::Expired => "expired",
            Self::Initial => "initial",
            Self::Demo => "demo",
        }
    }
}

impl FromStr for UnauthReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logout" => Ok(Self::Logout),
            "expired" => Ok(Self::Expired),
            "initial" => Ok(Self::Initial),
            "demo" => Ok(Self::Demo),
            other => Err(format!("unknown unauthenticated reason: {other:?}")),
        }
    }
}

/// Canonical session status. Exactly one tag is active; fields only exist on
/// the tag that carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UserStatus {
    Authenticated {
        user_id: UserId,
        at: DateTime<Utc>,
    },
    Unauthenticated {
        reason: Option<UnauthReason>,
        at: DateTime<Utc>,
    },
    Loading {
        at: DateTime<Utc>,
    },
}

impl UserStatus {
    pub fn authenticated(user_id: UserId) -> Self {
        Self::Authenticated {
            user_id,
            at: Utc::now(),
        }
    }

    pub fn unauthenticated(reason: Option<UnauthReason>) -> Self {
        Self::Unauthenticated {
            reason,
            at: Utc::now(),
        }
    }

    pub fn loading() -> Self {
        Self::Loading { at: Utc::now() }
    }

    /// Status a fresh process starts with.
    pub fn guest() -> Self {
        Self::unauthenticated(Some(UnauthReason::Initial))
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Authenticated { at, .. }
            | Self::Unauthenticated { at, .. }
            | Self::Loading { at } => *at,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Authenticated { user_id, .. } => Some(user_id),
            _ => None,
        }
    }

    /// Total projection onto the coarse three-value status.
    pub fn coarse(&self) -> CoarseStatus {
        match self {
            Self::Authenticated { .. } => CoarseStatus::Authenticated,
            Self::Unauthenticated {
                reason: Some(UnauthReason::Demo),
                ..
            } => CoarseStatus::Demo,
            Self::Unauthenticated { .. } | Self::Loading { .. } => CoarseStatus::Guest,
        }
    }

    /// Canonical rich value for a coarse status. `coarse()` of the result is
    /// always the input.
    pub fn from_coarse(coarse: CoarseStatus, at: DateTime<Utc>) -> Self {
        match coarse {
            CoarseStatus::Authenticated => Self::Authenticated {
                user_id: UserId::anonymous(),
                at,
            },
            CoarseStatus::Demo => Self::Unauthenticated {
                reason: Some(UnauthReason::Demo),
                at,
            },
            CoarseStatus::Guest => Self::Unauthenticated {
                reason: Some(UnauthReason::Initial),
                at,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoarseStatus {
    Authenticated,
    Demo,
    Guest,
}

impl CoarseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::Demo => "demo",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for CoarseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoarseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authenticated" => Ok(Self::Authenticated),
            "demo" => Ok(Self::Demo),
            "guest" => Ok(Self::Guest),
            other => Err(format!("unknown user status: {other:?}")),
        }
    }
}
