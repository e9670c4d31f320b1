use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which data source and debug affordances are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Demo,
    Live,
    Development,
}

impl AppMode {
    pub const ALL: [AppMode; 3] = [AppMode::Demo, AppMode::Live, AppMode::Development];

    pub fn as_str(self) -> &'static str {
        match self {
            AppMode::Demo => "demo",
            AppMode::Live => "live",
            AppMode::Development => "development",
        }
    }

    /// Modes served from mocked data rather than the real backend.
    pub fn uses_mock_data(self) -> bool {
        matches!(self, AppMode::Demo | AppMode::Development)
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "demo" => Ok(AppMode::Demo),
            "live" => Ok(AppMode::Live),
            "development" => Ok(AppMode::Development),
            other => Err(format!("invalid app mode: {other:?}")),
        }
    }
}

/// Exact, case-sensitive membership test against the closed set of modes.
pub fn is_valid_app_mode(raw: &str) -> bool {
    raw.parse::<AppMode>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_modes() {
        for mode in AppMode::ALL {
            assert!(is_valid_app_mode(mode.as_str()));
        }
    }

    #[test]
    fn test_invalid_modes() {
        for raw in ["", "Demo", "LIVE", "dev", "production", " demo", "demo "] {
            assert!(!is_valid_app_mode(raw), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_mock_data_modes() {
        assert!(AppMode::Demo.uses_mock_data());
        assert!(AppMode::Development.uses_mock_data());
        assert!(!AppMode::Live.uses_mock_data());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&AppMode::Development).unwrap(),
            "\"development\""
        );
        let mode: AppMode = serde_json::from_str("\"live\"").unwrap();
        assert_eq!(mode, AppMode::Live);
    }
}
