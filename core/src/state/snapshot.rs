//! 持久化记录的编码与解码

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::ModeState;
use crate::error::StoreError;
use crate::status::{AppMode, UserStatus};

/// `app:app:settings` 下保存的模式设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub app_mode: AppMode,
    #[serde(default)]
    pub is_demo_account: bool,
    #[serde(default)]
    pub last_mode_change: Option<DateTime<Utc>>,
}

impl SettingsRecord {
    pub fn from_state(state: &ModeState) -> Self {
        Self {
            app_mode: state.current_app_mode,
            is_demo_account: state.is_demo_account,
            last_mode_change: state.last_mode_change,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// `app:auth:data` 下保存的会话状态
pub fn encode_user_status(status: &UserStatus) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec(status)?)
}

pub fn decode_user_status(bytes: &[u8]) -> Result<UserStatus, StoreError> {
    Ok(serde_json::from_slice(bytes)?)
}
