//! 状态类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::status::{AppMode, CoarseStatus, UserStatus};

/// 模式状态快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeState {
    /// 当前运行模式
    pub current_app_mode: AppMode,
    /// 当前会话状态（完整的带标签形式）
    pub current_user_status: UserStatus,
    /// 当前身份是否为演示账号
    pub is_demo_account: bool,
    /// 模式切换进行中（互斥标记，不持久化）
    #[serde(skip)]
    pub is_changing_mode: bool,
    /// 最近一次失败的分类
    pub last_error: Option<ErrorKind>,
    /// 最近一次模式或会话变更时间
    pub last_mode_change: Option<DateTime<Utc>>,
}

impl ModeState {
    pub fn new(mode: AppMode) -> Self {
        Self {
            current_app_mode: mode,
            current_user_status: UserStatus::guest(),
            is_demo_account: false,
            is_changing_mode: false,
            last_error: None,
            last_mode_change: None,
        }
    }

    pub fn coarse_status(&self) -> CoarseStatus {
        self.current_user_status.coarse()
    }

    pub fn is_demo_mode(&self) -> bool {
        self.current_app_mode == AppMode::Demo
    }

    pub fn is_live_mode(&self) -> bool {
        self.current_app_mode == AppMode::Live
    }

    pub fn is_development_mode(&self) -> bool {
        self.current_app_mode == AppMode::Development
    }

    pub fn uses_mock_data(&self) -> bool {
        self.is_demo_mode() || self.is_development_mode()
    }
}
