//! 模式切换规则和验证

use super::types::ModeState;
use crate::error::StoreError;
use crate::status::AppMode;

/// 模式切换
pub struct ModeTransition;

impl ModeTransition {
    /// 验证模式切换是否合法（不修改状态）
    pub fn validate(
        state: &ModeState,
        requested: AppMode,
        pinned: Option<AppMode>,
    ) -> Result<(), StoreError> {
        // 已有切换进行中：立即拒绝，不排队
        if state.is_changing_mode {
            return Err(StoreError::UnauthorizedChange);
        }

        if let Some(pinned) = pinned {
            if requested != pinned {
                return Err(StoreError::BuildMismatch { pinned, requested });
            }
        }

        Ok(())
    }

    /// toggle 的目标模式：demo ↔ live，development 不参与循环
    pub fn toggle_target(current: AppMode) -> Result<AppMode, StoreError> {
        match current {
            AppMode::Demo => Ok(AppMode::Live),
            AppMode::Live => Ok(AppMode::Demo),
            AppMode::Development => Err(StoreError::InvalidState {
                mode: current,
                action: "toggle app mode",
            }),
        }
    }

    /// 是否允许切换模式
    pub fn can_switch(state: &ModeState, pinned: Option<AppMode>) -> bool {
        !state.is_changing_mode && pinned.is_none()
    }
}
