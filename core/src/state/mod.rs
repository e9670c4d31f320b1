//! # 模式与会话状态
//!
//! 负责跟踪当前运行模式（demo / live / development）、用户会话状态以及演示账号标记，
//! 并以一致、防竞争的方式完成模式切换。
//!
//! ## 设计原则
//!
//! 1. **单一所有者**：`ModeStore` 是 `ModeState` 唯一的写入方，其它组件只读或发起动作
//! 2. **拒绝而非排队**：模式切换进行中再次切换立即失败（`unauthorized_change`）
//! 3. **固定顺序**：内存变更 → 持久化写入 → 事件发布
//! 4. **可恢复失败**：所有被拒绝的动作只记录 `last_error`，不会崩溃

pub mod manager;
pub mod session;
pub mod snapshot;
pub mod transitions;
pub mod types;

pub use manager::ModeStore;
pub use session::DemoSession;
pub use snapshot::SettingsRecord;
pub use transitions::ModeTransition;
pub use types::ModeState;
