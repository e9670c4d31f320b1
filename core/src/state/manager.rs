//! 模式状态管理器

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::snapshot::{decode_user_status, encode_user_status, SettingsRecord};
use super::transitions::ModeTransition;
use super::types::ModeState;
use crate::config::{AppConfig, BuildConfig, WritePolicy};
use crate::error::{ErrorKind, StoreError};
use crate::events::{Event, EventBus};
use crate::status::{
    is_valid_app_mode, AppMode, CoarseStatus, UnauthReason, UserProfile, UserStatus,
};
use crate::storage::{
    run_migration, LogicalKey, MigrationReport, PersistenceGateway, StorageKeyRegistry,
};

/// 模式状态管理器
///
/// 克隆代价很低，所有克隆共享同一份状态。进程启动时构造一次，然后传给各个使用方。
#[derive(Clone)]
pub struct ModeStore {
    inner: Arc<ModeStoreInner>,
}

struct ModeStoreInner {
    /// 内存状态；持锁期间不会 `.await`
    state: RwLock<ModeState>,
    gateway: Arc<dyn PersistenceGateway>,
    bus: EventBus,
    registry: StorageKeyRegistry,
    build: BuildConfig,
    write_policy: WritePolicy,
}

/// 一次写入动作的结果：内存状态是否已变更，以及持久化结果
struct Commit {
    applied: bool,
    result: Result<(), StoreError>,
}

/// 切换进行中标记；离开作用域（包括 future 被丢弃）时复位
struct ChangeGuard<'a> {
    state: &'a RwLock<ModeState>,
}

impl Drop for ChangeGuard<'_> {
    fn drop(&mut self) {
        self.state.write().is_changing_mode = false;
    }
}

impl ModeStore {
    /// 创建新的状态管理器
    pub fn new(cfg: &AppConfig, gateway: Arc<dyn PersistenceGateway>, bus: EventBus) -> Self {
        let build = cfg.build.clone();
        let initial_mode = build.pinned().unwrap_or(cfg.store.default_mode);

        Self {
            inner: Arc::new(ModeStoreInner {
                state: RwLock::new(ModeState::new(initial_mode)),
                gateway,
                bus,
                registry: StorageKeyRegistry::new(),
                build,
                write_policy: cfg.store.write_policy,
            }),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub(crate) fn gateway(&self) -> &dyn PersistenceGateway {
        self.inner.gateway.as_ref()
    }

    pub(crate) fn key(&self, key: LogicalKey) -> &'static str {
        self.inner.registry.resolve(key)
    }

    // ------------------------------------------------------------------
    // 动作
    // ------------------------------------------------------------------

    /// 启动时调用：迁移旧键，然后从持久化存储恢复模式、会话和演示标记。
    ///
    /// 可重复调用，每次都重新读取并应用同样的持久化值。
    pub async fn initialize_store(&self) -> Result<MigrationReport, StoreError> {
        let report = run_migration(self.gateway(), &self.inner.registry).await;
        if !report.is_noop() {
            tracing::info!(
                target: "modegate.store",
                migrated = report.migrated.len(),
                superseded = report.superseded.len(),
                failures = report.failures.len(),
                "legacy storage keys migrated"
            );
        }

        let settings_key = self.key(LogicalKey::AppSettings);
        let settings = match self.read_blob(settings_key).await? {
            Some(bytes) => match SettingsRecord::from_bytes(&bytes) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(target: "modegate.store", key = settings_key, error = %e, "ignoring unreadable settings");
                    None
                }
            },
            None => None,
        };

        let auth_key = self.key(LogicalKey::AuthData);
        let user_status = match self.read_blob(auth_key).await? {
            Some(bytes) => match decode_user_status(&bytes) {
                Ok(status) => Some(status),
                Err(e) => {
                    tracing::warn!(target: "modegate.store", key = auth_key, error = %e, "ignoring unreadable auth data");
                    None
                }
            },
            None => None,
        };

        let pinned = self.inner.build.pinned();
        let mut state = self.inner.state.write();
        if let Some(record) = settings {
            match pinned {
                Some(pinned) if pinned != record.app_mode => {
                    tracing::warn!(
                        target: "modegate.store",
                        persisted = %record.app_mode,
                        pinned = %pinned,
                        "persisted mode conflicts with build, keeping pinned mode"
                    );
                    state.current_app_mode = pinned;
                }
                _ => state.current_app_mode = record.app_mode,
            }
            state.is_demo_account = record.is_demo_account;
            state.last_mode_change = record.last_mode_change;
        }
        if let Some(status) = user_status {
            state.current_user_status = status;
        }
        tracing::debug!(
            target: "modegate.store",
            mode = %state.current_app_mode,
            status = %state.coarse_status(),
            demo_account = state.is_demo_account,
            "store initialized"
        );

        Ok(report)
    }

    /// 切换运行模式
    pub async fn set_app_mode(&self, mode: AppMode) -> Result<(), StoreError> {
        self.change_mode("set app mode", |_| Ok(mode)).await
    }

    /// 在同一次写锁内完成：检查进行中标记、计算目标模式、校验构建固定模式，然后置位标记
    async fn change_mode<F>(&self, action: &'static str, target: F) -> Result<(), StoreError>
    where
        F: FnOnce(AppMode) -> Result<AppMode, StoreError>,
    {
        let pinned = self.inner.build.pinned();
        let (previous, mode) = {
            let mut state = self.inner.state.write();
            let checked = if state.is_changing_mode {
                Err(StoreError::UnauthorizedChange)
            } else {
                target(state.current_app_mode)
                    .and_then(|mode| ModeTransition::validate(&state, mode, pinned).map(|_| mode))
            };
            let mode = match checked {
                Ok(mode) => mode,
                Err(e) => {
                    state.last_error = Some(e.kind());
                    drop(state);
                    return Err(self.rejected(action, e));
                }
            };
            state.is_changing_mode = true;
            (state.current_app_mode, mode)
        };
        let _guard = ChangeGuard {
            state: &self.inner.state,
        };

        if previous == mode {
            tracing::debug!(target: "modegate.store", mode = %mode, "mode unchanged");
            return Ok(());
        }

        let now = Utc::now();
        let commit = match self.inner.write_policy {
            WritePolicy::Optimistic => {
                let record = {
                    let mut state = self.inner.state.write();
                    state.current_app_mode = mode;
                    state.last_mode_change = Some(now);
                    SettingsRecord::from_state(&state)
                };
                Commit {
                    applied: true,
                    result: self.write_settings(&record).await,
                }
            }
            WritePolicy::ConfirmFirst => {
                let record = {
                    let state = self.inner.state.read();
                    SettingsRecord {
                        app_mode: mode,
                        is_demo_account: state.is_demo_account,
                        last_mode_change: Some(now),
                    }
                };
                let result = self.write_settings(&record).await;
                let applied = result.is_ok();
                if applied {
                    let mut state = self.inner.state.write();
                    state.current_app_mode = mode;
                    state.last_mode_change = Some(now);
                }
                Commit { applied, result }
            }
        };

        if commit.applied {
            tracing::info!(target: "modegate.store", from = %previous, to = %mode, "app mode changed");
            self.publish(Event::ModeChanged {
                previous_mode: previous,
                new_mode: mode,
                timestamp: now,
            });
        }
        self.finish(commit.result)
    }

    /// 字符串形式的模式切换；先用 `is_valid_app_mode` 校验
    pub async fn set_app_mode_raw(&self, raw: &str) -> Result<(), StoreError> {
        if !is_valid_app_mode(raw) {
            let e = StoreError::InvalidMode(raw.to_string());
            self.inner.state.write().last_error = Some(e.kind());
            return Err(self.rejected("set app mode", e));
        }
        let mode = raw
            .parse::<AppMode>()
            .map_err(StoreError::InvalidMode)?;
        self.set_app_mode(mode).await
    }

    /// demo → live → demo；development 下拒绝
    pub async fn toggle_app_mode(&self) -> Result<(), StoreError> {
        self.change_mode("toggle app mode", ModeTransition::toggle_target).await
    }

    /// 更新会话状态；不发布模式事件
    pub async fn set_user_status(&self, status: UserStatus) -> Result<(), StoreError> {
        let commit = self.commit_user_status(status).await;
        self.finish(commit.result)
    }

    /// 粗粒度状态（authenticated / demo / guest）的字符串形式
    pub async fn set_coarse_status_raw(&self, raw: &str) -> Result<(), StoreError> {
        let coarse = match raw.parse::<CoarseStatus>() {
            Ok(coarse) => coarse,
            Err(msg) => {
                let e = StoreError::Validation(msg);
                self.inner.state.write().last_error = Some(e.kind());
                return Err(self.rejected("set user status", e));
            }
        };
        if self.current_user_status() == coarse {
            return Ok(());
        }
        self.set_user_status(UserStatus::from_coarse(coarse, Utc::now()))
            .await
    }

    /// 演示账号标记；同步，只改内存并发布事件
    pub fn set_demo_account(&self, is_demo_account: bool) {
        self.inner.state.write().is_demo_account = is_demo_account;
        tracing::debug!(target: "modegate.store", is_demo_account, "demo account flag set");
        self.publish(Event::DemoAccountChanged { is_demo_account });
    }

    /// 登录：会话变为 authenticated，并发布 USER_LOGGED_IN
    pub async fn login(&self, user: UserProfile) -> Result<(), StoreError> {
        let commit = self
            .commit_user_status(UserStatus::authenticated(user.id.clone()))
            .await;
        if commit.applied {
            tracing::info!(target: "modegate.store", user = %user.id, demo = user.is_demo, "user logged in");
            self.publish(Event::UserLoggedIn { user });
        }
        self.finish(commit.result)
    }

    /// 登出：会话变为 unauthenticated，并清除演示账号标记（标记变化时同时写入设置）
    pub async fn logout(&self, reason: UnauthReason) -> Result<(), StoreError> {
        let status = UserStatus::unauthenticated(Some(reason));
        let timestamp = status.timestamp();
        let commit = self.commit_user_status(status).await;
        let mut result = commit.result;
        if commit.applied {
            if self.is_demo_account() {
                let cleared = self.commit_demo_account(false).await;
                if cleared.applied {
                    self.publish(Event::DemoAccountChanged {
                        is_demo_account: false,
                    });
                }
                result = result.and(cleared.result);
            }
            tracing::info!(target: "modegate.store", reason = reason.as_str(), "user logged out");
            self.publish(Event::UserLoggedOut { reason, timestamp });
        }
        self.finish(result)
    }

    /// 把当前设置和会话完整写入持久化存储
    pub async fn persist(&self) -> Result<(), StoreError> {
        let (record, status) = {
            let state = self.inner.state.read();
            (
                SettingsRecord::from_state(&state),
                state.current_user_status.clone(),
            )
        };
        let settings = self.write_settings(&record).await;
        let auth = self.write_user_status(&status).await;
        self.finish(settings.and(auth))
    }

    pub fn reset_mode_error(&self) {
        self.inner.state.write().last_error = None;
    }

    // ------------------------------------------------------------------
    // 选择器
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> ModeState {
        self.inner.state.read().clone()
    }

    pub fn current_app_mode(&self) -> AppMode {
        self.inner.state.read().current_app_mode
    }

    pub fn current_user_status(&self) -> CoarseStatus {
        self.inner.state.read().coarse_status()
    }

    pub fn user_status(&self) -> UserStatus {
        self.inner.state.read().current_user_status.clone()
    }

    pub fn is_demo_account(&self) -> bool {
        self.inner.state.read().is_demo_account
    }

    pub fn is_changing_mode(&self) -> bool {
        self.inner.state.read().is_changing_mode
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.inner.state.read().last_error
    }

    pub fn last_mode_change(&self) -> Option<DateTime<Utc>> {
        self.inner.state.read().last_mode_change
    }

    pub fn is_demo_mode(&self) -> bool {
        self.inner.state.read().is_demo_mode()
    }

    pub fn is_live_mode(&self) -> bool {
        self.inner.state.read().is_live_mode()
    }

    pub fn is_development_mode(&self) -> bool {
        self.inner.state.read().is_development_mode()
    }

    pub fn uses_mock_data(&self) -> bool {
        self.inner.state.read().uses_mock_data()
    }

    pub fn can_switch_modes(&self) -> bool {
        ModeTransition::can_switch(&self.inner.state.read(), self.inner.build.pinned())
    }

    pub fn shows_debug_buttons(&self) -> bool {
        !self.inner.build.production
    }

    // ------------------------------------------------------------------
    // 内部
    // ------------------------------------------------------------------

    async fn commit_user_status(&self, status: UserStatus) -> Commit {
        match self.inner.write_policy {
            WritePolicy::Optimistic => {
                {
                    let mut state = self.inner.state.write();
                    state.current_user_status = status.clone();
                    state.last_mode_change = Some(Utc::now());
                }
                Commit {
                    applied: true,
                    result: self.write_user_status(&status).await,
                }
            }
            WritePolicy::ConfirmFirst => {
                let result = self.write_user_status(&status).await;
                let applied = result.is_ok();
                if applied {
                    let mut state = self.inner.state.write();
                    state.current_user_status = status;
                    state.last_mode_change = Some(Utc::now());
                }
                Commit { applied, result }
            }
        }
    }

    async fn commit_demo_account(&self, is_demo_account: bool) -> Commit {
        match self.inner.write_policy {
            WritePolicy::Optimistic => {
                let record = {
                    let mut state = self.inner.state.write();
                    state.is_demo_account = is_demo_account;
                    SettingsRecord::from_state(&state)
                };
                Commit {
                    applied: true,
                    result: self.write_settings(&record).await,
                }
            }
            WritePolicy::ConfirmFirst => {
                let record = SettingsRecord {
                    is_demo_account,
                    ..SettingsRecord::from_state(&self.inner.state.read())
                };
                let result = self.write_settings(&record).await;
                let applied = result.is_ok();
                if applied {
                    self.inner.state.write().is_demo_account = is_demo_account;
                }
                Commit { applied, result }
            }
        }
    }

    async fn write_settings(&self, record: &SettingsRecord) -> Result<(), StoreError> {
        let key = self.key(LogicalKey::AppSettings);
        self.write_blob(key, record.to_bytes()?).await
    }

    async fn write_user_status(&self, status: &UserStatus) -> Result<(), StoreError> {
        let key = self.key(LogicalKey::AuthData);
        self.write_blob(key, encode_user_status(status)?).await
    }

    async fn write_blob(&self, key: &'static str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.inner
            .gateway
            .set(key, bytes)
            .await
            .map_err(|source| StoreError::Persistence { key, source })
    }

    async fn read_blob(&self, key: &'static str) -> Result<Option<Vec<u8>>, StoreError> {
        match self.inner.gateway.get(key).await {
            Ok(v) => Ok(v),
            Err(source) => {
                let e = StoreError::Persistence { key, source };
                self.inner.state.write().last_error = Some(e.kind());
                tracing::warn!(target: "modegate.store", key, error = %e, "reading persisted state failed");
                Err(e)
            }
        }
    }

    fn publish(&self, event: Event) {
        self.inner.bus.publish(&event);
    }

    /// 记录持久化失败；内存状态不回滚
    fn finish(&self, result: Result<(), StoreError>) -> Result<(), StoreError> {
        if let Err(e) = &result {
            self.inner.state.write().last_error = Some(e.kind());
            tracing::warn!(target: "modegate.store", kind = %e.kind(), error = %e, "write-through failed");
        }
        result
    }

    fn rejected(&self, action: &'static str, e: StoreError) -> StoreError {
        tracing::warn!(target: "modegate.store", action, kind = %e.kind(), error = %e, "transition rejected");
        e
    }
}

impl std::fmt::Debug for ModeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeStore")
            .field("state", &*self.inner.state.read())
            .field("gateway", &self.inner.gateway.name())
            .field("write_policy", &self.inner.write_policy)
            .finish()
    }
}
