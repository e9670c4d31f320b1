//! One-shot auto-session bootstrap: seeds the store with the configured demo
//! identity at process start.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::BootstrapConfig;
use crate::error::StoreError;
use crate::state::{DemoSession, ModeStore};
use crate::status::{AppMode, UserId, UserProfile};
use crate::storage::LogicalKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Disabled,
    AlreadyRan,
    Seeded { session_id: String, mode: AppMode },
}

pub struct AutoSession {
    config: BootstrapConfig,
    ran: AtomicBool,
}

impl AutoSession {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            ran: AtomicBool::new(false),
        }
    }

    pub fn demo_user(&self) -> UserProfile {
        UserProfile {
            id: UserId::new(self.config.demo_user_id.clone()),
            display_name: self.config.demo_display_name.clone(),
            email: self.config.demo_email.clone(),
            is_demo: true,
        }
    }

    pub async fn run(&self, store: &ModeStore) -> Result<BootstrapOutcome, StoreError> {
        if !self.config.enabled {
            return Ok(BootstrapOutcome::Disabled);
        }
        if self
            .ran
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(target: "modegate.bootstrap", "auto session already ran");
            return Ok(BootstrapOutcome::AlreadyRan);
        }

        let gateway = store.gateway();
        let session_key = store.key(LogicalKey::DemoSession);
        let reset_key = store.key(LogicalKey::ResetDemoSessionOnStart);

        let reset_requested = match gateway.get(reset_key).await {
            Ok(Some(bytes)) => serde_json::from_slice::<bool>(&bytes).unwrap_or(false),
            Ok(None) => false,
            Err(source) => return Err(StoreError::Persistence { key: reset_key, source }),
        };
        if reset_requested {
            tracing::info!(target: "modegate.bootstrap", "resetting demo session on start");
            for key in [session_key, reset_key] {
                gateway
                    .remove(key)
                    .await
                    .map_err(|source| StoreError::Persistence { key, source })?;
            }
        }

        let user = self.demo_user();
        let session = DemoSession::new(user.clone());
        gateway
            .set(session_key, session.to_bytes()?)
            .await
            .map_err(|source| StoreError::Persistence {
                key: session_key,
                source,
            })?;

        store.set_demo_account(true);

        if !store.is_demo_mode() {
            match store.set_app_mode(AppMode::Demo).await {
                Ok(()) => {}
                Err(e @ StoreError::BuildMismatch { .. }) => {
                    tracing::warn!(target: "modegate.bootstrap", error = %e, "build does not allow demo mode, keeping current mode");
                }
                Err(e) => return Err(e),
            }
        }

        store.login(user).await?;
        store.persist().await?;

        let mode = store.current_app_mode();
        tracing::info!(
            target: "modegate.bootstrap",
            session_id = %session.session_id,
            mode = %mode,
            "demo session seeded"
        );
        Ok(BootstrapOutcome::Seeded {
            session_id: session.session_id,
            mode,
        })
    }
}
