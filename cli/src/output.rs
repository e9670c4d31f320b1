use chrono::{DateTime, Utc};
use serde::Serialize;

use modegate_core::api::{AppMode, CoarseStatus, ErrorKind, MigrationReport, ModeStore};

/// What the CLI prints after every command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub mode: AppMode,
    pub user_status: CoarseStatus,
    pub user_id: Option<String>,
    pub is_demo_account: bool,
    pub last_error: Option<ErrorKind>,
    pub last_mode_change: Option<DateTime<Utc>>,
    pub uses_mock_data: bool,
    pub can_switch_modes: bool,
    pub shows_debug_buttons: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationReport>,
}

impl StatusReport {
    pub fn from_store(store: &ModeStore) -> Self {
        let state = store.snapshot();
        Self {
            mode: state.current_app_mode,
            user_status: state.coarse_status(),
            user_id: state
                .current_user_status
                .user_id()
                .map(|id| id.as_str().to_string()),
            is_demo_account: state.is_demo_account,
            last_error: state.last_error,
            last_mode_change: state.last_mode_change,
            uses_mock_data: store.uses_mock_data(),
            can_switch_modes: store.can_switch_modes(),
            shows_debug_buttons: store.shows_debug_buttons(),
            migration: None,
        }
    }

    pub fn with_migration(mut self, report: MigrationReport) -> Self {
        self.migration = Some(report);
        self
    }

    pub fn render_text(&self) -> String {
        let mut lines = vec![
            format!("mode:            {}", self.mode),
            format!(
                "user:            {}{}",
                self.user_status,
                self.user_id
                    .as_deref()
                    .map(|id| format!(" ({id})"))
                    .unwrap_or_default()
            ),
            format!("demo account:    {}", self.is_demo_account),
            format!("mock data:       {}", self.uses_mock_data),
            format!("can switch:      {}", self.can_switch_modes),
            format!("debug buttons:   {}", self.shows_debug_buttons),
        ];
        if let Some(at) = self.last_mode_change {
            lines.push(format!("last change:     {}", at.to_rfc3339()));
        }
        if let Some(err) = self.last_error {
            lines.push(format!("last error:      {err}"));
        }
        if let Some(m) = &self.migration {
            for (legacy, current) in &m.migrated {
                lines.push(format!("migrated:        {legacy} -> {current}"));
            }
            for key in &m.superseded {
                lines.push(format!("superseded:      {key}"));
            }
            for key in &m.retired_present {
                lines.push(format!("retired:         {key}"));
            }
            for f in &m.failures {
                lines.push(format!("failed:          {} ({})", f.key, f.error));
            }
        }
        lines.join("\n")
    }

    pub fn render_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
