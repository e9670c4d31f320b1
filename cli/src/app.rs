use std::sync::Arc;

use modegate_core::api::{
    AppConfig, AutoSession, BootstrapOutcome, Event, EventBus, EventKind, ModeStore,
    PersistenceGateway, StoreError, UnauthReason, UserId, UserProfile,
};

use crate::commands::cli::{Commands, LoginArgs, ModeAction, Switch, UserAction};
use crate::error::CliError;
use crate::output::StatusReport;

/// Bus with a tracing subscriber on every event kind.
pub fn logging_bus() -> EventBus {
    let bus = EventBus::new();
    for kind in EventKind::ALL {
        // Lives for the whole process; never unsubscribed.
        let _ = bus.subscribe(kind, |event: &Event| {
            tracing::info!(
                target: "modegate.events",
                kind = event.kind().as_str(),
                payload = %serde_json::to_string(event).unwrap_or_default(),
                "event"
            );
            Ok(())
        });
    }
    bus
}

pub async fn run(
    cfg: AppConfig,
    gateway: Arc<dyn PersistenceGateway>,
    command: Commands,
) -> Result<StatusReport, CliError> {
    let store = ModeStore::new(&cfg, gateway, logging_bus());
    let migration = store.initialize_store().await?;

    let mut report_migration = None;
    match command {
        Commands::Status => {}
        Commands::Mode { action } => match action {
            ModeAction::Set { mode } => store.set_app_mode_raw(&mode).await?,
            ModeAction::Toggle => store.toggle_app_mode().await?,
        },
        Commands::Demo { state } => {
            store.set_demo_account(state == Switch::On);
            store.persist().await?;
        }
        Commands::User { action } => match action {
            UserAction::Set { status } => store.set_coarse_status_raw(&status).await?,
        },
        Commands::Login(args) => store.login(profile_from(args)).await?,
        Commands::Logout { reason } => {
            let reason: UnauthReason = reason.parse().map_err(StoreError::Validation)?;
            store.logout(reason).await?;
        }
        Commands::Migrate => report_migration = Some(migration),
        Commands::Bootstrap => {
            let mut bootstrap = cfg.bootstrap.clone();
            bootstrap.enabled = true;
            match AutoSession::new(bootstrap).run(&store).await? {
                BootstrapOutcome::Seeded { session_id, mode } => {
                    tracing::info!(session_id = %session_id, mode = %mode, "demo session seeded");
                }
                other => tracing::debug!(outcome = ?other, "bootstrap skipped"),
            }
        }
        Commands::ResetError => store.reset_mode_error(),
    }

    let report = StatusReport::from_store(&store);
    Ok(match report_migration {
        Some(m) => report.with_migration(m),
        None => report,
    })
}

fn profile_from(args: LoginArgs) -> UserProfile {
    UserProfile {
        id: UserId::new(args.user_id),
        display_name: args.name,
        email: args.email,
        is_demo: args.demo,
    }
}
