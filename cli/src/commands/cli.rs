use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "modegate", version, about = "Inspect and switch app mode and session state")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Explicit config file. Defaults to ~/.modegate/config.toml, then ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the resulting state as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current mode and session state.
    Status,
    /// Change the app mode.
    Mode {
        #[command(subcommand)]
        action: ModeAction,
    },
    /// Set or clear the demo account flag.
    Demo {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Change the session status.
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Start an authenticated session.
    Login(LoginArgs),
    /// End the session and clear the demo account flag.
    Logout {
        /// logout | expired | initial | demo
        #[arg(long, default_value = "logout")]
        reason: String,
    },
    /// Run the legacy storage key migration.
    Migrate,
    /// Seed the configured demo identity.
    Bootstrap,
    /// Clear the last recorded error.
    ResetError,
}

#[derive(Subcommand, Debug)]
pub enum ModeAction {
    /// demo | live | development
    Set { mode: String },
    /// Cycle demo <-> live.
    Toggle,
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// authenticated | demo | guest
    Set { status: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    pub user_id: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub demo: bool,
}
