//! Mode and session coordination core.
//!
//! Tracks which operating mode the app runs in (demo / live / development),
//! which kind of session is active, and whether the identity is a demo
//! account. Changes go through [`state::ModeStore`] actions, are written
//! through a [`storage::PersistenceGateway`], and are announced on an
//! [`events::EventBus`].

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod events;
pub mod state;
pub mod status;
pub mod storage;
