//! Status model: the closed sets of app modes and session statuses.

pub mod mode;
pub mod user;

pub use mode::{is_valid_app_mode, AppMode};
pub use user::{CoarseStatus, UnauthReason, UserId, UserProfile, UserStatus};
