//! 演示会话记录

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::status::UserProfile;

/// `app:session:demo` 下保存的演示会话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoSession {
    /// 会话唯一 ID
    pub session_id: String,
    /// 演示身份
    pub user: UserProfile,
    /// 创建时间
    pub started_at: DateTime<Utc>,
}

impl DemoSession {
    /// 创建新会话
    pub fn new(user: UserProfile) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            user,
            started_at: Utc::now(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::UserId;

    fn demo_user() -> UserProfile {
        UserProfile {
            id: UserId::new("demo-user"),
            display_name: "Demo User".into(),
            email: None,
            is_demo: true,
        }
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = DemoSession::new(demo_user());
        let b = DemoSession::new(demo_user());
        assert_ne!(a.session_id, b.session_id);
        assert!(Uuid::parse_str(&a.session_id).is_ok());
    }

    #[test]
    fn test_session_blob() {
        let session = DemoSession::new(demo_user());
        let restored = DemoSession::from_bytes(&session.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, session);
    }
}
