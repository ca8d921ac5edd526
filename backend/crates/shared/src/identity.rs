//! Verified caller identity
//!
//! Produced by the auth crate once a bearer token checks out, attached to
//! request extensions, and consumed by any handler that acts on behalf of
//! a user.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// A signed-in user as seen by the rest of the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: UserId::new(uid),
            email: None,
            is_anonymous: false,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn anonymous(uid: impl Into<String>) -> Self {
        Self {
            is_anonymous: true,
            ..Self::new(uid)
        }
    }
}
