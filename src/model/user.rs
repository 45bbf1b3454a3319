use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A member or bot of a Notion workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub kind: UserKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserKind {
    Person { email: Option<String> },
    Bot { workspace_name: Option<String> },
    /// Partial user objects only carry an id
    Unknown,
}

impl User {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn is_bot(&self) -> bool {
        matches!(self.kind, UserKind::Bot { .. })
    }

    pub fn is_person(&self) -> bool {
        matches!(self.kind, UserKind::Person { .. })
    }

    pub fn email(&self) -> Option<&str> {
        match &self.kind {
            UserKind::Person { email } => email.as_deref(),
            _ => None,
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User: '{}'>", self.name())
    }
}
