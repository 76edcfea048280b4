use std::fmt::{Debug, Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Fresh random id for a new roster entry.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.nickname {
            Some(nickname) => write!(f, "{} ({})", self.name, nickname),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Player {
    pub fn new(name: &str, nickname: Option<&str>) -> Self {
        Self::new_with_id(PlayerId::new(), name, nickname)
    }

    pub fn new_with_id(id: PlayerId, name: &str, nickname: Option<&str>) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            nickname: nickname
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            created_at: Utc::now(),
        }
    }

    /// Nickname when present, otherwise the full name.
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Name shown for a game participant. Ids that no longer resolve against the
/// current roster stay `Unknown` rather than failing the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlayerName {
    Resolved(String),
    Unknown,
}

impl PlayerName {
    pub fn resolve(player: Option<&Player>) -> Self {
        match player {
            Some(player) => PlayerName::Resolved(player.display_name().to_string()),
            None => PlayerName::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PlayerName::Unknown)
    }
}

impl Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerName::Resolved(name) => write!(f, "{name}"),
            PlayerName::Unknown => write!(f, "Unknown"),
        }
    }
}
