use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Account state reported by the players feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Administrator,
    #[default]
    Active,
    Banned,
    Inactive,
    LongInactive,
    Outlaw,
    Vacation,
}

impl PlayerStatus {
    /// Decode a feed status code. Codes combine (`vI`, `vib`), so the most
    /// significant flag wins. Returns `None` if no known flag is present.
    pub fn from_code(code: &str) -> Option<Self> {
        const PRECEDENCE: [(char, PlayerStatus); 6] = [
            ('a', PlayerStatus::Administrator),
            ('b', PlayerStatus::Banned),
            ('o', PlayerStatus::Outlaw),
            ('v', PlayerStatus::Vacation),
            ('I', PlayerStatus::LongInactive),
            ('i', PlayerStatus::Inactive),
        ];

        if code.is_empty() {
            return Some(PlayerStatus::Active);
        }
        PRECEDENCE
            .iter()
            .find(|(flag, _)| code.contains(*flag))
            .map(|(_, status)| *status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default)]
    pub status: PlayerStatus,
    #[serde(default)]
    pub alliance_id: Option<String>,
}

/// Name-resolution view over the players feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub server: String,
    pub timestamp: i64,
    pub players: BTreeMap<String, RosterEntry>,
}

impl Roster {
    pub fn name_from_id(&self, id: &str) -> Option<&str> {
        self.players.get(id).map(|p| p.name.as_str())
    }

    /// Linear scan; names are not indexed.
    pub fn id_from_name(&self, name: &str) -> Option<&str> {
        self.players
            .iter()
            .find(|(_, p)| p.name == name)
            .map(|(id, _)| id.as_str())
    }

    pub fn status(&self, id: &str) -> Option<PlayerStatus> {
        self.players.get(id).map(|p| p.status)
    }

    /// `Some(None)` means the player exists but has no alliance.
    pub fn alliance(&self, id: &str) -> Option<Option<&str>> {
        self.players.get(id).map(|p| p.alliance_id.as_deref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.players.values().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
