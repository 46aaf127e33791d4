use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One ranked entry of a highscore feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Absent when the feed row carried no usable position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    pub score: i64,
    /// Only populated for the military ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ships: Option<u64>,
}

impl EntityRecord {
    pub fn ship_count(&self) -> u64 {
        self.ships.unwrap_or(0)
    }
}

/// A single immutable capture of a highscore feed.
///
/// Serializes to the flat baseline layout:
/// `{"server": "fr123", "timestamp": 1700000000, "<id>": {"rank": .., "score": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub server: String,
    pub timestamp: i64,
    #[serde(flatten)]
    pub entities: BTreeMap<String, EntityRecord>,
}

impl Snapshot {
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn server_id(&self) -> Option<ServerId> {
        self.server.parse().ok()
    }

    pub fn server_community(&self) -> Option<String> {
        self.server_id().map(|id| id.community)
    }

    pub fn server_number(&self) -> Option<u32> {
        self.server_id().map(|id| id.number)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&EntityRecord> {
        self.entities.get(id)
    }

    pub fn score(&self, id: &str) -> Option<i64> {
        self.get(id).map(|e| e.score)
    }

    pub fn rank(&self, id: &str) -> Option<u32> {
        self.get(id).and_then(|e| e.rank)
    }

    pub fn ships(&self, id: &str) -> Option<u64> {
        self.get(id).map(EntityRecord::ship_count)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Game server identifier such as `fr123`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerId {
    pub community: String,
    pub number: u32,
}

impl FromStr for ServerId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (community, digits) = s.split_at(split);
        if community.is_empty() {
            return Err(format!("'{}' has no community prefix", s));
        }
        let number = digits
            .parse()
            .map_err(|_| format!("'{}' has no numeric server part", s))?;
        Ok(Self {
            community: community.to_string(),
            number,
        })
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.community, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_id_splits_community_and_number() {
        let id: ServerId = "fr123".parse().unwrap();
        assert_eq!(id.community, "fr");
        assert_eq!(id.number, 123);
        assert_eq!(id.to_string(), "fr123");

        assert!("123".parse::<ServerId>().is_err());
        assert!("fr".parse::<ServerId>().is_err());
        assert!("fr12x".parse::<ServerId>().is_err());
    }

    #[test]
    fn baseline_layout_is_flat() {
        let raw = r#"{"server": "en150", "timestamp": 1700000000,
            "100": {"rank": 1, "score": 1000000000000},
            "200": {"rank": 2, "score": 5, "ships": 42}}"#;
        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();

        assert_eq!(snapshot.timestamp(), 1_700_000_000);
        assert_eq!(snapshot.server_community().as_deref(), Some("en"));
        assert_eq!(snapshot.server_number(), Some(150));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.score("100"), Some(1_000_000_000_000));
        assert_eq!(snapshot.ships("100"), Some(0));
        assert_eq!(snapshot.ships("200"), Some(42));
        assert_eq!(snapshot.rank("100"), Some(1));
        assert_eq!(snapshot.rank("300"), None);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["server"], "en150");
        assert_eq!(value["100"]["score"], 1_000_000_000_000i64);
        assert!(value["100"].get("ships").is_none());
    }

    #[test]
    fn baseline_entry_without_rank() {
        let raw = r#"{"server": "fr1", "timestamp": 5, "7": {"score": 100}}"#;
        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.score("7"), Some(100));
        assert_eq!(snapshot.rank("7"), None);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value["7"].get("rank").is_none());
    }
}
