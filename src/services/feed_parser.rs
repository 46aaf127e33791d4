use crate::error::FeedError;
use crate::models::{EntityRecord, HighscoreType, PlayerStatus, Roster, RosterEntry, Snapshot};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct RawDocument<E> {
    #[serde(rename = "@timestamp")]
    timestamp: Option<String>,
    #[serde(rename = "@serverId")]
    server_id: Option<String>,
    #[serde(rename = "player", default = "Vec::new")]
    players: Vec<E>,
    // Alliance rankings list `<alliance>` rows with the same attributes.
    #[serde(rename = "alliance", default = "Vec::new")]
    alliances: Vec<E>,
}

#[derive(Debug, Deserialize)]
struct RawRank {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(rename = "@position")]
    position: Option<String>,
    #[serde(rename = "@score")]
    score: Option<String>,
    #[serde(rename = "@ships")]
    ships: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@status")]
    status: Option<String>,
    #[serde(rename = "@alliance")]
    alliance: Option<String>,
}

/// Decode a `highscore.xml` document.
///
/// Root `timestamp` and `serverId` are mandatory. A row missing `id` or
/// `score` is logged and left out; a bad `position` only leaves the rank
/// empty.
pub fn parse_highscore(body: &str, kind: HighscoreType) -> Result<Snapshot, FeedError> {
    let doc: RawDocument<RawRank> =
        quick_xml::de::from_str(body).map_err(|e| FeedError::Parse(e.to_string()))?;
    let (server, timestamp) = root_attributes(doc.timestamp, doc.server_id)?;

    let mut entities = BTreeMap::new();
    for row in doc.players.into_iter().chain(doc.alliances) {
        let Some(id) = row.id else {
            tracing::error!(attribute = "id", "Highscore row without id, skipping");
            continue;
        };
        let Some(score) = row_number(&id, "score", row.score.as_deref()) else {
            tracing::error!(id = %id, "Highscore row without usable score, skipping");
            continue;
        };
        let rank = row_number(&id, "position", row.position.as_deref());
        let ships = kind
            .has_ships()
            .then(|| optional_number(&id, "ships", row.ships.as_deref()));

        entities.insert(id, EntityRecord { rank, score, ships });
    }

    tracing::debug!(
        server = %server,
        timestamp,
        entities = entities.len(),
        kind = %kind,
        "Parsed highscore feed"
    );

    Ok(Snapshot {
        server,
        timestamp,
        entities,
    })
}

/// Decode a `players.xml` document into a name-resolution roster.
pub fn parse_roster(body: &str) -> Result<Roster, FeedError> {
    let doc: RawDocument<RawPlayer> =
        quick_xml::de::from_str(body).map_err(|e| FeedError::Parse(e.to_string()))?;
    let (server, timestamp) = root_attributes(doc.timestamp, doc.server_id)?;

    let mut players = BTreeMap::new();
    for row in doc.players {
        let Some(id) = row.id else {
            tracing::error!(attribute = "id", "Roster row without id, skipping");
            continue;
        };
        let Some(name) = row.name else {
            tracing::error!(attribute = "name", id = %id, "Roster row without name, skipping");
            continue;
        };
        let status = match row.status.as_deref() {
            None => PlayerStatus::Active,
            Some(code) => PlayerStatus::from_code(code).unwrap_or_else(|| {
                tracing::warn!(id = %id, status = code, "Unknown status code, assuming active");
                PlayerStatus::Active
            }),
        };

        players.insert(
            id,
            RosterEntry {
                name,
                status,
                alliance_id: row.alliance.filter(|a| !a.is_empty()),
            },
        );
    }

    Ok(Roster {
        server,
        timestamp,
        players,
    })
}

fn root_attributes(
    timestamp: Option<String>,
    server_id: Option<String>,
) -> Result<(String, i64), FeedError> {
    let timestamp = timestamp.ok_or(FeedError::MissingAttribute("timestamp"))?;
    let timestamp = timestamp
        .trim()
        .parse()
        .map_err(|_| FeedError::Parse(format!("timestamp '{}' is not an integer", timestamp)))?;
    let server = server_id.ok_or(FeedError::MissingAttribute("serverId"))?;
    Ok((server, timestamp))
}

fn row_number<T: std::str::FromStr>(
    id: &str,
    attribute: &'static str,
    raw: Option<&str>,
) -> Option<T> {
    let Some(raw) = raw else {
        tracing::error!(id, attribute, "Attribute missing from feed row");
        return None;
    };
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::error!(id, attribute, value = raw, "Attribute is not a number");
            None
        }
    }
}

fn optional_number(id: &str, attribute: &'static str, raw: Option<&str>) -> u64 {
    match raw.map(|r| r.trim().parse::<u64>()) {
        None => 0,
        Some(Ok(v)) => v,
        Some(Err(_)) => {
            tracing::error!(id, attribute, "Attribute is not a number, using 0");
            0
        }
    }
}
