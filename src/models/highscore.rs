use serde::{Deserialize, Serialize};
use std::fmt;

/// Which ranking table a highscore feed lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Players,
    Alliances,
}

impl Category {
    pub fn code(self) -> u8 {
        match self {
            Category::Players => 1,
            Category::Alliances => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Category::Players),
            2 => Some(Category::Alliances),
            _ => None,
        }
    }
}

/// Ranking dimension of a highscore feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighscoreType {
    General,
    Economy,
    Technology,
    Military,
    MilitaryLost,
    MilitaryBuilt,
    MilitaryDestroyed,
    Honor,
    Lifeforms,
    LifeformsEconomy,
    LifeformsTechnology,
    LifeformsDiscovery,
}

impl HighscoreType {
    const ALL: [HighscoreType; 12] = [
        HighscoreType::General,
        HighscoreType::Economy,
        HighscoreType::Technology,
        HighscoreType::Military,
        HighscoreType::MilitaryLost,
        HighscoreType::MilitaryBuilt,
        HighscoreType::MilitaryDestroyed,
        HighscoreType::Honor,
        HighscoreType::Lifeforms,
        HighscoreType::LifeformsEconomy,
        HighscoreType::LifeformsTechnology,
        HighscoreType::LifeformsDiscovery,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Only the military ranking carries a ship count per entry.
    pub fn has_ships(self) -> bool {
        self == HighscoreType::Military
    }
}

impl fmt::Display for HighscoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HighscoreType::General => "general",
            HighscoreType::Economy => "economy",
            HighscoreType::Technology => "technology",
            HighscoreType::Military => "military",
            HighscoreType::MilitaryLost => "military-lost",
            HighscoreType::MilitaryBuilt => "military-built",
            HighscoreType::MilitaryDestroyed => "military-destroyed",
            HighscoreType::Honor => "honor",
            HighscoreType::Lifeforms => "lifeforms",
            HighscoreType::LifeformsEconomy => "lifeforms-economy",
            HighscoreType::LifeformsTechnology => "lifeforms-technology",
            HighscoreType::LifeformsDiscovery => "lifeforms-discovery",
        };
        f.write_str(name)
    }
}
