pub mod highscore;
pub mod roster;
pub mod snapshot;

pub use highscore::{Category, HighscoreType};
pub use roster::{PlayerStatus, Roster, RosterEntry};
pub use snapshot::{EntityRecord, ServerId, Snapshot};
