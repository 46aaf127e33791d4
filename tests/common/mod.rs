#![allow(dead_code)]

use async_trait::async_trait;
use highscore_bot::config::BotConfig;
use highscore_bot::error::{DeliveryError, FeedError};
use highscore_bot::models::{
    Category, EntityRecord, HighscoreType, PlayerStatus, Roster, RosterEntry, Snapshot,
};
use highscore_bot::services::feed_service::FeedSource;
use highscore_bot::services::notify_service::Notifier;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn test_config(baseline_path: &Path) -> BotConfig {
    BotConfig {
        bot_name: "test-bot".to_string(),
        server_number: 123,
        community: "fr".to_string(),
        webhook_url: "http://127.0.0.1:1/hook".to_string(),
        category: Category::Players,
        highscore_type: HighscoreType::MilitaryLost,
        baseline_path: baseline_path.to_path_buf(),
        code_syntax: String::new(),
        payload_limit: 2000,
        wake_interval_secs: 60,
        min_check_interval_secs: 3600,
        max_attempts: 6,
        retry_delay_secs: 0,
        feed_base_url: None,
        log_level: "error".to_string(),
        log_file: None,
    }
}

pub fn snapshot(timestamp: i64, scores: &[(&str, i64)]) -> Snapshot {
    let entities = scores
        .iter()
        .enumerate()
        .map(|(i, (id, score))| {
            (
                id.to_string(),
                EntityRecord {
                    rank: Some(i as u32 + 1),
                    score: *score,
                    ships: None,
                },
            )
        })
        .collect();
    Snapshot {
        server: "fr123".to_string(),
        timestamp,
        entities,
    }
}

pub fn roster(names: &[(&str, &str)]) -> Roster {
    let players: BTreeMap<String, RosterEntry> = names
        .iter()
        .map(|(id, name)| {
            (
                id.to_string(),
                RosterEntry {
                    name: name.to_string(),
                    status: PlayerStatus::Active,
                    alliance_id: None,
                },
            )
        })
        .collect();
    Roster {
        server: "fr123".to_string(),
        timestamp: 0,
        players,
    }
}

/// Feed that serves canned results and counts calls.
#[derive(Clone)]
pub struct FakeFeed {
    pub highscore: Option<Snapshot>,
    pub roster: Option<Roster>,
    pub highscore_calls: Arc<AtomicUsize>,
    pub roster_calls: Arc<AtomicUsize>,
}

impl FakeFeed {
    pub fn new(highscore: Option<Snapshot>, roster: Option<Roster>) -> Self {
        Self {
            highscore,
            roster,
            highscore_calls: Arc::new(AtomicUsize::new(0)),
            roster_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl FeedSource for FakeFeed {
    async fn fetch_highscore(
        &self,
        _category: Category,
        _kind: HighscoreType,
    ) -> Result<Snapshot, FeedError> {
        self.highscore_calls.fetch_add(1, Ordering::SeqCst);
        self.highscore
            .clone()
            .ok_or(FeedError::FetchExhausted { attempts: 6 })
    }

    async fn fetch_roster(&self) -> Result<Roster, FeedError> {
        self.roster_calls.fetch_add(1, Ordering::SeqCst);
        self.roster
            .clone()
            .ok_or(FeedError::FetchExhausted { attempts: 6 })
    }
}

/// Notifier that records payloads, or rejects every attempt.
#[derive(Clone)]
pub struct FakeNotifier {
    pub fail: bool,
    pub attempts: Arc<AtomicUsize>,
    pub sent: Arc<Mutex<Vec<String>>>,
}

impl FakeNotifier {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            attempts: Arc::new(AtomicUsize::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, payload: &str) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DeliveryError::Rejected(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
            ));
        }
        self.sent.lock().unwrap().push(payload.to_string());
        Ok(())
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
