use crate::config::RetryPolicy;
use crate::error::FeedError;
use crate::models::{Category, HighscoreType, Roster, Snapshot};
use crate::services::feed_parser;
use crate::services::retry::with_retry;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const HIGHSCORE_TIMEOUT: Duration = Duration::from_secs(10);
const ROSTER_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of highscore snapshots and the roster used to name entities.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_highscore(
        &self,
        category: Category,
        kind: HighscoreType,
    ) -> Result<Snapshot, FeedError>;

    async fn fetch_roster(&self) -> Result<Roster, FeedError>;
}

/// Public API base for a game server.
pub fn default_base_url(server_number: u32, community: &str) -> String {
    format!("https://s{}-{}.ogame.gameforge.com", server_number, community)
}

/// HTTP client for one game server's public statistics API.
pub struct FeedClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>, retry: RetryPolicy) -> Result<Self, FeedError> {
        let client = Client::builder().redirect(Policy::none()).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        })
    }

    pub fn for_server(
        server_number: u32,
        community: &str,
        retry: RetryPolicy,
    ) -> Result<Self, FeedError> {
        Self::new(default_base_url(server_number, community), retry)
    }

    pub fn highscore_url(&self, category: Category, kind: HighscoreType) -> String {
        format!(
            "{}/api/highscore.xml?category={}&type={}",
            self.base_url,
            category.code(),
            kind.code()
        )
    }

    pub fn roster_url(&self) -> String {
        format!("{}/api/players.xml", self.base_url)
    }

    async fn get_once(&self, url: &str, timeout: Duration) -> Result<String, FeedError> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FeedError::HttpStatus(status));
        }
        Ok(response.text().await?)
    }

    async fn get_with_retry(&self, url: &str, timeout: Duration) -> Result<String, FeedError> {
        let body = with_retry(self.retry, url, |_| self.get_once(url, timeout)).await;
        body.ok_or_else(|| {
            let attempts = self.retry.max_attempts.max(1);
            tracing::error!(
                url,
                attempts,
                "Reached maximum attempts limit, unable to obtain feed"
            );
            FeedError::FetchExhausted { attempts }
        })
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch_highscore(
        &self,
        category: Category,
        kind: HighscoreType,
    ) -> Result<Snapshot, FeedError> {
        let url = self.highscore_url(category, kind);
        let body = self.get_with_retry(&url, HIGHSCORE_TIMEOUT).await?;
        feed_parser::parse_highscore(&body, kind)
    }

    async fn fetch_roster(&self) -> Result<Roster, FeedError> {
        let url = self.roster_url();
        let body = self.get_with_retry(&url, ROSTER_TIMEOUT).await?;
        feed_parser::parse_roster(&body)
    }
}
