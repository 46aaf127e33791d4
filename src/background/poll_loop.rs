use crate::config::BotConfig;
use crate::error::BaselineError;
use crate::models::{Category, Snapshot};
use crate::persistence::baseline::{load_baseline, save_baseline};
use crate::services::diff_service::{diff, DiffOutcome};
use crate::services::feed_service::FeedSource;
use crate::services::notify_service::{dispatch, Notifier};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

/// How a single check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No baseline existed; the current feed was stored without notifying.
    Initialized,
    /// The baseline is younger than the minimum check interval.
    NotDue,
    FetchFailed,
    /// The feed has not advanced since the baseline.
    NoChange,
    /// The feed advanced but no score moved; baseline advanced silently.
    EmptyReport,
    Delivered,
    /// Baseline left untouched, the next cycle recomputes the same diff.
    DeliveryFailed,
    BaselineFailed,
}

/// Fetch, diff, notify, persist. One cycle at a time, forever.
pub struct PollLoop<F, N> {
    config: Arc<BotConfig>,
    feed: F,
    notifier: N,
}

impl<F: FeedSource, N: Notifier> PollLoop<F, N> {
    pub fn new(config: Arc<BotConfig>, feed: F, notifier: N) -> Self {
        Self {
            config,
            feed,
            notifier,
        }
    }

    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let interval = self.config.wake_interval();
        tracing::info!(
            bot = %self.config.bot_name,
            server = %self.config.server_label(),
            category = ?self.config.category,
            kind = %self.config.highscore_type,
            "Starting poll loop"
        );

        if let Ok(None) = load_baseline(&self.config.baseline_path) {
            let outcome = self.initialize().await;
            tracing::debug!(?outcome, "Startup initialization finished");
        }

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.changed() => {
                    tracing::info!("Poll loop shutting down");
                    return;
                }
            }

            let outcome = self.check_once(Utc::now().timestamp()).await;
            tracing::debug!(?outcome, "Check finished");
        }
    }

    /// One wake-up: load the baseline and run a cycle if it is due at `now`.
    pub async fn check_once(&self, now: i64) -> CycleOutcome {
        let baseline = match load_baseline(&self.config.baseline_path) {
            Ok(Some(baseline)) => baseline,
            Ok(None) => return self.initialize().await,
            Err(e) => {
                tracing::error!(
                    path = %self.config.baseline_path.display(),
                    "Failed to read baseline: {}",
                    e
                );
                return CycleOutcome::BaselineFailed;
            }
        };

        let due_at = baseline
            .timestamp
            .saturating_add(self.config.min_check_interval_secs as i64);
        if now < due_at {
            return CycleOutcome::NotDue;
        }

        self.run_cycle(&baseline).await
    }

    /// Compare a fresh feed against `baseline` and report the differences.
    pub async fn run_cycle(&self, baseline: &Snapshot) -> CycleOutcome {
        let current = match self
            .feed
            .fetch_highscore(self.config.category, self.config.highscore_type)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("No snapshot obtained, skipping cycle: {}", e);
                return CycleOutcome::FetchFailed;
            }
        };

        if current.timestamp == baseline.timestamp {
            tracing::info!(
                timestamp = current.timestamp,
                "Timestamps match, feed not updated"
            );
            return CycleOutcome::NoChange;
        }
        tracing::info!(
            old = baseline.timestamp,
            new = current.timestamp,
            "Timestamps differ, computing differences"
        );

        let roster = match self.config.category {
            Category::Players => match self.feed.fetch_roster().await {
                Ok(roster) => Some(roster),
                Err(e) => {
                    tracing::warn!("Roster unavailable, showing raw ids: {}", e);
                    None
                }
            },
            Category::Alliances => None,
        };

        let report = match diff(baseline, &current, roster.as_ref()) {
            DiffOutcome::NoChange => return CycleOutcome::NoChange,
            DiffOutcome::Report(report) => report,
        };

        if report.is_empty() {
            tracing::info!("No score changed, advancing baseline without notifying");
            return match self.persist(&current) {
                Ok(()) => CycleOutcome::EmptyReport,
                Err(_) => CycleOutcome::BaselineFailed,
            };
        }

        let payload = report.render(&self.config.code_syntax, self.config.payload_limit);
        tracing::debug!(lines = report.lines.len(), "Report rendered");

        match dispatch(&self.notifier, &payload, self.config.retry_policy()).await {
            Ok(()) => match self.persist(&current) {
                Ok(()) => CycleOutcome::Delivered,
                Err(_) => CycleOutcome::BaselineFailed,
            },
            Err(_) => CycleOutcome::DeliveryFailed,
        }
    }

    async fn initialize(&self) -> CycleOutcome {
        tracing::info!(
            path = %self.config.baseline_path.display(),
            "No usable baseline, initializing"
        );
        match self
            .feed
            .fetch_highscore(self.config.category, self.config.highscore_type)
            .await
        {
            Ok(snapshot) => match self.persist(&snapshot) {
                Ok(()) => {
                    tracing::info!(timestamp = snapshot.timestamp, "Initialization complete");
                    CycleOutcome::Initialized
                }
                Err(_) => CycleOutcome::BaselineFailed,
            },
            Err(e) => {
                tracing::error!("Initialization failed: {}", e);
                CycleOutcome::FetchFailed
            }
        }
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<(), BaselineError> {
        let path = &self.config.baseline_path;
        tracing::info!(path = %path.display(), timestamp = snapshot.timestamp, "Updating baseline");
        save_baseline(path, snapshot).map_err(|e| {
            tracing::error!(path = %path.display(), "Failed to write baseline: {}", e);
            e
        })
    }
}
