//! Background sweep of stale working files.
//!
//! Every entry in the audio and clips directories whose modification time is
//! older than the configured age is deleted. Failures are per entry: a file
//! that vanished concurrently or cannot be removed is logged and skipped.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::JanitorConfig;
use crate::metrics;

/// Periodic cleanup of the working directories.
pub struct Janitor {
    dirs: Vec<PathBuf>,
    config: JanitorConfig,
}

impl Janitor {
    pub fn new(dirs: Vec<PathBuf>, config: JanitorConfig) -> Self {
        Self { dirs, config }
    }

    /// Run the sweep loop forever. Spawn this as a background task.
    ///
    /// The first sweep happens one interval after start.
    pub async fn run(self) {
        if !self.config.enabled {
            info!("Janitor is disabled");
            return;
        }

        info!(
            interval_secs = self.config.interval.as_secs(),
            max_age_secs = self.config.max_age.as_secs(),
            "Starting janitor"
        );

        let mut ticker = interval_at(Instant::now() + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let removed = self.sweep_once(SystemTime::now()).await;
            if removed > 0 {
                info!("Janitor removed {} stale entries", removed);
            }
        }
    }

    /// Sweep every directory once, treating `now` as the current time.
    ///
    /// Returns the number of entries removed.
    pub async fn sweep_once(&self, now: SystemTime) -> usize {
        let mut removed = 0;
        for dir in &self.dirs {
            removed += self.sweep_dir(dir, now).await;
        }
        metrics::record_janitor_removed(removed as u64);
        removed
    }

    async fn sweep_dir(&self, dir: &Path, now: SystemTime) -> usize {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!(dir = %dir.display(), "Janitor cannot read directory: {}", e);
                return 0;
            }
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %dir.display(), "Janitor stopped listing directory: {}", e);
                    break;
                }
            };

            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    debug!(path = %path.display(), "Skipping entry: {}", e);
                    continue;
                }
            };

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or(Duration::ZERO);
            if age <= self.config.max_age {
                continue;
            }

            let result = if metadata.is_dir() {
                tokio::fs::remove_dir_all(&path).await
            } else {
                tokio::fs::remove_file(&path).await
            };

            match result {
                Ok(()) => {
                    debug!(path = %path.display(), age_secs = age.as_secs(), "Removed stale entry");
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), "Failed to remove stale entry: {}", e),
            }
        }

        removed
    }
}
