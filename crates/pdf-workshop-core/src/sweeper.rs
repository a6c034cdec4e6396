//! Expiry sweep for the storage directory.
//!
//! Documents are transient: anything not modified within the retention
//! window is deleted. The sweep runs as an explicit background task owned by
//! whoever calls [`Sweeper::spawn`], and stops when its handle is stopped or
//! dropped.

use std::fs::DirEntry;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::RetentionConfig;
use crate::error::Result;

/// Outcome of one sweep cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub deleted: usize,
    /// Entries that could not be inspected or deleted (logged, not fatal)
    pub failed: usize,
}

/// Periodic deletion of storage entries idle beyond a retention threshold.
#[derive(Debug, Clone)]
pub struct Sweeper {
    dir: PathBuf,
    retention: Duration,
    interval: Duration,
}

impl Sweeper {
    pub fn new(dir: impl Into<PathBuf>, retention: Duration, interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            retention,
            interval,
        }
    }

    pub fn from_config(dir: impl Into<PathBuf>, config: &RetentionConfig) -> Self {
        Self::new(dir, config.max_age(), config.sweep_interval())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run one cycle against the current clock.
    pub fn sweep(&self) -> Result<SweepReport> {
        self.sweep_at(SystemTime::now())
    }

    /// Run one cycle as if the current time were `now`.
    ///
    /// Failing to list the directory fails the cycle. Failures on single
    /// entries are logged and counted, and the cycle moves on.
    pub fn sweep_at(&self, now: SystemTime) -> Result<SweepReport> {
        debug!("Sweeping {} for documents idle over {:?}", self.dir.display(), self.retention);

        let mut report = SweepReport::default();
        for entry in std::fs::read_dir(&self.dir)? {
            report.scanned += 1;

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Could not read entry in {}: {}", self.dir.display(), e);
                    report.failed += 1;
                    continue;
                }
            };
            let path = entry.path();

            match self.is_expired(&entry, now) {
                Ok(false) => {}
                Ok(true) => match std::fs::remove_file(&path) {
                    Ok(()) => {
                        info!("Deleted old file: {}", path.display());
                        report.deleted += 1;
                    }
                    // Already gone
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => {
                        warn!("Could not delete {}: {}", path.display(), e);
                        report.failed += 1;
                    }
                },
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("Could not inspect {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    fn is_expired(&self, entry: &DirEntry, now: SystemTime) -> io::Result<bool> {
        let meta = entry.metadata()?;
        if !meta.is_file() {
            return Ok(false);
        }
        let modified = meta.modified()?;
        // A timestamp in the future counts as fresh
        Ok(now
            .duration_since(modified)
            .is_ok_and(|idle| idle > self.retention))
    }

    /// Start the recurring sweep on the tokio runtime.
    ///
    /// The first cycle runs one interval after the call.
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let period = self.interval.max(Duration::from_millis(1));
        let sweeper = Arc::new(self);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    // Explicit stop, or the handle was dropped
                    _ = shutdown_rx.changed() => break,
                }

                let cycle = Arc::clone(&sweeper);
                match tokio::task::spawn_blocking(move || cycle.sweep()).await {
                    Ok(Ok(report)) => info!(
                        "Completed expiry sweep: {} scanned, {} deleted, {} failed",
                        report.scanned, report.deleted, report.failed
                    ),
                    Ok(Err(e)) => error!("Error deleting old PDF files: {}", e),
                    Err(e) => error!("Expiry sweep task failed: {}", e),
                }
            }

            debug!("Sweeper for {} stopped", sweeper.dir.display());
        });

        SweeperHandle { shutdown, task }
    }
}

/// Handle to a running sweep task.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the task to stop and wait for it to finish its current cycle.
    pub async fn stop(self) -> Result<()> {
        self.shutdown.send_replace(true);
        self.task.await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(60 * 60);

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        path
    }

    #[test]
    fn test_deletes_entries_past_retention() {
        let dir = tempfile::tempdir().unwrap();
        let old = touch(dir.path(), "old.pdf");
        let sweeper = Sweeper::new(dir.path(), HOUR, HOUR);

        let report = sweeper.sweep_at(SystemTime::now() + 2 * HOUR).unwrap();

        assert_eq!(report.deleted, 1);
        assert!(!old.exists());
    }

    #[test]
    fn test_keeps_recent_entries() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = touch(dir.path(), "fresh.pdf");
        let sweeper = Sweeper::new(dir.path(), HOUR, HOUR);

        let report = sweeper.sweep().unwrap();

        assert_eq!(report, SweepReport { scanned: 1, deleted: 0, failed: 0 });
        assert!(fresh.exists());
    }

    #[test]
    fn test_uses_modification_time() {
        let dir = tempfile::tempdir().unwrap();
        let stale = touch(dir.path(), "stale.pdf");
        let fresh = touch(dir.path(), "fresh.pdf");

        let two_hours_ago = SystemTime::now() - 2 * HOUR;
        std::fs::File::options()
            .write(true)
            .open(&stale)
            .unwrap()
            .set_modified(two_hours_ago)
            .unwrap();

        let report = Sweeper::new(dir.path(), HOUR, HOUR).sweep().unwrap();

        assert_eq!(report.deleted, 1);
        assert!(!stale.exists());
        assert!(fresh.exists());
    }

    #[test]
    fn test_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let report = Sweeper::new(dir.path(), HOUR, HOUR)
            .sweep_at(SystemTime::now() + 2 * HOUR)
            .unwrap();

        assert_eq!(report.deleted, 0);
        assert_eq!(report.failed, 0);
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_missing_directory_fails_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let sweeper = Sweeper::new(dir.path().join("gone"), HOUR, HOUR);
        assert!(sweeper.sweep().is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_spawned_sweeper_reclaims_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "doc.pdf");
        tokio::time::sleep(Duration::from_millis(20)).await;

        let handle = Sweeper::new(dir.path(), Duration::ZERO, Duration::from_millis(25)).spawn();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while path.exists() && std::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!path.exists(), "sweeper never reclaimed the file");

        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_before_first_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "doc.pdf");

        let handle = Sweeper::new(dir.path(), Duration::ZERO, HOUR).spawn();
        handle.stop().await.unwrap();

        assert!(path.exists());
    }
}
