//! Scheduled invalidation of the freshness cache.

use crate::cache::TargetCache;
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// When the cache is wiped.
#[derive(Debug, Clone)]
pub enum ResetSchedule {
    /// At every midnight in the given time zone. The next boundary is
    /// recomputed on each cycle, so DST transitions do not shift it.
    LocalMidnight(TimeZone),
    /// At a fixed period after the scheduler starts.
    Every(Duration),
}

impl ResetSchedule {
    /// Midnight in the system time zone.
    pub fn system_midnight() -> Self {
        ResetSchedule::LocalMidnight(TimeZone::system())
    }

    /// How long to wait, from now, before the next reset.
    pub fn next_delay(&self) -> Duration {
        match self {
            ResetSchedule::LocalMidnight(tz) => {
                let now = Timestamp::now().to_zoned(tz.clone());
                duration_until_next_midnight(&now).unwrap_or_else(|e| {
                    warn!(error = %e, "Cannot compute next midnight, waiting one day");
                    ONE_DAY
                })
            }
            ResetSchedule::Every(period) => *period,
        }
    }
}

impl Default for ResetSchedule {
    fn default() -> Self {
        Self::system_midnight()
    }
}

/// Time left from `now` until the start of the next day in `now`'s zone.
pub fn duration_until_next_midnight(now: &Zoned) -> Result<Duration, jiff::Error> {
    let next = now.tomorrow()?.start_of_day()?;
    let wait = next.timestamp().duration_since(now.timestamp());
    Ok(Duration::try_from(wait).unwrap_or(Duration::ZERO))
}

/// Background task that wipes a cache on a [`ResetSchedule`].
#[derive(Debug)]
pub struct ResetScheduler<C> {
    cache: C,
    schedule: ResetSchedule,
}

impl<C: TargetCache> ResetScheduler<C> {
    pub fn new(cache: C, schedule: ResetSchedule) -> Self {
        Self { cache, schedule }
    }

    /// Starts the reset loop on the current tokio runtime.
    pub fn spawn(self) -> ResetHandle {
        let (shutdown, signal) = watch::channel(false);
        let task = tokio::spawn(self.run(signal));
        ResetHandle {
            shutdown,
            task: Some(task),
        }
    }

    async fn run(self, mut signal: watch::Receiver<bool>) {
        loop {
            let wait = self.schedule.next_delay();
            debug!(wait_secs = wait.as_secs(), "Next cache reset scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    let cleared = self.cache.reset_all();
                    info!(cleared, "Freshness cache reset");
                }
                // Fires on an explicit shutdown and when the handle is dropped.
                _ = signal.changed() => {
                    debug!("Cache reset scheduler stopped");
                    return;
                }
            }
        }
    }
}

/// Handle to a running [`ResetScheduler`]. Dropping it stops the loop.
#[derive(Debug)]
pub struct ResetHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ResetHandle {
    /// Stops the loop and waits for the task to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Cache reset task ended abnormally");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FreshnessCache;
    use jiff::civil::date;
    use tripgate_core::NormalizedHost;

    fn zoned(tz: &str, y: i16, m: i8, d: i8, h: i8, min: i8) -> Zoned {
        date(y, m, d).at(h, min, 0, 0).in_tz(tz).unwrap()
    }

    #[test]
    fn midnight_from_late_evening() {
        let now = zoned("UTC", 2024, 3, 5, 23, 30);
        let wait = duration_until_next_midnight(&now).unwrap();
        assert_eq!(wait, Duration::from_secs(30 * 60));
    }

    #[test]
    fn midnight_from_exact_midnight_is_a_full_day() {
        let now = zoned("UTC", 2024, 3, 5, 0, 0);
        let wait = duration_until_next_midnight(&now).unwrap();
        assert_eq!(wait, ONE_DAY);
    }

    #[test]
    fn midnight_across_dst_start_is_shorter() {
        // Europe/Paris jumps from 02:00 to 03:00 on 2024-03-31.
        let now = zoned("Europe/Paris", 2024, 3, 31, 0, 0);
        let wait = duration_until_next_midnight(&now).unwrap();
        assert_eq!(wait, Duration::from_secs(23 * 60 * 60));
    }

    #[test]
    fn midnight_across_dst_end_is_longer() {
        // Europe/Paris falls back from 03:00 to 02:00 on 2024-10-27.
        let now = zoned("Europe/Paris", 2024, 10, 27, 0, 0);
        let wait = duration_until_next_midnight(&now).unwrap();
        assert_eq!(wait, Duration::from_secs(25 * 60 * 60));
    }

    #[test]
    fn fixed_schedule_returns_period() {
        let schedule = ResetSchedule::Every(Duration::from_secs(42));
        assert_eq!(schedule.next_delay(), Duration::from_secs(42));
    }

    #[test]
    fn midnight_schedule_never_exceeds_a_long_day() {
        let delay = ResetSchedule::LocalMidnight(TimeZone::UTC).next_delay();
        assert!(delay <= ONE_DAY);
    }

    fn seed(cache: &FreshnessCache) {
        cache.put(NormalizedHost::new("trip.example"), "target".to_string());
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_resets_on_each_period() {
        let cache = FreshnessCache::new();
        seed(&cache);

        let handle =
            ResetScheduler::new(cache.clone(), ResetSchedule::Every(Duration::from_secs(60)))
                .spawn();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(cache.len(), 1, "reset must not fire early");

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(cache.is_empty());

        seed(&cache);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(cache.is_empty(), "scheduler must re-arm after a reset");

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_resets_at_midnight() {
        let cache = FreshnessCache::new();
        seed(&cache);

        let handle = ResetScheduler::new(cache.clone(), ResetSchedule::system_midnight()).spawn();

        tokio::time::sleep(ONE_DAY + Duration::from_secs(3600)).await;
        assert!(cache.is_empty());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_resets() {
        let cache = FreshnessCache::new();
        let handle =
            ResetScheduler::new(cache.clone(), ResetSchedule::Every(Duration::from_secs(60)))
                .spawn();

        handle.shutdown().await;

        seed(&cache);
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_the_task() {
        let cache = FreshnessCache::new();
        let handle =
            ResetScheduler::new(cache.clone(), ResetSchedule::Every(Duration::from_secs(60)))
                .spawn();
        drop(handle);

        // Let the task observe the closed channel.
        tokio::task::yield_now().await;
        seed(&cache);
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(cache.len(), 1);
    }
}
