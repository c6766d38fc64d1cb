use crate::db::Store;
use crate::sync::reader::ReadFeed;
use crate::sync::sync_job::{SyncError, SyncJob};
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Runs one `SyncJob` per tick until `shutdown` resolves.
///
/// The first cycle starts immediately. Cycles never overlap: a slow cycle
/// pushes the following ticks back instead of bunching them up. Shutdown is
/// only observed between cycles.
///
/// Store calls are blocking (diesel over an r2d2 pool) and run inline on the
/// runtime thread. There is a single sequential worker and nothing else is
/// scheduled alongside it, so a cycle holds the thread only for its own
/// queries. Spawning more workers would need `spawn_blocking` around them.
pub struct Poller<'a, S: Store + ?Sized, R: ReadFeed + ?Sized> {
    store: &'a S,
    reader: &'a R,
    interval: Duration,
}

impl<'a, S: Store + ?Sized, R: ReadFeed + ?Sized> Poller<'a, S, R> {
    pub fn new(store: &'a S, reader: &'a R, interval: Duration) -> Self {
        Self {
            store,
            reader,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Returns the number of cycles that ran.
    pub async fn run<F: Future<Output = ()>>(&self, shutdown: F) -> usize {
        log::info!("Collecting feeds every {:?}", self.interval);

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        let mut cycles = 0;

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.run_cycle().await;
                    cycles += 1;
                }
            }
        }

        log::info!("Stopped collecting feeds after {} cycles", cycles);

        cycles
    }

    async fn run_cycle(&self) {
        match SyncJob::new(self.store, self.reader).execute().await {
            Ok(_) => (),
            Err(SyncError::NoFeeds) => log::warn!("There are no feeds to fetch yet"),
            Err(error) => log::error!("Failed to sync feed: {}", error),
        }
    }
}
