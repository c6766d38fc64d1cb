use crate::db::{Store, StoreError};
use crate::models::Feed;
use crate::sync::ingest::{self, IngestReport};
use crate::sync::reader::{FetchError, ReadFeed};
use crate::sync::scheduler::FeedScheduler;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("there are no feeds to fetch")]
    NoFeeds,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to sync {url}: {source}")]
    Fetch { url: String, source: FetchError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub feed: Feed,
    pub report: IngestReport,
}

/// One polling cycle: pick the stalest feed, fetch it, mark it, store its posts.
pub struct SyncJob<'a, S: Store + ?Sized, R: ReadFeed + ?Sized> {
    store: &'a S,
    reader: &'a R,
}

impl<'a, S: Store + ?Sized, R: ReadFeed + ?Sized> SyncJob<'a, S, R> {
    pub fn new(store: &'a S, reader: &'a R) -> Self {
        Self { store, reader }
    }

    pub async fn execute(&self) -> Result<SyncReport, SyncError> {
        let scheduler = FeedScheduler::new(self.store);
        let feed = scheduler.next_feed_to_fetch()?;

        log::info!("Fetching feed {} ({})", feed.name, feed.url);

        let fetched = self.reader.read(&feed.url).await;

        // marked whether or not the fetch succeeded
        let feed = scheduler.mark_fetched(feed.id)?;

        let document = fetched.map_err(|source| SyncError::Fetch {
            url: feed.url.clone(),
            source,
        })?;

        let report = ingest::ingest(self.store, feed.id, &document);
        report.log(&feed, &document);

        Ok(SyncReport { feed, report })
    }
}
