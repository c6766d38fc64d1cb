use crate::db::Store;
use crate::models::Feed;
use crate::sync::SyncError;
use uuid::Uuid;

/// Round-robin over every registered feed, ordered by `last_fetched_at`.
///
/// The store is the only coordination point. Selection and marking are two
/// separate calls, so two processes polling the same database may pick the
/// same feed.
pub struct FeedScheduler<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> FeedScheduler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn next_feed_to_fetch(&self) -> Result<Feed, SyncError> {
        match self.store.get_next_feed_to_fetch()? {
            Some(feed) => Ok(feed),
            None => Err(SyncError::NoFeeds),
        }
    }

    pub fn mark_fetched(&self, feed_id: Uuid) -> Result<Feed, SyncError> {
        let feed = self.store.mark_feed_fetched(feed_id)?;

        Ok(feed)
    }
}
