use crate::db::{NewPost, Store, StoreError};
use crate::models::{Feed, Post};
use crate::sync::pub_date::{self, DateParseError};
use crate::sync::reader::{FetchedFeed, FetchedFeedItem};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingLink,
    InvalidDate(DateParseError),
    LookupFailed(StoreError),
    InsertFailed(StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Inserted(Post),
    Duplicate,
    Skipped(SkipReason),
}

/// One outcome per fetched item, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl IngestReport {
    pub fn inserted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ItemOutcome::Inserted(_)))
            .count()
    }

    pub fn duplicate_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ItemOutcome::Duplicate))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ItemOutcome::Skipped(_)))
            .count()
    }

    pub fn log(&self, feed: &Feed, document: &FetchedFeed) {
        for (item, outcome) in document.items.iter().zip(&self.outcomes) {
            match outcome {
                ItemOutcome::Inserted(_) => (),
                ItemOutcome::Duplicate => {
                    log::debug!("Post {} from {} already exists", item.link, feed.url)
                }
                ItemOutcome::Skipped(SkipReason::MissingLink) => {
                    log::warn!("Skipped item {:?} from {}: no link", item.title, feed.url)
                }
                ItemOutcome::Skipped(SkipReason::InvalidDate(error)) => {
                    log::warn!("Skipped post {} from {}: {}", item.link, feed.url, error)
                }
                ItemOutcome::Skipped(SkipReason::LookupFailed(error)) => log::warn!(
                    "Skipped post {} from {}: failed to look it up: {}",
                    item.link,
                    feed.url,
                    error
                ),
                ItemOutcome::Skipped(SkipReason::InsertFailed(error)) => log::warn!(
                    "Skipped post {} from {}: failed to save it: {}",
                    item.link,
                    feed.url,
                    error
                ),
            }
        }

        log::info!(
            "Feed {} ({}): {} new, {} duplicates, {} skipped",
            feed.name,
            feed.url,
            self.inserted_count(),
            self.duplicate_count(),
            self.skipped_count()
        );
    }
}

/// Stores every item of the document that is not already known by url.
///
/// A failing item never stops the ones after it.
pub fn ingest<S: Store + ?Sized>(store: &S, feed_id: Uuid, document: &FetchedFeed) -> IngestReport {
    let outcomes = document
        .items
        .iter()
        .map(|item| ingest_item(store, feed_id, item))
        .collect();

    IngestReport { outcomes }
}

fn ingest_item<S: Store + ?Sized>(store: &S, feed_id: Uuid, item: &FetchedFeedItem) -> ItemOutcome {
    if item.link.is_empty() {
        return ItemOutcome::Skipped(SkipReason::MissingLink);
    }

    match store.get_post_by_url(&item.link) {
        Ok(Some(_)) => return ItemOutcome::Duplicate,
        Ok(None) => (),
        Err(error) => return ItemOutcome::Skipped(SkipReason::LookupFailed(error)),
    }

    let published_at = match pub_date::parse(&item.pub_date) {
        Ok(published_at) => published_at,
        Err(error) => return ItemOutcome::Skipped(SkipReason::InvalidDate(error)),
    };

    let new_post = NewPost::builder()
        .feed_id(feed_id)
        .title(item.title.as_str())
        .url(item.link.as_str())
        .description(item.description.as_str())
        .published_at(published_at)
        .build();

    match store.create_post(new_post) {
        Ok(post) => ItemOutcome::Inserted(post),
        // another poller stored it between the lookup and the insert
        Err(StoreError::UniqueViolation { .. }) => ItemOutcome::Duplicate,
        Err(error) => ItemOutcome::Skipped(SkipReason::InsertFailed(error)),
    }
}
