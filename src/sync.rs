pub mod ingest;
pub mod poller;
pub mod pub_date;
pub mod reader;
pub mod scheduler;
pub mod sync_job;

pub use ingest::{IngestReport, ItemOutcome, SkipReason};
pub use poller::Poller;
pub use reader::{FetchError, FetchedFeed, FetchedFeedItem, ReadFeed};
pub use scheduler::FeedScheduler;
pub use sync_job::{SyncError, SyncJob, SyncReport};
