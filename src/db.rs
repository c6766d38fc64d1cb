use crate::models::{Feed, FeedFollow, Post, User};
use chrono::prelude::*;
use chrono::{DateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error};
use uuid::Uuid;

#[cfg(test)]
use diesel::connection::Connection;
#[cfg(test)]
use diesel::pg::PgConnection;

pub mod feed_follows;
pub mod feeds;
#[cfg(test)]
pub mod memory;
pub mod pg_store;
pub mod posts;
pub mod users;

pub use pg_store::PgStore;
pub use posts::NewPost;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("failed to get a database connection: {msg}")]
    Connection { msg: String },
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated: {msg}")]
    UniqueViolation { msg: String },
    #[error("database query failed: {msg}")]
    Query { msg: String },
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        match error {
            Error::NotFound => StoreError::NotFound,
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::UniqueViolation {
                    msg: info.message().to_string(),
                }
            }
            error => StoreError::Query {
                msg: format!("{error:?}"),
            },
        }
    }
}

impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(error: diesel::r2d2::PoolError) -> Self {
        StoreError::Connection {
            msg: format!("{error:?}"),
        }
    }
}

/// Everything the aggregator reads from or writes to its relational store.
///
/// Each call is committed on its own; nothing spans calls.
pub trait Store: Send + Sync {
    fn get_user(&self, name: &str) -> Result<Option<User>, StoreError>;

    fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    fn get_users(&self) -> Result<Vec<User>, StoreError>;

    fn create_user(&self, name: &str) -> Result<User, StoreError>;

    fn create_feed(&self, name: &str, url: &str, user_id: Uuid) -> Result<Feed, StoreError>;

    fn get_feeds(&self) -> Result<Vec<Feed>, StoreError>;

    fn get_feed_by_url(&self, url: &str) -> Result<Option<Feed>, StoreError>;

    /// Following a feed twice returns the existing follow.
    fn create_feed_follow(&self, user_id: Uuid, feed_id: Uuid)
        -> Result<FeedFollow, StoreError>;

    fn get_followed_feeds(&self, user_id: Uuid) -> Result<Vec<Feed>, StoreError>;

    fn delete_feed_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<usize, StoreError>;

    /// The feed with the oldest `last_fetched_at`, never-fetched feeds first.
    fn get_next_feed_to_fetch(&self) -> Result<Option<Feed>, StoreError>;

    /// Moves the watermark to now. It never moves backwards.
    fn mark_feed_fetched(&self, feed_id: Uuid) -> Result<Feed, StoreError>;

    fn get_post_by_url(&self, url: &str) -> Result<Option<Post>, StoreError>;

    fn create_post(&self, post: NewPost) -> Result<Post, StoreError>;

    /// Newest first, from the feeds the user follows.
    fn get_posts_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Post>, StoreError>;

    fn reset_all(&self) -> Result<(), StoreError>;
}

pub fn current_time() -> DateTime<Utc> {
    Utc::now().round_subsecs(0)
}

#[cfg(test)]
pub fn establish_test_connection() -> PgConnection {
    dotenv::dotenv().ok();

    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests");

    PgConnection::establish(&url).unwrap_or_else(|_| panic!("Error connecting to {}", url))
}
