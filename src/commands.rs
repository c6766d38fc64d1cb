use crate::config::{ConfigError, UserConfig};
use crate::db::{Store, StoreError};
use crate::models::{Feed, User};
use crate::sync::FetchError;
use url::Url;

pub mod add_feed;
pub mod agg;
pub mod browse;
pub mod follow;
pub mod following;
pub mod list_feeds;
pub mod list_users;
pub mod login;
pub mod register;
pub mod reset;
pub mod unfollow;

pub use add_feed::AddFeed;
pub use agg::Agg;
pub use browse::Browse;
pub use follow::Follow;
pub use following::Following;
pub use list_feeds::ListFeeds;
pub use list_users::ListUsers;
pub use login::Login;
pub use register::Register;
pub use reset::Reset;
pub use unfollow::Unfollow;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("you are not logged in, run `gator login <name>` first")]
    NotLoggedIn,
    #[error("user {0} does not exist")]
    UnknownUser(String),
    #[error("user {0} already exists")]
    UserExists(String),
    #[error("{0} is not a valid url")]
    InvalidUrl(String),
    #[error("feed {0} already exists")]
    FeedExists(String),
    #[error("feed {0} does not exist")]
    UnknownFeed(String),
    #[error("you are not following {0}")]
    NotFollowing(String),
    #[error("invalid interval {0:?}, expected a positive duration like 30s, 1m or 1h30m")]
    InvalidInterval(String),
    #[error("limit must be positive, got {0}")]
    InvalidLimit(i64),
    #[error("failed to set up the feed reader: {0}")]
    Reader(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub trait Command {
    fn response(&self, store: &dyn Store, config: &mut UserConfig)
        -> Result<String, CommandError>;

    fn command(&self) -> &str;
}

/// The user named in the session file. It must still exist in the store.
pub fn current_user(store: &dyn Store, config: &UserConfig) -> Result<User, CommandError> {
    let name = config.current_user().ok_or(CommandError::NotLoggedIn)?;

    match store.get_user(name)? {
        Some(user) => Ok(user),
        None => Err(CommandError::UnknownUser(name.to_string())),
    }
}

/// Feed urls are stored the way `Url` prints them, so `https://Lanes.example`
/// is kept as `https://lanes.example/`.
pub fn normalize_url(raw: &str) -> Result<String, CommandError> {
    match Url::parse(raw.trim()) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(url.to_string()),
        _ => Err(CommandError::InvalidUrl(raw.to_string())),
    }
}

pub fn find_feed(store: &dyn Store, url: &str) -> Result<Feed, CommandError> {
    let normalized = normalize_url(url).unwrap_or_else(|_| url.trim().to_string());

    match store.get_feed_by_url(&normalized)? {
        Some(feed) => Ok(feed),
        None => Err(CommandError::UnknownFeed(url.to_string())),
    }
}
