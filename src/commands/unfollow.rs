use super::{current_user, find_feed, Command, CommandError};
use crate::config::UserConfig;
use crate::db::Store;

static COMMAND: &str = "unfollow";

pub struct Unfollow {
    url: String,
}

impl Unfollow {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Unfollow {
    fn response(
        &self,
        store: &dyn Store,
        config: &mut UserConfig,
    ) -> Result<String, CommandError> {
        let user = current_user(store, config)?;
        let feed = find_feed(store, &self.url)?;

        match store.delete_feed_follow(user.id, feed.id)? {
            0 => Err(CommandError::NotFollowing(feed.url)),
            _ => Ok(format!("{} unfollowed {}", user.name, feed.name)),
        }
    }

    fn command(&self) -> &str {
        Self::command()
    }
}
