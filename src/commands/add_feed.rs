use super::{current_user, normalize_url, Command, CommandError};
use crate::config::UserConfig;
use crate::db::{Store, StoreError};

static COMMAND: &str = "addfeed";

/// Registers a feed and follows it as the current user.
pub struct AddFeed {
    name: String,
    url: String,
}

impl AddFeed {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for AddFeed {
    fn response(
        &self,
        store: &dyn Store,
        config: &mut UserConfig,
    ) -> Result<String, CommandError> {
        let user = current_user(store, config)?;
        let url = normalize_url(&self.url)?;

        let feed = match store.create_feed(&self.name, &url, user.id) {
            Ok(feed) => feed,
            Err(StoreError::UniqueViolation { .. }) => return Err(CommandError::FeedExists(url)),
            Err(error) => return Err(error.into()),
        };

        store.create_feed_follow(user.id, feed.id)?;

        log::info!("{} added feed {} ({})", user.name, feed.name, feed.url);

        Ok(format!(
            "Feed {} was added and followed\nID: {}\nURL: {}",
            feed.name, feed.id, feed.url
        ))
    }

    fn command(&self) -> &str {
        Self::command()
    }
}
