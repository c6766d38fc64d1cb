use super::{current_user, find_feed, Command, CommandError};
use crate::config::UserConfig;
use crate::db::Store;

static COMMAND: &str = "follow";

pub struct Follow {
    url: String,
}

impl Follow {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Follow {
    fn response(
        &self,
        store: &dyn Store,
        config: &mut UserConfig,
    ) -> Result<String, CommandError> {
        let user = current_user(store, config)?;
        let feed = find_feed(store, &self.url)?;

        store.create_feed_follow(user.id, feed.id)?;

        Ok(format!("{} now follows {}", user.name, feed.name))
    }

    fn command(&self) -> &str {
        Self::command()
    }
}

#[cfg(test)]
mod follow_tests {
    use super::Follow;
    use crate::commands::tests::session;
    use crate::commands::{Command, CommandError};
    use crate::db::memory::MemoryStore;
    use crate::db::Store;

    #[test]
    fn it_follows_an_existing_feed_once() {
        let store = MemoryStore::new();
        let owner = store.create_user("lane").unwrap();
        let feed = store
            .create_feed("Example", "https://example.com/rss", owner.id)
            .unwrap();
        let mut config = session(&store, "kahya");
        let user = store.get_user("kahya").unwrap().unwrap();

        let response = Follow::new("https://example.com/rss")
            .response(&store, &mut config)
            .unwrap();
        Follow::new("https://example.com/rss")
            .response(&store, &mut config)
            .unwrap();

        assert_eq!(response, "kahya now follows Example");
        assert_eq!(store.get_followed_feeds(user.id).unwrap(), vec![feed]);
    }

    #[test]
    fn it_rejects_unknown_feeds() {
        let store = MemoryStore::new();
        let mut config = session(&store, "kahya");

        let result = Follow::new("https://missing.example/rss").response(&store, &mut config);

        assert!(matches!(result, Err(CommandError::UnknownFeed(_))));
    }
}
