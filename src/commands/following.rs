use super::{current_user, Command, CommandError};
use crate::config::UserConfig;
use crate::db::Store;

static COMMAND: &str = "following";

pub struct Following {}

impl Following {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Following {
    fn response(
        &self,
        store: &dyn Store,
        config: &mut UserConfig,
    ) -> Result<String, CommandError> {
        let user = current_user(store, config)?;
        let feeds = store.get_followed_feeds(user.id)?;

        if feeds.is_empty() {
            return Ok("You don't follow any feeds".to_string());
        }

        Ok(feeds
            .into_iter()
            .map(|feed| format!("* {} ({})", feed.name, feed.url))
            .collect::<Vec<String>>()
            .join("\n"))
    }

    fn command(&self) -> &str {
        Self::command()
    }
}
