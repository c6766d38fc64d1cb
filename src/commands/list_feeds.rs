use super::{Command, CommandError};
use crate::config::UserConfig;
use crate::db::Store;

static COMMAND: &str = "feeds";

pub struct ListFeeds {}

impl ListFeeds {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for ListFeeds {
    fn response(
        &self,
        store: &dyn Store,
        _config: &mut UserConfig,
    ) -> Result<String, CommandError> {
        let feeds = store.get_feeds()?;

        if feeds.is_empty() {
            return Ok("There are no feeds".to_string());
        }

        let mut lines = Vec::with_capacity(feeds.len());

        for feed in feeds {
            let owner = match store.get_user_by_id(feed.user_id)? {
                Some(user) => user.name,
                None => "unknown".to_string(),
            };

            lines.push(format!("* {}\n  URL: {}\n  Added by: {}", feed.name, feed.url, owner));
        }

        Ok(lines.join("\n"))
    }

    fn command(&self) -> &str {
        Self::command()
    }
}
