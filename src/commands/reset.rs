use super::{Command, CommandError};
use crate::config::UserConfig;
use crate::db::Store;

static COMMAND: &str = "reset";

/// Deletes every user, feed, follow and post, and logs out.
pub struct Reset {}

impl Reset {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Reset {
    fn response(
        &self,
        store: &dyn Store,
        config: &mut UserConfig,
    ) -> Result<String, CommandError> {
        store.reset_all()?;
        config.clear_user()?;

        log::warn!("All users, feeds and posts were deleted");

        Ok("Database reset".to_string())
    }

    fn command(&self) -> &str {
        Self::command()
    }
}
