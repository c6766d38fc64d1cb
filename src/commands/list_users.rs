use super::{Command, CommandError};
use crate::config::UserConfig;
use crate::db::Store;

static COMMAND: &str = "users";

pub struct ListUsers {}

impl ListUsers {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for ListUsers {
    fn response(
        &self,
        store: &dyn Store,
        config: &mut UserConfig,
    ) -> Result<String, CommandError> {
        let users = store.get_users()?;

        if users.is_empty() {
            return Ok("There are no users".to_string());
        }

        let lines: Vec<String> = users
            .into_iter()
            .map(|user| {
                if config.current_user() == Some(user.name.as_str()) {
                    format!("* {} (current)", user.name)
                } else {
                    format!("* {}", user.name)
                }
            })
            .collect();

        Ok(lines.join("\n"))
    }

    fn command(&self) -> &str {
        Self::command()
    }
}
