use super::{Command, CommandError};
use crate::config::UserConfig;
use crate::db::Store;

static COMMAND: &str = "login";

pub struct Login {
    name: String,
}

impl Login {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Login {
    fn response(
        &self,
        store: &dyn Store,
        config: &mut UserConfig,
    ) -> Result<String, CommandError> {
        let user = match store.get_user(&self.name)? {
            Some(user) => user,
            None => return Err(CommandError::UnknownUser(self.name.clone())),
        };

        config.set_user(&user.name)?;

        Ok(format!("Logged in as {}", user.name))
    }

    fn command(&self) -> &str {
        Self::command()
    }
}
