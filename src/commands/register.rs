use super::{Command, CommandError};
use crate::config::UserConfig;
use crate::db::{Store, StoreError};

static COMMAND: &str = "register";

pub struct Register {
    name: String,
}

impl Register {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Register {
    fn response(
        &self,
        store: &dyn Store,
        config: &mut UserConfig,
    ) -> Result<String, CommandError> {
        let user = match store.create_user(&self.name) {
            Ok(user) => user,
            Err(StoreError::UniqueViolation { .. }) => {
                return Err(CommandError::UserExists(self.name.clone()))
            }
            Err(error) => return Err(error.into()),
        };

        config.set_user(&user.name)?;

        log::debug!("Registered user {} ({})", user.name, user.id);

        Ok(format!("User {} was created and logged in", user.name))
    }

    fn command(&self) -> &str {
        Self::command()
    }
}
