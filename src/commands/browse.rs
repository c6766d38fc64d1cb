use super::{current_user, Command, CommandError};
use crate::config::UserConfig;
use crate::db::Store;
use crate::models::Post;

static COMMAND: &str = "browse";

pub const DEFAULT_LIMIT: i64 = 2;

/// The newest posts from the feeds the current user follows.
pub struct Browse {
    limit: i64,
}

impl Browse {
    pub fn new(limit: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        }
    }

    pub fn command() -> &'static str {
        COMMAND
    }

    fn format_post(post: &Post) -> String {
        let mut text = format!(
            "{}\n{}\nPublished {}",
            post.title,
            post.url,
            post.published_at.format("%a %b %e %Y %H:%M UTC")
        );

        if !post.description.trim().is_empty() {
            text.push('\n');
            text.push_str(post.description.trim());
        }

        text
    }
}

impl Command for Browse {
    fn response(
        &self,
        store: &dyn Store,
        config: &mut UserConfig,
    ) -> Result<String, CommandError> {
        if self.limit <= 0 {
            return Err(CommandError::InvalidLimit(self.limit));
        }

        let user = current_user(store, config)?;
        let posts = store.get_posts_for_user(user.id, self.limit)?;

        if posts.is_empty() {
            return Ok("There are no posts yet".to_string());
        }

        Ok(posts
            .iter()
            .map(Self::format_post)
            .collect::<Vec<String>>()
            .join("\n\n"))
    }

    fn command(&self) -> &str {
        Self::command()
    }
}
