use crate::db::{self, NewPost, Store, StoreError};
use crate::models::{Feed, FeedFollow, Post, User};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// In-process `Store` backing the unit tests.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    feeds: Vec<Feed>,
    follows: Vec<FeedFollow>,
    posts: Vec<Post>,
    failing_post_urls: HashSet<String>,
    failing_lookup_urls: HashSet<String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `create_post` for this url fails with a query error.
    pub fn fail_insert_for(&self, url: &str) {
        self.lock().failing_post_urls.insert(url.to_string());
    }

    /// `get_post_by_url` for this url fails with a query error.
    pub fn fail_lookup_for(&self, url: &str) {
        self.lock().failing_lookup_urls.insert(url.to_string());
    }

    /// Every call fails with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    pub fn set_last_fetched_at(&self, feed_id: Uuid, last_fetched_at: Option<DateTime<Utc>>) {
        let mut state = self.lock();

        if let Some(feed) = state.feeds.iter_mut().find(|feed| feed.id == feed_id) {
            feed.last_fetched_at = last_fetched_at;
        }
    }

    pub fn posts(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }

    pub fn feed(&self, feed_id: Uuid) -> Option<Feed> {
        self.lock()
            .feeds
            .iter()
            .find(|feed| feed.id == feed_id)
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn available(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        let state = self.lock();

        if state.unavailable {
            return Err(StoreError::Connection {
                msg: "store is unavailable".to_string(),
            });
        }

        Ok(state)
    }
}

fn unique_violation(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        msg: format!("duplicate key value violates unique constraint \"{constraint}\""),
    }
}

impl Store for MemoryStore {
    fn get_user(&self, name: &str) -> Result<Option<User>, StoreError> {
        let state = self.available()?;

        Ok(state.users.iter().find(|user| user.name == name).cloned())
    }

    fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let state = self.available()?;

        Ok(state.users.iter().find(|user| user.id == id).cloned())
    }

    fn get_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.available()?.users.clone())
    }

    fn create_user(&self, name: &str) -> Result<User, StoreError> {
        let mut state = self.available()?;

        if state.users.iter().any(|user| user.name == name) {
            return Err(unique_violation("users_name_index"));
        }

        let now = db::current_time();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());

        Ok(user)
    }

    fn create_feed(&self, name: &str, url: &str, user_id: Uuid) -> Result<Feed, StoreError> {
        let mut state = self.available()?;

        if state.feeds.iter().any(|feed| feed.url == url) {
            return Err(unique_violation("feeds_url_index"));
        }

        let now = db::current_time();
        let feed = Feed {
            id: Uuid::new_v4(),
            name: name.to_string(),
            url: url.to_string(),
            user_id,
            last_fetched_at: None,
            created_at: now,
            updated_at: now,
        };
        state.feeds.push(feed.clone());

        Ok(feed)
    }

    fn get_feeds(&self) -> Result<Vec<Feed>, StoreError> {
        Ok(self.available()?.feeds.clone())
    }

    fn get_feed_by_url(&self, url: &str) -> Result<Option<Feed>, StoreError> {
        let state = self.available()?;

        Ok(state.feeds.iter().find(|feed| feed.url == url).cloned())
    }

    fn create_feed_follow(
        &self,
        user_id: Uuid,
        feed_id: Uuid,
    ) -> Result<FeedFollow, StoreError> {
        let mut state = self.available()?;

        if let Some(follow) = state
            .follows
            .iter()
            .find(|follow| follow.user_id == user_id && follow.feed_id == feed_id)
        {
            return Ok(follow.clone());
        }

        let now = db::current_time();
        let follow = FeedFollow {
            id: Uuid::new_v4(),
            user_id,
            feed_id,
            created_at: now,
            updated_at: now,
        };
        state.follows.push(follow.clone());

        Ok(follow)
    }

    fn get_followed_feeds(&self, user_id: Uuid) -> Result<Vec<Feed>, StoreError> {
        let state = self.available()?;

        let feeds = state
            .follows
            .iter()
            .filter(|follow| follow.user_id == user_id)
            .filter_map(|follow| state.feeds.iter().find(|feed| feed.id == follow.feed_id))
            .cloned()
            .collect();

        Ok(feeds)
    }

    fn delete_feed_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<usize, StoreError> {
        let mut state = self.available()?;
        let before = state.follows.len();

        state
            .follows
            .retain(|follow| !(follow.user_id == user_id && follow.feed_id == feed_id));

        Ok(before - state.follows.len())
    }

    fn get_next_feed_to_fetch(&self) -> Result<Option<Feed>, StoreError> {
        let state = self.available()?;

        // Option orders None before Some, which puts never-fetched feeds first
        let next_feed = state
            .feeds
            .iter()
            .min_by_key(|feed| (feed.last_fetched_at, feed.created_at, feed.id))
            .cloned();

        Ok(next_feed)
    }

    fn mark_feed_fetched(&self, feed_id: Uuid) -> Result<Feed, StoreError> {
        let mut state = self.available()?;
        let now = db::current_time();

        let feed = state
            .feeds
            .iter_mut()
            .find(|feed| feed.id == feed_id)
            .ok_or(StoreError::NotFound)?;

        if feed.last_fetched_at.map_or(true, |fetched_at| fetched_at <= now) {
            feed.last_fetched_at = Some(now);
            feed.updated_at = now;
        }

        Ok(feed.clone())
    }

    fn get_post_by_url(&self, url: &str) -> Result<Option<Post>, StoreError> {
        let state = self.available()?;

        if state.failing_lookup_urls.contains(url) {
            return Err(StoreError::Query {
                msg: format!("lookup failed for {url}"),
            });
        }

        Ok(state.posts.iter().find(|post| post.url == url).cloned())
    }

    fn create_post(&self, new_post: NewPost) -> Result<Post, StoreError> {
        let mut state = self.available()?;

        if state.failing_post_urls.contains(&new_post.url) {
            return Err(StoreError::Query {
                msg: format!("insert failed for {}", new_post.url),
            });
        }

        if state.posts.iter().any(|post| post.url == new_post.url) {
            return Err(unique_violation("posts_url_index"));
        }

        let post = Post {
            id: new_post.id,
            feed_id: new_post.feed_id,
            title: new_post.title,
            url: new_post.url,
            description: new_post.description,
            published_at: new_post.published_at,
            created_at: new_post.created_at,
            updated_at: new_post.updated_at,
        };
        state.posts.push(post.clone());

        Ok(post)
    }

    fn get_posts_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Post>, StoreError> {
        let state = self.available()?;

        let followed: HashSet<Uuid> = state
            .follows
            .iter()
            .filter(|follow| follow.user_id == user_id)
            .map(|follow| follow.feed_id)
            .collect();

        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|post| followed.contains(&post.feed_id))
            .cloned()
            .collect();

        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(posts)
    }

    fn reset_all(&self) -> Result<(), StoreError> {
        let mut state = self.available()?;

        state.posts.clear();
        state.follows.clear();
        state.feeds.clear();
        state.users.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::db::Store;
    use chrono::{Duration, Utc};

    #[test]
    fn next_feed_prefers_never_fetched_then_oldest() {
        let store = MemoryStore::new();
        let user = store.create_user("kahya").unwrap();
        let older = store.create_feed("Older", "https://a.example/rss", user.id).unwrap();
        let newer = store.create_feed("Newer", "https://b.example/rss", user.id).unwrap();
        let never = store.create_feed("Never", "https://c.example/rss", user.id).unwrap();

        store.set_last_fetched_at(older.id, Some(Utc::now() - Duration::hours(2)));
        store.set_last_fetched_at(newer.id, Some(Utc::now() - Duration::hours(1)));

        assert_eq!(store.get_next_feed_to_fetch().unwrap().unwrap().id, never.id);

        store.mark_feed_fetched(never.id).unwrap();
        assert_eq!(store.get_next_feed_to_fetch().unwrap().unwrap().id, older.id);

        store.mark_feed_fetched(older.id).unwrap();
        assert_eq!(store.get_next_feed_to_fetch().unwrap().unwrap().id, newer.id);
    }
}
