use crate::db::{feed_follows, feeds, posts, users, NewPost, Store, StoreError};
use crate::models::{Feed, FeedFollow, Post, User};
use diesel::connection::Connection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error;
use std::time::Duration;
use uuid::Uuid;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn connect(database_url: &str, pool_size: u32) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);

        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(CONNECTION_TIMEOUT)
            .build(manager)?;

        Ok(Self::new(pool))
    }

    fn connection(
        &self,
    ) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StoreError> {
        Ok(self.pool.get()?)
    }
}

impl Store for PgStore {
    fn get_user(&self, name: &str) -> Result<Option<User>, StoreError> {
        Ok(users::find_by_name(&mut *self.connection()?, name)?)
    }

    fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(users::find(&mut *self.connection()?, id)?)
    }

    fn get_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(users::all(&mut *self.connection()?)?)
    }

    fn create_user(&self, name: &str) -> Result<User, StoreError> {
        Ok(users::create(&mut *self.connection()?, name)?)
    }

    fn create_feed(&self, name: &str, url: &str, user_id: Uuid) -> Result<Feed, StoreError> {
        Ok(feeds::create(&mut *self.connection()?, name, url, user_id)?)
    }

    fn get_feeds(&self) -> Result<Vec<Feed>, StoreError> {
        Ok(feeds::all(&mut *self.connection()?)?)
    }

    fn get_feed_by_url(&self, url: &str) -> Result<Option<Feed>, StoreError> {
        Ok(feeds::find_by_url(&mut *self.connection()?, url)?)
    }

    fn create_feed_follow(
        &self,
        user_id: Uuid,
        feed_id: Uuid,
    ) -> Result<FeedFollow, StoreError> {
        Ok(feed_follows::create(&mut *self.connection()?, user_id, feed_id)?)
    }

    fn get_followed_feeds(&self, user_id: Uuid) -> Result<Vec<Feed>, StoreError> {
        Ok(feed_follows::find_feeds_for_user(
            &mut *self.connection()?,
            user_id,
        )?)
    }

    fn delete_feed_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<usize, StoreError> {
        Ok(feed_follows::remove(&mut *self.connection()?, user_id, feed_id)?)
    }

    fn get_next_feed_to_fetch(&self) -> Result<Option<Feed>, StoreError> {
        Ok(feeds::find_next_to_fetch(&mut *self.connection()?)?)
    }

    fn mark_feed_fetched(&self, feed_id: Uuid) -> Result<Feed, StoreError> {
        Ok(feeds::mark_fetched(&mut *self.connection()?, feed_id)?)
    }

    fn get_post_by_url(&self, url: &str) -> Result<Option<Post>, StoreError> {
        Ok(posts::find_by_url(&mut *self.connection()?, url)?)
    }

    fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        Ok(posts::create(&mut *self.connection()?, post)?)
    }

    fn get_posts_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Post>, StoreError> {
        Ok(posts::find_for_user(
            &mut *self.connection()?,
            user_id,
            limit,
        )?)
    }

    fn reset_all(&self) -> Result<(), StoreError> {
        let mut pooled_connection = self.connection()?;
        let connection: &mut PgConnection = &mut pooled_connection;

        connection.transaction::<_, Error, _>(|connection| {
            posts::delete_all(connection)?;
            feed_follows::delete_all(connection)?;
            feeds::delete_all(connection)?;
            users::delete_all(connection)?;

            Ok(())
        })?;

        Ok(())
    }
}
