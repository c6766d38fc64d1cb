use crate::db;
use crate::models::post::Post;
use crate::schema::{feed_follows, posts};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use typed_builder::TypedBuilder as Builder;
use uuid::Uuid;

#[derive(Insertable, Builder, Debug, Clone, Eq, PartialEq)]
#[diesel(table_name = posts)]
pub struct NewPost {
    #[builder(default = Uuid::new_v4())]
    pub id: Uuid,
    pub feed_id: Uuid,
    #[builder(setter(into))]
    pub title: String,
    #[builder(setter(into))]
    pub url: String,
    #[builder(setter(into))]
    pub description: String,
    pub published_at: DateTime<Utc>,
    #[builder(default = db::current_time())]
    pub created_at: DateTime<Utc>,
    #[builder(default = db::current_time())]
    pub updated_at: DateTime<Utc>,
}

pub fn create(conn: &mut PgConnection, new_post: NewPost) -> Result<Post, Error> {
    diesel::insert_into(posts::table)
        .values(new_post)
        .get_result::<Post>(conn)
}

pub fn find_by_url(conn: &mut PgConnection, url: &str) -> Result<Option<Post>, Error> {
    posts::table
        .filter(posts::url.eq(url))
        .first::<Post>(conn)
        .optional()
}

pub fn find_for_user(conn: &mut PgConnection, user_id: Uuid, limit: i64) -> Result<Vec<Post>, Error> {
    posts::table
        .inner_join(feed_follows::table.on(feed_follows::feed_id.eq(posts::feed_id)))
        .filter(feed_follows::user_id.eq(user_id))
        .order((posts::published_at.desc(), posts::id.asc()))
        .limit(limit)
        .select(Post::as_select())
        .load::<Post>(conn)
}

pub fn delete_all(conn: &mut PgConnection) -> Result<usize, Error> {
    diesel::delete(posts::table).execute(conn)
}
