use crate::db;
use crate::models::{Feed, FeedFollow};
use crate::schema::{feed_follows, feeds};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use uuid::Uuid;

#[derive(Insertable)]
#[diesel(table_name = feed_follows)]
struct NewFeedFollow {
    id: Uuid,
    user_id: Uuid,
    feed_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub fn create(conn: &mut PgConnection, user_id: Uuid, feed_id: Uuid) -> Result<FeedFollow, Error> {
    let now = db::current_time();
    let new_follow = NewFeedFollow {
        id: Uuid::new_v4(),
        user_id,
        feed_id,
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(feed_follows::table)
        .values(new_follow)
        .on_conflict((feed_follows::user_id, feed_follows::feed_id))
        .do_update()
        .set(feed_follows::updated_at.eq(now))
        .get_result::<FeedFollow>(conn)
}

pub fn find_feeds_for_user(conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<Feed>, Error> {
    feed_follows::table
        .inner_join(feeds::table)
        .filter(feed_follows::user_id.eq(user_id))
        .order((feed_follows::created_at.asc(), feeds::name.asc()))
        .select(Feed::as_select())
        .load::<Feed>(conn)
}

pub fn remove(conn: &mut PgConnection, user_id: Uuid, feed_id: Uuid) -> Result<usize, Error> {
    let record_query = feed_follows::table
        .filter(feed_follows::user_id.eq(user_id))
        .filter(feed_follows::feed_id.eq(feed_id));

    diesel::delete(record_query).execute(conn)
}

pub fn delete_all(conn: &mut PgConnection) -> Result<usize, Error> {
    diesel::delete(feed_follows::table).execute(conn)
}
