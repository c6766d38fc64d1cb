use crate::db;
use crate::models::feed::Feed;
use crate::schema::feeds;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use uuid::Uuid;

#[derive(Insertable)]
#[diesel(table_name = feeds)]
struct NewFeed<'a> {
    id: Uuid,
    name: &'a str,
    url: &'a str,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub fn create(
    conn: &mut PgConnection,
    name: &str,
    url: &str,
    user_id: Uuid,
) -> Result<Feed, Error> {
    let now = db::current_time();
    let new_feed = NewFeed {
        id: Uuid::new_v4(),
        name: name.trim(),
        url: url.trim(),
        user_id,
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(feeds::table)
        .values(new_feed)
        .get_result::<Feed>(conn)
}

pub fn find_by_url(conn: &mut PgConnection, url: &str) -> Result<Option<Feed>, Error> {
    feeds::table
        .filter(feeds::url.eq(url.trim()))
        .first::<Feed>(conn)
        .optional()
}

pub fn all(conn: &mut PgConnection) -> Result<Vec<Feed>, Error> {
    feeds::table
        .order((feeds::created_at.asc(), feeds::id.asc()))
        .load::<Feed>(conn)
}

pub fn find_next_to_fetch(conn: &mut PgConnection) -> Result<Option<Feed>, Error> {
    feeds::table
        .order((
            feeds::last_fetched_at.asc().nulls_first(),
            feeds::created_at.asc(),
            feeds::id.asc(),
        ))
        .first::<Feed>(conn)
        .optional()
}

pub fn mark_fetched(conn: &mut PgConnection, feed_id: Uuid) -> Result<Feed, Error> {
    let now = db::current_time();

    let updated_feed = diesel::update(
        feeds::table.filter(feeds::id.eq(feed_id)).filter(
            feeds::last_fetched_at
                .le(now)
                .or(feeds::last_fetched_at.is_null()),
        ),
    )
    .set((
        feeds::last_fetched_at.eq(now),
        feeds::updated_at.eq(now),
    ))
    .get_result::<Feed>(conn)
    .optional()?;

    // the watermark is already ahead of our clock
    match updated_feed {
        Some(feed) => Ok(feed),
        None => feeds::table.filter(feeds::id.eq(feed_id)).first::<Feed>(conn),
    }
}

pub fn delete_all(conn: &mut PgConnection) -> Result<usize, Error> {
    diesel::delete(feeds::table).execute(conn)
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::db::users;
    use crate::models::feed::Feed;
    use crate::schema::feeds;
    use chrono::{Duration, Utc};
    use diesel::connection::Connection;
    use diesel::result::{DatabaseErrorKind, Error};
    use diesel::{ExpressionMethods, RunQueryDsl};

    #[test]
    #[ignore]
    fn create_creates_new_feed() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let user = users::create(connection, "kahya").unwrap();
            let feed =
                super::create(connection, "Hacker News", "https://news.ycombinator.com/rss", user.id)
                    .unwrap();

            assert_eq!(feed.name, "Hacker News");
            assert_eq!(feed.url, "https://news.ycombinator.com/rss");
            assert_eq!(feed.user_id, user.id);
            assert_eq!(feed.last_fetched_at, None);

            let found_feed = super::find_by_url(connection, "https://news.ycombinator.com/rss")
                .unwrap()
                .unwrap();
            assert_eq!(found_feed, feed);

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn create_fails_for_duplicate_url() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let user = users::create(connection, "kahya").unwrap();
            super::create(connection, "One", "https://blog.boot.dev/index.xml", user.id).unwrap();

            let result = super::create(connection, "Two", "https://blog.boot.dev/index.xml", user.id);

            match result.err().unwrap() {
                Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => (),
                error => panic!("Error doesn't match {:?}", error),
            };

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn find_next_to_fetch_prefers_never_fetched_feeds() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let user = users::create(connection, "kahya").unwrap();
            let fetched = super::create(connection, "Fetched", "https://a.example/rss", user.id)
                .unwrap();
            let never_fetched =
                super::create(connection, "Never", "https://b.example/rss", user.id).unwrap();

            diesel::update(&fetched)
                .set(feeds::last_fetched_at.eq(Utc::now() - Duration::hours(1)))
                .get_result::<Feed>(connection)
                .unwrap();

            let next_feed = super::find_next_to_fetch(connection).unwrap().unwrap();
            assert_eq!(next_feed.id, never_fetched.id);

            super::mark_fetched(connection, never_fetched.id).unwrap();

            let next_feed = super::find_next_to_fetch(connection).unwrap().unwrap();
            assert_eq!(next_feed.id, fetched.id);

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn mark_fetched_does_not_move_watermark_backwards() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let user = users::create(connection, "kahya").unwrap();
            let feed = super::create(connection, "Future", "https://c.example/rss", user.id)
                .unwrap();
            let future = db::current_time() + Duration::hours(2);

            diesel::update(&feed)
                .set(feeds::last_fetched_at.eq(future))
                .get_result::<Feed>(connection)
                .unwrap();

            let marked_feed = super::mark_fetched(connection, feed.id).unwrap();

            assert_eq!(marked_feed.last_fetched_at, Some(future));

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn find_next_to_fetch_returns_none_without_feeds() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            super::delete_all(connection).unwrap();

            assert_eq!(super::find_next_to_fetch(connection).unwrap(), None);

            Ok(())
        });
    }
}
