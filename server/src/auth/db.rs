use crate::db::DbPool;
use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::crypto::{generate_token, hash_token};

const SESSION_DAYS: i64 = 30;

/// Create a session for `user_id` and return the bearer token.
pub fn create_session(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<String> {
    let token = generate_token();
    let token_hash = hash_token(&token);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at: Utc::now() + Duration::days(SESSION_DAYS),
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

pub fn get_user_from_token(pool: &DbPool, token: &str) -> Option<User> {
    let mut conn = match pool.get() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to get DB connection for auth: {}", e);
            return None;
        }
    };
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(&mut conn)
        .ok()
}
