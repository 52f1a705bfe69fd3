use crate::api::{ApiError, ApiJson, ApiPath, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::NewRating;
use crate::schema::{community_recipe_ratings, community_recipes};
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel::query_dsl::methods::ExecuteDsl;
use potluck_core::{Aggregate, RatingLedger, RatingValue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RateRequest {
    /// Whole number from 1 to 5
    #[schema(value_type = i32, minimum = 1, maximum = 5)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RateResponse {
    pub ok: bool,
    /// Unrounded; may go down after a re-rating
    pub rating_avg: f64,
    pub rating_count: i32,
    pub rating_rounded: i32,
}

/// One ledger row per (recipe, user): a re-rating overwrites the value.
fn upsert_rating(
    rating: NewRating,
    now: DateTime<Utc>,
) -> impl ExecuteDsl<PgConnection> + RunQueryDsl<PgConnection> + QueryFragment<Pg> {
    let value = rating.value;
    diesel::insert_into(community_recipe_ratings::table)
        .values(rating)
        .on_conflict((
            community_recipe_ratings::community_recipe_id,
            community_recipe_ratings::user_id,
        ))
        .do_update()
        .set((
            community_recipe_ratings::value.eq(value),
            community_recipe_ratings::updated_at.eq(now),
        ))
}

/// Record `user_id`'s rating and rewrite the recipe's aggregate, all under a
/// lock on the recipe row so concurrent raters never lose each other's
/// entries.
fn apply_rating(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    user_id: Uuid,
    value: RatingValue,
) -> Result<Aggregate, ApiError> {
    conn.transaction(|conn| {
        let locked: Option<Uuid> = community_recipes::table
            .find(recipe_id)
            .select(community_recipes::id)
            .for_update()
            .first(conn)
            .optional()?;
        if locked.is_none() {
            return Err(ApiError::not_found("Community recipe"));
        }

        let rows: Vec<(Uuid, i16)> = community_recipe_ratings::table
            .filter(community_recipe_ratings::community_recipe_id.eq(recipe_id))
            .select((
                community_recipe_ratings::user_id,
                community_recipe_ratings::value,
            ))
            .load(conn)?;

        let mut ledger = RatingLedger::from_rows(rows)
            .map_err(|e| ApiError::Internal(format!("Stored rating out of range: {}", e)))?;
        let outcome = ledger.record(user_id, value);
        let aggregate = ledger.aggregate();

        let now = Utc::now();
        upsert_rating(
            NewRating {
                community_recipe_id: recipe_id,
                user_id,
                value: i16::from(value.get()),
            },
            now,
        )
        .execute(conn)?;

        diesel::update(community_recipes::table.find(recipe_id))
            .set((
                community_recipes::rating_avg.eq(aggregate.average),
                community_recipes::rating_count.eq(aggregate.count),
                community_recipes::rating.eq(aggregate.rounded),
                community_recipes::updated_at.eq(now),
            ))
            .execute(conn)?;

        tracing::debug!(
            recipe_id = %recipe_id,
            outcome = ?outcome,
            average = aggregate.average,
            count = aggregate.count,
            "Recorded rating"
        );

        Ok(aggregate)
    })
}

#[utoipa::path(
    post,
    path = "/api/community-recipes/{id}/rate",
    tag = "community_recipes",
    params(
        ("id" = Uuid, Path, description = "Community recipe ID")
    ),
    request_body = RateRequest,
    responses(
        (status = 200, description = "Rating recorded", body = RateResponse),
        (status = 400, description = "Rating not an integer from 1 to 5", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn rate_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<RateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let value = RatingValue::from_json(&req.value)?;

    let mut conn = pool.get()?;
    let aggregate = apply_rating(&mut conn, id, user.id, value)?;

    Ok(Json(RateResponse {
        ok: true,
        rating_avg: aggregate.average,
        rating_count: aggregate.count,
        rating_rounded: aggregate.rounded,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rerating_overwrites_the_users_row() {
        let rating = NewRating {
            community_recipe_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            value: 4,
        };

        let sql = diesel::debug_query::<Pg, _>(&upsert_rating(rating, Utc::now())).to_string();
        assert!(
            sql.contains(r#"ON CONFLICT ("community_recipe_id", "user_id") DO UPDATE SET"#),
            "{}",
            sql
        );
        assert!(sql.contains(r#""value" = "#), "{}", sql);
    }
}
