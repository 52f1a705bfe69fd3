pub mod create;
pub mod delete;
pub mod list;

use crate::api::ApiError;
use crate::schema::shops;
use crate::AppState;
use axum::routing::{delete as delete_method, get};
use axum::Router;
use diesel::prelude::*;
use potluck_core::{normalize_shop_refs, ShopRef};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/shops endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_shops).post(create::create_shop))
        .route("/{id}", delete_method(delete::delete_shop))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_shops, create::create_shop, delete::delete_shop),
    components(schemas(ShopSummary, list::ShopsResponse, create::CreateShopRequest))
)]
pub struct ApiDoc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ShopSummary {
    pub id: Uuid,
    pub name: String,
}

pub(crate) fn load_shop_names(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> QueryResult<HashMap<Uuid, String>> {
    let rows: Vec<(Uuid, String)> = shops::table
        .filter(shops::user_id.eq(user_id))
        .select((shops::id, shops::name))
        .load(conn)?;
    Ok(rows.into_iter().collect())
}

/// Turn shop ids back into `{id, name}` pairs, dropping ids that no longer
/// name one of the user's shops.
pub(crate) fn populate(ids: &[Uuid], names: &HashMap<Uuid, String>) -> Vec<ShopSummary> {
    ids.iter()
        .filter_map(|id| {
            names.get(id).map(|name| ShopSummary {
                id: *id,
                name: name.clone(),
            })
        })
        .collect()
}

/// Normalize client shop refs to ids, all of which must belong to the user.
pub(crate) fn resolve_shop_refs(
    conn: &mut PgConnection,
    user_id: Uuid,
    refs: &[ShopRef],
) -> Result<Vec<Uuid>, ApiError> {
    let ids = normalize_shop_refs(refs);
    if ids.is_empty() {
        return Ok(ids);
    }

    let known: i64 = shops::table
        .filter(shops::user_id.eq(user_id))
        .filter(shops::id.eq_any(ids.clone()))
        .count()
        .get_result(conn)?;

    if known != ids.len() as i64 {
        return Err(ApiError::Validation("Unknown shop".to_string()));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_skips_unknown_ids() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let names = HashMap::from([(a, "Market".to_string())]);

        assert_eq!(
            populate(&[b, a], &names),
            vec![ShopSummary {
                id: a,
                name: "Market".to_string()
            }]
        );
    }
}
