use super::find_owned_recipe;
use crate::api::{ApiError, ApiPath, ErrorResponse};
use crate::auth::AuthUser;
use crate::config::ServerConfig;
use crate::db::DbPool;
use crate::media::{attach, validate_upload, MediaStore, UploadOptions};
use crate::models::{CommunityRecipe, MediaAttachment, StepKind};
use crate::schema::community_recipes;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadMediaRequest {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttachMediaResponse {
    pub media: MediaAttachment,
    /// What the step became; always `image` for covers
    pub kind: StepKind,
}

/// Read the first file field of a multipart body and validate it.
async fn read_upload(
    multipart: &mut Multipart,
    max_size: usize,
) -> Result<(Vec<u8>, String), ApiError> {
    let field = multipart
        .next_field()
        .await?
        .ok_or_else(|| ApiError::Validation("No file provided".to_string()))?;

    let declared = field.content_type().map(str::to_string);
    let data = field.bytes().await?.to_vec();
    let content_type = validate_upload(&data, declared.as_deref(), max_size)?;

    Ok((data, content_type))
}

fn step_index_in_range(recipe: &CommunityRecipe, index: usize) -> Result<(), ApiError> {
    let count = recipe.steps().len();
    if index >= count {
        return Err(ApiError::Validation(format!(
            "Step index {} out of range (recipe has {} steps)",
            index, count
        )));
    }
    Ok(())
}

/// Lock the recipe row, apply `edit` to it and write cover and steps back.
/// Returns whatever `edit` returns.
fn update_locked<T, F>(conn: &mut PgConnection, id: Uuid, edit: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut CommunityRecipe) -> Result<T, ApiError>,
{
    conn.transaction(|conn| {
        let mut recipe: CommunityRecipe = community_recipes::table
            .find(id)
            .select(CommunityRecipe::as_select())
            .for_update()
            .first(conn)
            .optional()?
            .ok_or_else(|| ApiError::not_found("Community recipe"))?;

        let output = edit(&mut recipe)?;

        diesel::update(community_recipes::table.find(id))
            .set((
                community_recipes::cover.eq(&recipe.cover),
                community_recipes::steps.eq(&recipe.steps),
                community_recipes::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;
        Ok(output)
    })
}

#[utoipa::path(
    put,
    path = "/api/community-recipes/{id}/cover",
    tag = "community_recipes",
    params(
        ("id" = Uuid, Path, description = "Community recipe ID")
    ),
    request_body(content_type = "multipart/form-data", content = UploadMediaRequest),
    responses(
        (status = 200, description = "Cover replaced", body = AttachMediaResponse),
        (status = 400, description = "Invalid file", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Media store failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn put_cover(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<dyn MediaStore>>,
    State(config): State<Arc<ServerConfig>>,
    ApiPath(id): ApiPath<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (data, content_type) = read_upload(&mut multipart, config.max_upload_bytes).await?;
    if content_type.starts_with("video/") {
        return Err(ApiError::Validation("Cover must be an image".to_string()));
    }

    {
        let mut conn = pool.get()?;
        find_owned_recipe(&mut conn, id, user.id)?;
    }

    let options = UploadOptions {
        folder: format!("{}/covers", config.media_folder),
        content_type,
    };
    let (attachment, _) = attach::replace_attachment(
        media.as_ref(),
        data,
        &options,
        config.media_timeout,
        |attachment, _| -> Result<_, ApiError> {
            let cover = serde_json::to_value(attachment)?;
            let mut conn = pool.get()?;
            update_locked(&mut conn, id, |recipe| {
                let previous = recipe.cover();
                recipe.cover = Some(cover);
                Ok(previous)
            })
        },
    )
    .await?;

    Ok(Json(AttachMediaResponse {
        media: attachment,
        kind: StepKind::Image,
    }))
}

#[utoipa::path(
    put,
    path = "/api/community-recipes/{id}/steps/{index}/media",
    tag = "community_recipes",
    params(
        ("id" = Uuid, Path, description = "Community recipe ID"),
        ("index" = usize, Path, description = "Zero-based step index")
    ),
    request_body(content_type = "multipart/form-data", content = UploadMediaRequest),
    responses(
        (status = 200, description = "Step media replaced", body = AttachMediaResponse),
        (status = 400, description = "Invalid file or step index", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Media store failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn put_step_media(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<dyn MediaStore>>,
    State(config): State<Arc<ServerConfig>>,
    ApiPath((id, index)): ApiPath<(Uuid, usize)>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (data, content_type) = read_upload(&mut multipart, config.max_upload_bytes).await?;

    {
        let mut conn = pool.get()?;
        let recipe = find_owned_recipe(&mut conn, id, user.id)?;
        step_index_in_range(&recipe, index)?;
    }

    let options = UploadOptions {
        folder: format!("{}/steps", config.media_folder),
        content_type,
    };
    let (attachment, kind) = attach::replace_attachment(
        media.as_ref(),
        data,
        &options,
        config.media_timeout,
        |attachment, kind| -> Result<_, ApiError> {
            let mut conn = pool.get()?;
            update_locked(&mut conn, id, |recipe| {
                step_index_in_range(recipe, index)?;
                let mut steps = recipe.steps();
                let previous = steps[index].media.replace(attachment.clone());
                steps[index].kind = kind;
                recipe.steps = serde_json::to_value(&steps)?;
                Ok(previous)
            })
        },
    )
    .await?;

    Ok(Json(AttachMediaResponse {
        media: attachment,
        kind,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/community-recipes/{id}/steps/{index}/media",
    tag = "community_recipes",
    params(
        ("id" = Uuid, Path, description = "Community recipe ID"),
        ("index" = usize, Path, description = "Zero-based step index")
    ),
    responses(
        (status = 204, description = "Step media removed; the step is now text only"),
        (status = 400, description = "Step index out of range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_step_media(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<dyn MediaStore>>,
    State(config): State<Arc<ServerConfig>>,
    ApiPath((id, index)): ApiPath<(Uuid, usize)>,
) -> Result<impl IntoResponse, ApiError> {
    let previous = {
        let mut conn = pool.get()?;
        let recipe = find_owned_recipe(&mut conn, id, user.id)?;
        step_index_in_range(&recipe, index)?;

        update_locked(&mut conn, id, |recipe| {
            step_index_in_range(recipe, index)?;
            let mut steps = recipe.steps();
            let removed = steps[index].media.take();
            steps[index].kind = StepKind::Text;
            recipe.steps = serde_json::to_value(&steps)?;
            Ok(removed)
        })?
    };

    if let Some(previous) = previous {
        attach::discard(media.as_ref(), &previous, config.media_timeout).await;
    }

    Ok(StatusCode::NO_CONTENT)
}
