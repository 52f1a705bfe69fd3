use chrono::{DateTime, Utc};
use diesel::prelude::*;
use potluck_core::{Difficulty, Listable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub item_suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::shops)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Shop {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shops)]
pub struct NewShop<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::shopping_list_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShoppingListItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub shop_ids: Vec<Uuid>,
    pub is_checked: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shopping_list_items)]
pub struct NewShoppingListItem<'a> {
    pub user_id: Uuid,
    pub text: &'a str,
    pub shop_ids: &'a [Uuid],
    pub is_checked: bool,
    pub sort_order: i32,
}

/// Partial update; `None` fields are left unchanged.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::shopping_list_items)]
pub struct ShoppingListItemChanges<'a> {
    pub text: Option<&'a str>,
    pub shop_ids: Option<Vec<Uuid>>,
    pub is_checked: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::favorite_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FavoriteItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub shop_ids: Vec<Uuid>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorite_items)]
pub struct NewFavoriteItem<'a> {
    pub user_id: Uuid,
    pub text: &'a str,
    pub shop_ids: &'a [Uuid],
    pub sort_order: i32,
}

/// Image or video attached to a recipe cover or step (JSONB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MediaAttachment {
    pub url: String,
    /// Media store identifier. Absent for media referenced from the
    /// catalog, which is never deleted from the store.
    #[serde(default)]
    pub media_id: Option<String>,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub format: Option<String>,
}

impl MediaAttachment {
    pub fn external(url: String) -> Self {
        Self {
            url,
            media_id: None,
            width: None,
            height: None,
            format: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Image,
    Video,
    #[default]
    Text,
}

/// Step of an official recipe (JSONB).
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OfficialStep {
    #[serde(default)]
    pub kind: StepKind,
    /// URL of the step's image or video, if any
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Step of a community recipe (JSONB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Step {
    #[serde(default)]
    pub kind: StepKind,
    #[serde(default)]
    pub media: Option<MediaAttachment>,
    #[serde(default)]
    pub description: String,
}

impl From<OfficialStep> for Step {
    fn from(step: OfficialStep) -> Self {
        Self {
            kind: step.kind,
            media: step.source.map(MediaAttachment::external),
            description: step.description,
        }
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OfficialRecipe {
    pub id: Uuid,
    pub title: String,
    pub difficulty: String,
    pub time_label: String,
    pub cover_image: Option<String>,
    pub ingredients: serde_json::Value,
    pub steps: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OfficialRecipe {
    pub fn ingredients(&self) -> Vec<String> {
        serde_json::from_value(self.ingredients.clone()).unwrap_or_default()
    }

    pub fn steps(&self) -> Vec<OfficialStep> {
        serde_json::from_value(self.steps.clone()).unwrap_or_default()
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewOfficialRecipe<'a> {
    pub title: &'a str,
    pub difficulty: &'a str,
    pub time_label: &'a str,
    pub cover_image: Option<&'a str>,
    pub ingredients: serde_json::Value,
    pub steps: serde_json::Value,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::community_recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommunityRecipe {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub source_recipe_id: Option<Uuid>,
    pub title: String,
    pub difficulty: String,
    pub time_label: String,
    pub cover: Option<serde_json::Value>,
    pub ingredients: serde_json::Value,
    pub steps: serde_json::Value,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommunityRecipe {
    pub fn cover(&self) -> Option<MediaAttachment> {
        self.cover
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn ingredients(&self) -> Vec<String> {
        serde_json::from_value(self.ingredients.clone()).unwrap_or_default()
    }

    pub fn steps(&self) -> Vec<Step> {
        serde_json::from_value(self.steps.clone()).unwrap_or_default()
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == Some(user_id)
    }
}

impl Listable for CommunityRecipe {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn rating_avg(&self) -> f64 {
        self.rating_avg
    }

    fn rating_count(&self) -> i32 {
        self.rating_count
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::from_label(&self.difficulty)
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::community_recipes)]
pub struct NewCommunityRecipe {
    pub owner_id: Option<Uuid>,
    pub source_recipe_id: Option<Uuid>,
    pub title: String,
    pub difficulty: String,
    pub time_label: String,
    pub cover: Option<serde_json::Value>,
    pub ingredients: serde_json::Value,
    pub steps: serde_json::Value,
}

impl NewCommunityRecipe {
    /// Copy the catalog fields of an official recipe into a fresh twin with
    /// no ratings.
    pub fn twin_of(official: &OfficialRecipe) -> Result<Self, serde_json::Error> {
        let steps: Vec<Step> = official.steps().into_iter().map(Step::from).collect();
        let cover = official
            .cover_image
            .clone()
            .map(MediaAttachment::external)
            .map(|c| serde_json::to_value(&c))
            .transpose()?;

        Ok(Self {
            owner_id: None,
            source_recipe_id: Some(official.id),
            title: official.title.clone(),
            difficulty: official.difficulty.clone(),
            time_label: official.time_label.clone(),
            cover,
            ingredients: official.ingredients.clone(),
            steps: serde_json::to_value(&steps)?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::community_recipe_ratings)]
pub struct NewRating {
    pub community_recipe_id: Uuid,
    pub user_id: Uuid,
    pub value: i16,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::saved_community_recipes)]
pub struct NewSavedRecipe {
    pub user_id: Uuid,
    pub community_recipe_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn official() -> OfficialRecipe {
        OfficialRecipe {
            id: Uuid::new_v4(),
            title: "Shakshuka".to_string(),
            difficulty: "Intermediate".to_string(),
            time_label: "35 min".to_string(),
            cover_image: Some("https://cdn.example/shakshuka.jpg".to_string()),
            ingredients: json!(["eggs", "tomatoes"]),
            steps: json!([
                {"kind": "image", "source": "https://cdn.example/step1.jpg", "description": "Chop"},
                {"kind": "text", "description": "Simmer"}
            ]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_twin_copies_catalog_fields() {
        let recipe = official();
        let twin = NewCommunityRecipe::twin_of(&recipe).unwrap();

        assert_eq!(twin.source_recipe_id, Some(recipe.id));
        assert_eq!(twin.owner_id, None);
        assert_eq!(twin.title, "Shakshuka");
        assert_eq!(twin.ingredients, json!(["eggs", "tomatoes"]));

        let steps: Vec<Step> = serde_json::from_value(twin.steps).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].kind, StepKind::Image);
        let media = steps[0].media.as_ref().unwrap();
        assert_eq!(media.url, "https://cdn.example/step1.jpg");
        assert!(media.media_id.is_none());
        assert!(steps[1].media.is_none());

        let cover: MediaAttachment = serde_json::from_value(twin.cover.unwrap()).unwrap();
        assert_eq!(cover.url, "https://cdn.example/shakshuka.jpg");
        assert!(cover.media_id.is_none());
    }

    #[test]
    fn test_steps_tolerate_missing_fields() {
        let steps: Vec<Step> = serde_json::from_value(json!([{"description": "Stir"}])).unwrap();
        assert_eq!(steps[0].kind, StepKind::Text);
        assert!(steps[0].media.is_none());
    }
}
