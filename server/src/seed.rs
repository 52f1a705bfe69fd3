//! Loading official recipes into the catalog from a JSON file.
//!
//! The file holds an array of recipes. Recipes whose title already exists
//! in the catalog are skipped, so seeding the same file twice is harmless.

use anyhow::Context;
use diesel::prelude::*;
use potluck_core::Difficulty;
use serde::Deserialize;
use std::path::Path;

use crate::db::DbPool;
use crate::models::{NewOfficialRecipe, OfficialStep};
use crate::schema::recipes;

#[derive(Debug, Deserialize)]
pub struct SeedRecipe {
    pub title: String,
    pub difficulty: String,
    #[serde(default)]
    pub time_label: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<OfficialStep>,
}

pub fn parse_catalog(json: &str) -> anyhow::Result<Vec<SeedRecipe>> {
    let recipes: Vec<SeedRecipe> =
        serde_json::from_str(json).context("Catalog file is not a JSON array of recipes")?;

    for recipe in &recipes {
        if recipe.title.trim().is_empty() {
            anyhow::bail!("Catalog contains a recipe without a title");
        }
        recipe
            .difficulty
            .parse::<Difficulty>()
            .with_context(|| format!("Recipe '{}'", recipe.title))?;
    }

    Ok(recipes)
}

/// Insert every recipe from `path` that isn't in the catalog yet.
/// Returns how many were inserted.
pub fn seed_catalog(pool: &DbPool, path: &Path) -> anyhow::Result<usize> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let catalog = parse_catalog(&json)?;

    let mut conn = pool.get().context("Failed to get DB connection")?;

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        let mut inserted = 0;
        for recipe in &catalog {
            let title = recipe.title.trim();
            let exists: bool = diesel::select(diesel::dsl::exists(
                recipes::table.filter(recipes::title.eq(title)),
            ))
            .get_result(conn)?;
            if exists {
                tracing::debug!(title, "Catalog recipe already present, skipping");
                continue;
            }

            let difficulty = Difficulty::from_label(&recipe.difficulty);
            diesel::insert_into(recipes::table)
                .values(&NewOfficialRecipe {
                    title,
                    difficulty: difficulty.as_str(),
                    time_label: recipe.time_label.trim(),
                    cover_image: recipe.cover_image.as_deref(),
                    ingredients: serde_json::to_value(&recipe.ingredients)?,
                    steps: serde_json::to_value(&recipe.steps)?,
                })
                .execute(conn)?;
            inserted += 1;
        }
        Ok(inserted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepKind;

    #[test]
    fn test_parse_catalog() {
        let catalog = parse_catalog(
            r#"[
                {
                    "title": "Tomato Soup",
                    "difficulty": "beginner",
                    "time_label": "30 min",
                    "ingredients": ["tomatoes", "stock"],
                    "steps": [
                        {"kind": "video", "source": "https://cdn.example/blend.mp4", "description": "Blend"}
                    ]
                },
                {"title": "Toast", "difficulty": "Beginner"}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].steps[0].kind, StepKind::Video);
        assert!(catalog[1].steps.is_empty());
        assert_eq!(catalog[1].time_label, "");
    }

    #[test]
    fn test_parse_catalog_rejects_unknown_difficulty() {
        let err = parse_catalog(r#"[{"title": "Soufflé", "difficulty": "Expert"}]"#).unwrap_err();
        assert!(format!("{:#}", err).contains("Soufflé"));
    }

    #[test]
    fn test_parse_catalog_rejects_missing_title() {
        assert!(parse_catalog(r#"[{"title": " ", "difficulty": "Hard"}]"#).is_err());
        assert!(parse_catalog(r#"{"title": "x"}"#).is_err());
    }
}
