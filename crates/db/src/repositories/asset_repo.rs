//! Repository for the `assets` table.

use brieflink_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{Asset, CreateAsset};

const COLUMNS: &str = "id, project_id, kind, storage_key, label, created_at";

/// Provides registration and listing of deliverable references.
pub struct AssetRepo;

impl AssetRepo {
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (project_id, kind, storage_key, label) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(input.project_id)
            .bind(&input.kind)
            .bind(&input.storage_key)
            .bind(&input.label)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Asset>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM assets WHERE project_id = $1 ORDER BY created_at, id");
        sqlx::query_as::<_, Asset>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
