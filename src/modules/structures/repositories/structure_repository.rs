use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::structures::models::Structure;

/// Read-only lookup surface over structures
///
/// The reporting engine checks existence before computing per-structure
/// sums and walks all structures when ranking performers. Soft-deleted
/// structures (`active = false`) stay visible to reporting so historical
/// revenue does not vanish from aggregates.
#[async_trait]
pub trait StructureRepository: Send + Sync {
    /// Check whether a structure with this id exists
    async fn exists(&self, id: i64) -> Result<bool>;

    /// Find a structure by id
    async fn find_by_id(&self, id: i64) -> Result<Option<Structure>>;

    /// List all structures, ordered by ascending id
    async fn find_all(&self) -> Result<Vec<Structure>>;

    /// Count all structures
    async fn count(&self) -> Result<i64>;
}

pub struct MySqlStructureRepository {
    pool: MySqlPool,
}

impl MySqlStructureRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StructureRepository for MySqlStructureRepository {
    async fn exists(&self, id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM structures
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Structure>> {
        let structure = sqlx::query_as::<_, Structure>(
            r#"
            SELECT id, name, description, active
            FROM structures
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(structure)
    }

    async fn find_all(&self) -> Result<Vec<Structure>> {
        let structures = sqlx::query_as::<_, Structure>(
            r#"
            SELECT id, name, description, active
            FROM structures
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(structures)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM structures")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
