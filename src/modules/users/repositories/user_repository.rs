use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;

/// Counting surface over registered users
///
/// The reporting engine only needs the headcount; user management,
/// roles and authentication live in a separate collaborator.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Count all registered users
    async fn count(&self) -> Result<i64>;
}

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
