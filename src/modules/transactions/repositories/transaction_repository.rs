use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::Result;

/// Read-only aggregation surface over the transaction store
///
/// Every method maps to a single aggregate query; the reporting engine
/// never materializes transaction rows. Date ranges are inclusive of
/// both endpoints. Empty ranges and unknown structures yield zero, not
/// an error (`COALESCE(SUM(amount), 0)` on the SQL side).
#[async_trait]
pub trait TransactionStatsRepository: Send + Sync {
    /// Count all transactions in the store
    async fn total_count(&self) -> Result<i64>;

    /// Sum all transaction amounts
    async fn total_revenue(&self) -> Result<Decimal>;

    /// Count transactions dated within [start, end]
    async fn count_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<i64>;

    /// Sum transaction amounts dated within [start, end]
    async fn revenue_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Decimal>;

    /// Count transactions belonging to a structure
    async fn count_by_structure(&self, structure_id: i64) -> Result<i64>;

    /// Sum transaction amounts belonging to a structure
    async fn revenue_by_structure(&self, structure_id: i64) -> Result<Decimal>;

    /// Sum transaction amounts for one service category within [start, end]
    async fn revenue_by_category_in_range(
        &self,
        category: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Decimal>;

    /// Distinct service categories with transactions within [start, end]
    async fn categories_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<String>>;
}

pub struct MySqlTransactionRepository {
    pool: MySqlPool,
}

impl MySqlTransactionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStatsRepository for MySqlTransactionRepository {
    async fn total_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn total_revenue(&self) -> Result<Decimal> {
        let revenue: Decimal =
            sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0) FROM transactions")
                .fetch_one(&self.pool)
                .await?;

        Ok(revenue)
    }

    async fn count_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE transaction_date BETWEEN ? AND ?
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn revenue_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Decimal> {
        let revenue: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE transaction_date BETWEEN ? AND ?
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(revenue)
    }

    async fn count_by_structure(&self, structure_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE structure_id = ?
            "#,
        )
        .bind(structure_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn revenue_by_structure(&self, structure_id: i64) -> Result<Decimal> {
        let revenue: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE structure_id = ?
            "#,
        )
        .bind(structure_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(revenue)
    }

    async fn revenue_by_category_in_range(
        &self,
        category: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Decimal> {
        // Category lives on the service a transaction was recorded against
        let revenue: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(t.amount), 0)
            FROM transactions t
            INNER JOIN services s ON s.id = t.service_id
            WHERE s.category = ?
              AND t.transaction_date BETWEEN ? AND ?
            "#,
        )
        .bind(category)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(revenue)
    }

    async fn categories_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT s.category
            FROM transactions t
            INNER JOIN services s ON s.id = t.service_id
            WHERE t.transaction_date BETWEEN ? AND ?
            ORDER BY s.category
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}
