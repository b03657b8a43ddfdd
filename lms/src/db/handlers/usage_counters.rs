//! Database repository for named API usage counters.

use crate::db::errors::Result;
use sqlx::PgConnection;
use tracing::instrument;

pub struct UsageCounters<'c> {
    db: &'c mut PgConnection,
}

impl<'c> UsageCounters<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Atomically bump the counter for `api_name`, creating it at 1 when absent.
    #[instrument(skip(self), err)]
    pub async fn increment(&mut self, api_name: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO usage_counters (api_name, count) VALUES ($1, 1)
            ON CONFLICT (api_name) DO UPDATE SET count = usage_counters.count + 1
            RETURNING count
            "#,
        )
        .bind(api_name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(count)
    }

    #[cfg(test)]
    pub async fn get(&mut self, api_name: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT count FROM usage_counters WHERE api_name = $1")
            .bind(api_name)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(count.unwrap_or(0))
    }
}
