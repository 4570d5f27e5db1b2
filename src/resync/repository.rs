use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::error::StoreError;
use crate::resync::models::UnfundedOrderRecord;
use crate::resync::store::SaleOrderStore;

/// Postgres-backed sale-order store over the `sales` table
pub struct PgSaleOrderStore {
    pool: PgPool,
}

impl PgSaleOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SaleOrderStore for PgSaleOrderStore {
    async fn list_needing_resync(&self) -> Result<Vec<UnfundedOrderRecord>, StoreError> {
        let records = sqlx::query_as::<_, UnfundedOrderRecord>(
            r#"
            SELECT order_id, payment_coin, timestamp, needs_sync
            FROM sales
            WHERE needs_sync = TRUE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Loaded {} sales needing resync", records.len());
        Ok(records)
    }

    async fn set_needs_resync(&self, order_id: &str, needs_resync: bool) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE sales
            SET needs_sync = $2
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .bind(needs_resync)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(order_id.to_string()));
        }

        Ok(())
    }
}
