use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::resync::models::UnfundedOrderRecord;

/// Sale-order store contract used by the resync coordinator.
///
/// The store owns the records; the coordinator only reads the flagged set
/// and clears flags. Implementations handle their own concurrency.
#[async_trait]
pub trait SaleOrderStore: Send + Sync {
    async fn list_needing_resync(&self) -> Result<Vec<UnfundedOrderRecord>, StoreError>;

    async fn set_needs_resync(&self, order_id: &str, needs_resync: bool) -> Result<(), StoreError>;
}

/// In-memory sale-order store
pub struct InMemorySaleOrderStore {
    records: RwLock<HashMap<String, UnfundedOrderRecord>>,
}

impl InMemorySaleOrderStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, record: UnfundedOrderRecord) {
        let mut records = self.records.write().await;
        records.insert(record.order_id.clone(), record);
    }

    pub async fn get(&self, order_id: &str) -> Option<UnfundedOrderRecord> {
        let records = self.records.read().await;
        records.get(order_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for InMemorySaleOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SaleOrderStore for InMemorySaleOrderStore {
    async fn list_needing_resync(&self) -> Result<Vec<UnfundedOrderRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.values().filter(|r| r.needs_resync).cloned().collect())
    }

    async fn set_needs_resync(&self, order_id: &str, needs_resync: bool) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(order_id)
            .ok_or_else(|| StoreError::NotFound(order_id.to_string()))?;
        record.needs_resync = needs_resync;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::Coin;
    use chrono::Utc;

    #[tokio::test]
    async fn test_lists_only_flagged_orders() {
        let store = InMemorySaleOrderStore::new();
        store.insert(UnfundedOrderRecord::flagged("a", Coin::Bitcoin, Utc::now())).await;
        store
            .insert(UnfundedOrderRecord {
                order_id: "b".to_string(),
                payment_coin: Coin::Litecoin,
                timestamp: Utc::now(),
                needs_resync: false,
            })
            .await;

        let flagged = store.list_needing_resync().await.unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].order_id, "a");
    }

    #[tokio::test]
    async fn test_set_flag() {
        let store = InMemorySaleOrderStore::new();
        store.insert(UnfundedOrderRecord::flagged("a", Coin::Bitcoin, Utc::now())).await;

        store.set_needs_resync("a", false).await.unwrap();
        assert!(!store.get("a").await.unwrap().needs_resync);
        assert_eq!(store.len().await, 1);

        let err = store.set_needs_resync("missing", false).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "missing"));
    }
}
