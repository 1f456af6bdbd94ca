// region:    --- Imports
use super::{AuctionStore, StoreError};
use crate::auction::Auction;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- In-Memory Auction Store
/// 프로세스 내 경매 저장소
/// 등록 순서를 유지하며, 잠금은 await 지점을 넘어 유지하지 않는다.
#[derive(Debug, Default)]
pub struct InMemoryAuctionStore {
    auctions: RwLock<Vec<Auction>>,
}

impl InMemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuctionStore for InMemoryAuctionStore {
    async fn list(&self) -> Result<Vec<Auction>, StoreError> {
        let mut auctions = self.auctions.read().await.clone();
        // 안정 정렬: 동일 제조사는 등록 순서 유지
        auctions.sort_by(|a, b| a.item.make.cmp(&b.item.make));
        Ok(auctions)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Auction>, StoreError> {
        Ok(self
            .auctions
            .read()
            .await
            .iter()
            .find(|auction| auction.id == id)
            .cloned())
    }

    async fn insert(&self, auction: &Auction) -> Result<(), StoreError> {
        let mut auctions = self.auctions.write().await;
        if auctions.iter().any(|existing| existing.id == auction.id) {
            return Err(StoreError::Conflict(auction.id));
        }
        auctions.push(auction.clone());
        Ok(())
    }

    async fn update(&self, auction: &Auction, expected_version: i64) -> Result<bool, StoreError> {
        let mut auctions = self.auctions.write().await;
        match auctions
            .iter_mut()
            .find(|existing| existing.id == auction.id && existing.version == expected_version)
        {
            Some(existing) => {
                *existing = auction.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut auctions = self.auctions.write().await;
        match auctions.iter().position(|auction| auction.id == id) {
            Some(index) => {
                auctions.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// endregion: --- In-Memory Auction Store

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::{Item, NewAuction};

    fn auction(make: &str) -> Auction {
        Auction::create(NewAuction {
            seller: "alice".to_string(),
            item: Item {
                make: make.to_string(),
                model: "Model".to_string(),
                color: "Black".to_string(),
                mileage: 100,
                year: 2019,
                image_url: None,
            },
            reserve_price: 0,
            auction_end: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn list_sorts_by_make_keeping_insertion_order_for_ties() {
        let store = InMemoryAuctionStore::new();
        let first_ford = auction("Ford");
        let toyota = auction("Toyota");
        let second_ford = auction("Ford");
        for a in [&first_ford, &toyota, &second_ford] {
            store.insert(a).await.unwrap();
        }

        let ids: Vec<Uuid> = store.list().await.unwrap().iter().map(|a| a.id).collect();

        assert_eq!(ids, vec![first_ford.id, second_ford.id, toyota.id]);
    }

    #[tokio::test]
    async fn update_requires_matching_version() {
        let store = InMemoryAuctionStore::new();
        let original = auction("Ford");
        store.insert(&original).await.unwrap();

        let mut changed = original.clone();
        changed.item.color = "Blue".to_string();
        changed.version = 2;

        assert!(!store.update(&changed, 7).await.unwrap());
        assert!(store.update(&changed, 1).await.unwrap());
        assert!(!store.update(&changed, 1).await.unwrap());
        assert_eq!(store.get(original.id).await.unwrap().unwrap().item.color, "Blue");
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let store = InMemoryAuctionStore::new();
        let a = auction("BMW");
        store.insert(&a).await.unwrap();

        assert!(store.delete(a.id).await.unwrap());
        assert!(!store.delete(a.id).await.unwrap());
        assert!(store.get(a.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_id() {
        let store = InMemoryAuctionStore::new();
        let a = auction("BMW");
        store.insert(&a).await.unwrap();

        assert!(matches!(
            store.insert(&a).await,
            Err(StoreError::Conflict(id)) if id == a.id
        ));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
// endregion: --- Tests
