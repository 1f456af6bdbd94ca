// region:    --- Imports
use super::{queries, AuctionStore, StoreError};
use crate::auction::{Auction, Item};
use crate::database::DatabaseManager;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Auction Record
/// auctions 테이블 행
#[derive(Debug, FromRow)]
struct AuctionRecord {
    id: Uuid,
    seller: String,
    reserve_price: i64,
    auction_end: Option<DateTime<Utc>>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
    make: String,
    model: String,
    color: String,
    mileage: i32,
    year: i32,
    image_url: Option<String>,
}

impl TryFrom<AuctionRecord> for Auction {
    type Error = StoreError;

    fn try_from(record: AuctionRecord) -> Result<Self, Self::Error> {
        let status = record.status.parse().map_err(StoreError::Corrupt)?;
        Ok(Auction {
            id: record.id,
            seller: record.seller,
            item: Item {
                make: record.make,
                model: record.model,
                color: record.color,
                mileage: record.mileage,
                year: record.year,
                image_url: record.image_url,
            },
            reserve_price: record.reserve_price,
            auction_end: record.auction_end,
            status,
            created_at: record.created_at,
            updated_at: record.updated_at,
            version: record.version,
        })
    }
}

// endregion: --- Auction Record

// region:    --- Postgres Auction Store
/// PostgreSQL 경매 저장소
pub struct PostgresAuctionStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresAuctionStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

#[async_trait]
impl AuctionStore for PostgresAuctionStore {
    async fn list(&self) -> Result<Vec<Auction>, StoreError> {
        let records = sqlx::query_as::<_, AuctionRecord>(queries::LIST_AUCTIONS)
            .fetch_all(self.db_manager.pool())
            .await?;
        debug!("{:<12} --> 경매 {}건 조회", "PgStore", records.len());
        records.into_iter().map(Auction::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<Auction>, StoreError> {
        sqlx::query_as::<_, AuctionRecord>(queries::GET_AUCTION)
            .bind(id)
            .fetch_optional(self.db_manager.pool())
            .await?
            .map(Auction::try_from)
            .transpose()
    }

    async fn insert(&self, auction: &Auction) -> Result<(), StoreError> {
        let auction = auction.clone();
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query(queries::INSERT_AUCTION)
                        .bind(auction.id)
                        .bind(&auction.seller)
                        .bind(auction.reserve_price)
                        .bind(auction.auction_end)
                        .bind(auction.status.as_str())
                        .bind(auction.created_at)
                        .bind(auction.updated_at)
                        .bind(auction.version)
                        .bind(&auction.item.make)
                        .bind(&auction.item.model)
                        .bind(&auction.item.color)
                        .bind(auction.item.mileage)
                        .bind(auction.item.year)
                        .bind(&auction.item.image_url)
                        .execute(&mut **tx)
                        .await?;
                    Ok::<_, StoreError>(())
                })
            })
            .await
    }

    async fn update(&self, auction: &Auction, expected_version: i64) -> Result<bool, StoreError> {
        let auction = auction.clone();
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let result = sqlx::query(queries::UPDATE_AUCTION_ITEM)
                        .bind(&auction.item.make)
                        .bind(&auction.item.model)
                        .bind(&auction.item.color)
                        .bind(auction.item.mileage)
                        .bind(auction.item.year)
                        .bind(auction.updated_at)
                        .bind(auction.version)
                        .bind(auction.id)
                        .bind(expected_version)
                        .execute(&mut **tx)
                        .await?;
                    Ok::<_, StoreError>(result.rows_affected() == 1)
                })
            })
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let result = sqlx::query(queries::DELETE_AUCTION)
                        .bind(id)
                        .execute(&mut **tx)
                        .await?;
                    Ok::<_, StoreError>(result.rows_affected() == 1)
                })
            })
            .await
    }
}

// endregion: --- Postgres Auction Store
