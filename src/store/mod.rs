// region:    --- Imports
use crate::auction::Auction;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;
pub mod queries;

pub use memory::InMemoryAuctionStore;
pub use postgres::PostgresAuctionStore;

// endregion: --- Imports

// region:    --- Store Error
/// 저장소 오류
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("저장된 데이터 변환 실패: {0}")]
    Corrupt(String),

    #[error("저장소 사용 불가: {0}")]
    Unavailable(String),

    #[error("이미 존재하는 경매 id: {0}")]
    Conflict(Uuid),
}

// endregion: --- Store Error

// region:    --- Auction Store Trait
/// 경매 저장소 트레이트
/// 모든 쓰기는 단일 경매(상품 포함) 단위로 원자적이어야 한다.
/// 쓰기는 호출 측에서 취소하지 않으므로 시간 제한은 구현체가 보장해야 한다.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuctionStore: Send + Sync + 'static {
    /// 상품 제조사 오름차순, 동일 제조사는 등록 순서대로 반환
    async fn list(&self) -> Result<Vec<Auction>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Auction>, StoreError>;

    async fn insert(&self, auction: &Auction) -> Result<(), StoreError>;

    /// 저장된 버전이 expected_version 과 같을 때만 기록
    /// 기록되지 않았으면(버전 충돌 또는 삭제됨) false 반환
    async fn update(&self, auction: &Auction, expected_version: i64) -> Result<bool, StoreError>;

    /// 삭제된 행이 없으면 false 반환
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

// endregion: --- Auction Store Trait
