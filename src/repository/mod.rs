/// 경매 저장소 (CRUD)
/// 1. 목록 조회
/// 2. 단건 조회
/// 3. 생성
/// 4. 부분 수정
/// 5. 삭제
// region:    --- Imports
use crate::auction::{Auction, ItemChanges, NewAuction, ValidationError};
use crate::store::{AuctionStore, StoreError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time;
use tracing::{error, info, warn};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Repository Error
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Auction not found: {0}")]
    NotFound(Uuid),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

// endregion: --- Repository Error

// region:    --- Auction Repository
// 버전 충돌 시 최대 재시도 횟수
const MAX_UPDATE_RETRIES: i32 = 10;

pub struct AuctionRepository {
    store: Arc<dyn AuctionStore>,
    operation_timeout: Duration,
}

impl AuctionRepository {
    pub fn new(store: Arc<dyn AuctionStore>, operation_timeout: Duration) -> Self {
        Self {
            store,
            operation_timeout,
        }
    }

    /// 읽기 호출 (시간 제한 적용)
    /// 읽기는 중단해도 상태가 변하지 않으므로 future 를 버려도 된다.
    async fn read<T, F>(&self, operation: &'static str, fut: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result.map_err(|e| persistence_error(operation, e)),
            Err(_) => {
                error!(
                    "{:<12} --> {} 시간 초과 ({:?})",
                    "Repository", operation, self.operation_timeout
                );
                Err(RepositoryError::Persistence(format!(
                    "{} timed out after {:?}",
                    operation, self.operation_timeout
                )))
            }
        }
    }

    /// 쓰기 호출
    /// 커밋 도중 future 를 버리면 결과를 알 수 없으므로 끝까지 기다린다.
    /// 시간 제한은 저장소 쪽(statement_timeout, acquire_timeout)에서 걸린다.
    async fn write<T, F>(&self, operation: &'static str, fut: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        fut.await.map_err(|e| persistence_error(operation, e))
    }

    /// 1. 목록 조회
    pub async fn list_auctions(&self) -> Result<Vec<Auction>, RepositoryError> {
        info!("{:<12} --> 모든 경매 조회", "Repository");
        self.read("list", self.store.list()).await
    }

    /// 2. 단건 조회
    pub async fn get_auction(&self, id: Uuid) -> Result<Auction, RepositoryError> {
        info!("{:<12} --> 경매 조회 id: {}", "Repository", id);
        self.read("get", self.store.get(id))
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }

    /// 3. 생성
    pub async fn create_auction(&self, input: NewAuction) -> Result<Auction, RepositoryError> {
        let auction = Auction::create(input)?;
        self.write("insert", self.store.insert(&auction)).await?;
        info!(
            "{:<12} --> 경매 생성 id: {}, 판매자: {}",
            "Repository", auction.id, auction.seller
        );
        Ok(auction)
    }

    /// 4. 부분 수정
    /// 읽은 버전과 일치할 때만 기록하고, 충돌 시 최신 상태에 다시 병합한다.
    pub async fn update_auction(
        &self,
        id: Uuid,
        changes: ItemChanges,
    ) -> Result<Auction, RepositoryError> {
        info!("{:<12} --> 경매 수정 id: {}", "Repository", id);
        let mut retries = 0;

        while retries < MAX_UPDATE_RETRIES {
            let current = self.get_auction(id).await?;

            let Some(updated) = current.apply_changes(&changes)? else {
                info!("{:<12} --> 변경 사항 없음 id: {}", "Repository", id);
                return Ok(current);
            };

            if self
                .write("update", self.store.update(&updated, current.version))
                .await?
            {
                info!(
                    "{:<12} --> 경매 수정 완료 id: {}, 버전: {}",
                    "Repository", id, updated.version
                );
                return Ok(updated);
            }

            warn!(
                "{:<12} --> 낙관적 잠금 버전 충돌: 재시도 id: {}",
                "Repository", id
            );
            retries += 1;
        }

        Err(RepositoryError::Persistence(format!(
            "update of {} exceeded {} retries",
            id, MAX_UPDATE_RETRIES
        )))
    }

    /// 5. 삭제
    pub async fn delete_auction(&self, id: Uuid) -> Result<(), RepositoryError> {
        info!("{:<12} --> 경매 삭제 id: {}", "Repository", id);
        if self.write("delete", self.store.delete(id)).await? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(id))
        }
    }
}

fn persistence_error(operation: &'static str, e: StoreError) -> RepositoryError {
    error!("{:<12} --> {} 실패: {}", "Repository", operation, e);
    RepositoryError::Persistence(e.to_string())
}

// endregion: --- Auction Repository

// endregion: --- Tests
