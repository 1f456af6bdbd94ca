// region:    --- Imports
use crate::config::{Config, StorageBackend};
use crate::database::DatabaseManager;
use crate::handlers::{self, AppState};
use crate::repository::AuctionRepository;
use crate::store::{AuctionStore, InMemoryAuctionStore, PostgresAuctionStore};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

// endregion: --- Imports

// region:    --- Storage
/// 설정에 따른 저장소 생성
pub async fn build_store(config: &Config) -> Result<Arc<dyn AuctionStore>, sqlx::Error> {
    match (config.storage_backend, &config.database) {
        (StorageBackend::Postgres, Some(database)) => {
            let db_manager = Arc::new(DatabaseManager::new(database).await?);
            db_manager.initialize_database().await?;
            info!("{:<12} --> PostgreSQL 저장소 사용", "App");
            Ok(Arc::new(PostgresAuctionStore::new(db_manager)))
        }
        (StorageBackend::Postgres, None) => Err(sqlx::Error::Configuration(
            "DATABASE_URL must be set for the postgres backend".into(),
        )),
        (StorageBackend::Memory, _) => {
            info!("{:<12} --> 인메모리 저장소 사용", "App");
            Ok(Arc::new(InMemoryAuctionStore::new()))
        }
    }
}

// endregion: --- Storage

// region:    --- Router
/// 라우터 설정
pub fn build_router(state: AppState) -> Router {
    // 마켓플레이스 프론트엔드를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/auctions",
            get(handlers::handle_get_auctions).post(handlers::handle_create_auction),
        )
        .route(
            "/api/auctions/:id",
            get(handlers::handle_get_auction)
                .put(handlers::handle_update_auction)
                .delete(handlers::handle_delete_auction),
        )
        .route("/health", get(handlers::handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

/// 저장소와 설정으로 애플리케이션 상태 구성
pub fn build_state(store: Arc<dyn AuctionStore>, config: &Config) -> AppState {
    AppState {
        repository: Arc::new(AuctionRepository::new(store, config.operation_timeout)),
        placeholder_seller: Arc::from(config.placeholder_seller.as_str()),
    }
}

// endregion: --- Router
