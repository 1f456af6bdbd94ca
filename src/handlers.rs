// region:    --- Imports
use crate::auction::dto::{AuctionDto, CreateAuctionDto, UpdateAuctionDto};
use crate::repository::{AuctionRepository, RepositoryError};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- App State
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<AuctionRepository>,
    /// 인증 도입 전까지 사용하는 판매자 값
    pub placeholder_seller: Arc<str>,
}

// endregion: --- App State

// region:    --- Api Error
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// 쓰기 요청 오류 변환 (저장 실패는 400)
    fn from_write(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ApiError::NotFound,
            RepositoryError::Validation(e) => ApiError::BadRequest(e.to_string()),
            RepositoryError::Persistence(_) => {
                ApiError::BadRequest("Could not save changes to the DB".to_string())
            }
        }
    }

    /// 읽기 요청 오류 변환 (저장소 장애는 500)
    fn from_read(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ApiError::NotFound,
            other => {
                error!("{:<12} --> 조회 실패: {}", "Handler", other);
                ApiError::Internal("Could not read auctions from the DB".to_string())
            }
        }
    }

    fn to_status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "Auction with the specified id was not found".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = self.to_status_and_message();
        warn!("{:<12} --> {} {}", "Handler", status, msg);
        (status, Json(ErrorBody { error: msg })).into_response()
    }
}

// endregion: --- Api Error

// region:    --- Query Handlers

/// 모든 경매 조회
pub async fn handle_get_auctions(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuctionDto>>, ApiError> {
    info!("{:<12} --> 모든 경매 조회", "HandlerQuery");
    let auctions = state
        .repository
        .list_auctions()
        .await
        .map_err(ApiError::from_read)?;
    Ok(Json(auctions.into_iter().map(AuctionDto::from).collect()))
}

/// 경매 조회
pub async fn handle_get_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AuctionDto>, ApiError> {
    info!("{:<12} --> 경매 조회 id: {}", "HandlerQuery", id);
    let auction = state
        .repository
        .get_auction(id)
        .await
        .map_err(ApiError::from_read)?;
    Ok(Json(AuctionDto::from(auction)))
}

// endregion: --- Query Handlers

// region:    --- Command Handlers

/// 경매 생성
pub async fn handle_create_auction(
    State(state): State<AppState>,
    Json(dto): Json<CreateAuctionDto>,
) -> Result<Response, ApiError> {
    info!("{:<12} --> 경매 생성 요청: {:?}", "Command", dto);
    let input = dto.into_new_auction(&*state.placeholder_seller);
    let auction = state
        .repository
        .create_auction(input)
        .await
        .map_err(ApiError::from_write)?;

    let location = format!("/api/auctions/{}", auction.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(AuctionDto::from(auction)),
    )
        .into_response())
}

/// 경매 부분 수정
pub async fn handle_update_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateAuctionDto>,
) -> Result<StatusCode, ApiError> {
    info!("{:<12} --> 경매 수정 요청 id: {}, {:?}", "Command", id, dto);
    state
        .repository
        .update_auction(id, dto.into())
        .await
        .map_err(ApiError::from_write)?;
    Ok(StatusCode::OK)
}

/// 경매 삭제
pub async fn handle_delete_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    info!("{:<12} --> 경매 삭제 요청 id: {}", "Command", id);
    state
        .repository
        .delete_auction(id)
        .await
        .map_err(ApiError::from_write)?;
    Ok(StatusCode::OK)
}

/// 헬스 체크
pub async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// endregion: --- Command Handlers
