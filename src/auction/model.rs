// region:    --- Imports
use chrono::{DateTime, Datelike, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Constants
/// 최초의 자동차 생산 연도
pub const EARLIEST_MODEL_YEAR: i32 = 1886;

// endregion: --- Constants

// region:    --- Validation Error
/// 입력값 검증 오류
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

// endregion: --- Validation Error

// region:    --- Auction Status
/// 경매 상태
/// 현재는 생성 시 Live 로만 설정되며 상태 전이는 구현하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuctionStatus {
    #[default]
    Live,
    Finished,
    ReserveNotMet,
}

impl AuctionStatus {
    /// DB 저장용 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Live => "LIVE",
            AuctionStatus::Finished => "FINISHED",
            AuctionStatus::ReserveNotMet => "RESERVE_NOT_MET",
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuctionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIVE" => Ok(AuctionStatus::Live),
            "FINISHED" => Ok(AuctionStatus::Finished),
            "RESERVE_NOT_MET" => Ok(AuctionStatus::ReserveNotMet),
            other => Err(format!("알 수 없는 경매 상태: {}", other)),
        }
    }
}

// endregion: --- Auction Status

// region:    --- Item
/// 경매 상품(차량) 모델
/// 경매에 포함되며 독립적인 식별자나 생명주기를 갖지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub make: String,
    pub model: String,
    pub color: String,
    pub mileage: i32,
    pub year: i32,
    pub image_url: Option<String>,
}

/// 상품 부분 수정 요청
/// None 인 필드는 기존 값을 유지한다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub mileage: Option<i32>,
    pub year: Option<i32>,
}

impl Item {
    /// 전달된 필드만 덮어쓴 새 상품 반환
    pub fn merged(&self, changes: &ItemChanges) -> Item {
        Item {
            make: changes.make.clone().unwrap_or_else(|| self.make.clone()),
            model: changes.model.clone().unwrap_or_else(|| self.model.clone()),
            color: changes.color.clone().unwrap_or_else(|| self.color.clone()),
            mileage: changes.mileage.unwrap_or(self.mileage),
            year: changes.year.unwrap_or(self.year),
            image_url: self.image_url.clone(),
        }
    }

    /// 상품 필드 검증
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("make", &self.make)?;
        require_text("model", &self.model)?;
        require_text("color", &self.color)?;

        if self.mileage < 0 {
            return Err(ValidationError::new(
                "mileage",
                "주행거리는 0 이상이어야 합니다.",
            ));
        }

        let latest_year = Utc::now().year() + 1;
        if !(EARLIEST_MODEL_YEAR..=latest_year).contains(&self.year) {
            return Err(ValidationError::new(
                "year",
                format!(
                    "연식은 {}년부터 {}년 사이여야 합니다.",
                    EARLIEST_MODEL_YEAR, latest_year
                ),
            ));
        }

        Ok(())
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "빈 값일 수 없습니다."));
    }
    Ok(())
}

// endregion: --- Item

// region:    --- Auction
/// 경매 생성 입력
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuction {
    pub seller: String,
    pub item: Item,
    pub reserve_price: i64,
    pub auction_end: Option<DateTime<Utc>>,
}

/// 경매 모델
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auction {
    pub id: Uuid,
    pub seller: String,
    pub item: Item,
    pub reserve_price: i64,
    pub auction_end: Option<DateTime<Utc>>,
    pub status: AuctionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl Auction {
    /// 신규 경매 생성
    /// 타임스탬프는 DB 정밀도(마이크로초)에 맞춰 자른다.
    pub fn create(input: NewAuction) -> Result<Auction, ValidationError> {
        require_text("seller", &input.seller)?;
        input.item.validate()?;
        if input.reserve_price < 0 {
            return Err(ValidationError::new(
                "reservePrice",
                "최저 낙찰가는 0 이상이어야 합니다.",
            ));
        }

        let now = Utc::now().trunc_subsecs(6);
        Ok(Auction {
            id: Uuid::new_v4(),
            seller: input.seller,
            item: input.item,
            reserve_price: input.reserve_price,
            auction_end: input.auction_end.map(|end| end.trunc_subsecs(6)),
            status: AuctionStatus::Live,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    /// 부분 수정 적용
    /// 실제로 바뀐 필드가 없으면 None 을 반환한다.
    pub fn apply_changes(&self, changes: &ItemChanges) -> Result<Option<Auction>, ValidationError> {
        let item = self.item.merged(changes);
        item.validate()?;
        if item == self.item {
            return Ok(None);
        }

        Ok(Some(Auction {
            item,
            updated_at: Utc::now().trunc_subsecs(6),
            version: self.version + 1,
            ..self.clone()
        }))
    }
}

// endregion: --- Auction

// endregion: --- Tests
