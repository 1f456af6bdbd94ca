/// 경매 API 요청/응답 모델
/// 1. 생성 요청
/// 2. 부분 수정 요청
/// 3. 응답
// region:    --- Imports
use super::model::{Auction, AuctionStatus, Item, ItemChanges, NewAuction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Requests
/// 경매 생성 요청
/// 판매자는 요청 본문이 아닌 API 계층에서 지정한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuctionDto {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub mileage: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub reserve_price: i64,
    #[serde(default)]
    pub auction_end: Option<DateTime<Utc>>,
}

impl CreateAuctionDto {
    pub fn into_new_auction(self, seller: impl Into<String>) -> NewAuction {
        NewAuction {
            seller: seller.into(),
            item: Item {
                make: self.make,
                model: self.model,
                color: self.color,
                mileage: self.mileage,
                year: self.year,
                image_url: self.image_url,
            },
            reserve_price: self.reserve_price,
            auction_end: self.auction_end,
        }
    }
}

/// 경매 부분 수정 요청
/// 누락되거나 null 인 필드는 변경하지 않는다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuctionDto {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub mileage: Option<i32>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl From<UpdateAuctionDto> for ItemChanges {
    fn from(dto: UpdateAuctionDto) -> Self {
        ItemChanges {
            make: dto.make,
            model: dto.model,
            color: dto.color,
            mileage: dto.mileage,
            year: dto.year,
        }
    }
}

// endregion: --- Requests

// region:    --- Response
/// 경매 응답
/// 상품 필드는 평탄화하여 내보낸다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionDto {
    pub id: Uuid,
    pub reserve_price: i64,
    pub seller: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub auction_end: Option<DateTime<Utc>>,
    pub status: AuctionStatus,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub mileage: i32,
    pub image_url: Option<String>,
}

impl From<Auction> for AuctionDto {
    fn from(auction: Auction) -> Self {
        let Auction {
            id,
            seller,
            item,
            reserve_price,
            auction_end,
            status,
            created_at,
            updated_at,
            version: _,
        } = auction;

        AuctionDto {
            id,
            reserve_price,
            seller,
            created_at,
            updated_at,
            auction_end,
            status,
            make: item.make,
            model: item.model,
            year: item.year,
            color: item.color,
            mileage: item.mileage,
            image_url: item.image_url,
        }
    }
}

// endregion: --- Response

// endregion: --- Tests
