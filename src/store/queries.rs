/// 모든 경매 조회 (제조사 오름차순)
pub const LIST_AUCTIONS: &str = r#"
    SELECT id, seller, reserve_price, auction_end, status, created_at, updated_at, version,
           make, model, color, mileage, year, image_url
    FROM auctions
    ORDER BY make COLLATE "C" ASC, created_at ASC
"#;

/// 경매 조회
pub const GET_AUCTION: &str = r#"
    SELECT id, seller, reserve_price, auction_end, status, created_at, updated_at, version,
           make, model, color, mileage, year, image_url
    FROM auctions
    WHERE id = $1
"#;

/// 경매 생성
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (id, seller, reserve_price, auction_end, status, created_at, updated_at, version,
                          make, model, color, mileage, year, image_url)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
"#;

/// 상품 수정 (낙관적 잠금)
pub const UPDATE_AUCTION_ITEM: &str = r#"
    UPDATE auctions
    SET make = $1, model = $2, color = $3, mileage = $4, year = $5, updated_at = $6, version = $7
    WHERE id = $8 AND version = $9
"#;

/// 경매 삭제
pub const DELETE_AUCTION: &str = "DELETE FROM auctions WHERE id = $1";
