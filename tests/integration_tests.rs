use async_trait::async_trait;
use auction_catalog::app;
use auction_catalog::auction::dto::AuctionDto;
use auction_catalog::auction::{Auction, Item, ItemChanges, NewAuction};
use auction_catalog::config::{Config, DatabaseConfig};
use auction_catalog::database::DatabaseManager;
use auction_catalog::repository::{AuctionRepository, RepositoryError};
use auction_catalog::store::{
    AuctionStore, InMemoryAuctionStore, PostgresAuctionStore, StoreError,
};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use uuid::Uuid;

/// 인메모리 저장소로 서버 실행 후 주소 반환
async fn spawn_server() -> String {
    spawn_server_with(Arc::new(InMemoryAuctionStore::new())).await
}

/// 주어진 저장소로 서버 실행 후 주소 반환
async fn spawn_server_with(store: Arc<dyn AuctionStore>) -> String {
    let config = Config::from_lookup(|key: &str| match key {
        "STORAGE_BACKEND" => Some("memory".to_string()),
        "PLACEHOLDER_SELLER" => Some("alice".to_string()),
        _ => None,
    })
    .unwrap();
    let router = app::build_router(app::build_state(store, &config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

/// 테스트용 경매 생성 요청
async fn create_test_auction(client: &Client, base: &str, make: &str) -> AuctionDto {
    let response = client
        .post(format!("{}/api/auctions", base))
        .json(&json!({
            "make": make,
            "model": "Mustang",
            "color": "Red",
            "mileage": 15000,
            "year": 2020
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

/// 경매 생성 테스트
#[tokio::test]
async fn test_create_auction() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/auctions", base))
        .json(&json!({
            "make": "Ford",
            "model": "Mustang",
            "color": "Red",
            "mileage": 15000,
            "year": 2020,
            "reservePrice": 20000,
            "imageUrl": "https://cdn.example.com/mustang.jpg"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let created: Value = response.json().await.unwrap();

    assert_eq!(location, format!("/api/auctions/{}", created["id"].as_str().unwrap()));
    assert_eq!(created["seller"], "alice");
    assert_eq!(created["make"], "Ford");
    assert_eq!(created["model"], "Mustang");
    assert_eq!(created["color"], "Red");
    assert_eq!(created["mileage"], 15000);
    assert_eq!(created["year"], 2020);
    assert_eq!(created["reservePrice"], 20000);
    assert_eq!(created["status"], "Live");

    // Location 헤더로 조회
    let fetched: Value = client
        .get(format!("{}{}", base, location))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

/// 잘못된 생성 요청 테스트
#[tokio::test]
async fn test_create_auction_rejects_invalid_item() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/auctions", base))
        .json(&json!({
            "make": "Ford",
            "model": "Mustang",
            "color": "Red",
            "mileage": -1,
            "year": 2020
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("mileage"));

    let list: Vec<AuctionDto> = client
        .get(format!("{}/api/auctions", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());
}

/// 목록 정렬 테스트
#[tokio::test]
async fn test_list_auctions_ordered_by_make() {
    let base = spawn_server().await;
    let client = Client::new();

    for make in ["Toyota", "Ford", "BMW"] {
        create_test_auction(&client, &base, make).await;
    }

    let response = client
        .get(format!("{}/api/auctions", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let auctions: Vec<AuctionDto> = response.json().await.unwrap();
    let makes: Vec<&str> = auctions.iter().map(|a| a.make.as_str()).collect();
    assert_eq!(makes, vec!["BMW", "Ford", "Toyota"]);
}

/// 부분 수정 테스트
#[tokio::test]
async fn test_update_auction_merges_fields() {
    let base = spawn_server().await;
    let client = Client::new();
    let created = create_test_auction(&client, &base, "Ford").await;

    let response = client
        .put(format!("{}/api/auctions/{}", base, created.id))
        .json(&json!({ "color": "Blue", "mileage": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: AuctionDto = client
        .get(format!("{}/api/auctions/{}", base, created.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated.color, "Blue");
    assert_eq!(updated.make, created.make);
    assert_eq!(updated.model, created.model);
    assert_eq!(updated.mileage, created.mileage);
    assert_eq!(updated.year, created.year);
    assert_eq!(updated.created_at, created.created_at);
}

/// 존재하지 않는 경매 테스트
#[tokio::test]
async fn test_missing_auction_returns_not_found() {
    let base = spawn_server().await;
    let client = Client::new();
    let url = format!("{}/api/auctions/{}", base, Uuid::new_v4());

    let get = client.get(&url).send().await.unwrap();
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    let put = client
        .put(&url)
        .json(&json!({ "make": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(put.status(), StatusCode::NOT_FOUND);

    let delete = client.delete(&url).send().await.unwrap();
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
}

/// 잘못된 id 형식 테스트
#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/auctions/not-a-uuid", base))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// 삭제 테스트
#[tokio::test]
async fn test_delete_auction_twice() {
    let base = spawn_server().await;
    let client = Client::new();
    let created = create_test_auction(&client, &base, "Ford").await;
    let url = format!("{}/api/auctions/{}", base, created.id);

    let first = client.delete(&url).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let get = client.get(&url).send().await.unwrap();
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    let second = client.delete(&url).send().await.unwrap();
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

/// 범위를 벗어난 연식으로 수정 테스트
#[tokio::test]
async fn test_update_auction_rejects_invalid_year() {
    let base = spawn_server().await;
    let client = Client::new();
    let created = create_test_auction(&client, &base, "Ford").await;
    let url = format!("{}/api/auctions/{}", base, created.id);

    let response = client
        .put(&url)
        .json(&json!({ "year": 1200 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("year"));

    let unchanged: AuctionDto = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(unchanged, created);
}

/// 항상 실패하는 저장소
struct FailingStore;

#[async_trait]
impl AuctionStore for FailingStore {
    async fn list(&self) -> Result<Vec<Auction>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn get(&self, _id: Uuid) -> Result<Option<Auction>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn insert(&self, _auction: &Auction) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn update(&self, _auction: &Auction, _expected_version: i64) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// 저장소 장애 시 읽기는 500, 쓰기는 400 테스트
#[tokio::test]
async fn test_storage_failure_status_mapping() {
    let base = spawn_server_with(Arc::new(FailingStore)).await;
    let client = Client::new();
    let url = format!("{}/api/auctions/{}", base, Uuid::new_v4());

    let list = client
        .get(format!("{}/api/auctions", base))
        .send()
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = list.json().await.unwrap();
    assert_eq!(body["error"], "Could not read auctions from the DB");

    let get = client.get(&url).send().await.unwrap();
    assert_eq!(get.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = get.json().await.unwrap();
    assert!(!body["error"].as_str().unwrap().contains("connection refused"));

    let post = client
        .post(format!("{}/api/auctions", base))
        .json(&json!({
            "make": "Ford",
            "model": "Mustang",
            "color": "Red",
            "mileage": 15000,
            "year": 2020
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(post.status(), StatusCode::BAD_REQUEST);
    assert!(post.headers().get(reqwest::header::LOCATION).is_none());
    let body: Value = post.json().await.unwrap();
    assert_eq!(body["error"], "Could not save changes to the DB");

    let put = client
        .put(&url)
        .json(&json!({ "color": "Blue" }))
        .send()
        .await
        .unwrap();
    assert_eq!(put.status(), StatusCode::BAD_REQUEST);
    let body: Value = put.json().await.unwrap();
    assert_eq!(body["error"], "Could not save changes to the DB");

    let delete = client.delete(&url).send().await.unwrap();
    assert_eq!(delete.status(), StatusCode::BAD_REQUEST);
    let body: Value = delete.json().await.unwrap();
    assert_eq!(body["error"], "Could not save changes to the DB");
}

/// 동시 수정 테스트
/// 서로 다른 필드를 동시에 수정해도 어느 한쪽도 유실되지 않아야 한다.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_keep_all_fields() {
    let repository = Arc::new(AuctionRepository::new(
        Arc::new(InMemoryAuctionStore::new()),
        Duration::from_secs(5),
    ));
    let created = repository
        .create_auction(test_new_auction("alice", "Ford"))
        .await
        .unwrap();

    let mut handles = vec![];
    for i in 1..=20 {
        let repository = Arc::clone(&repository);
        let id = created.id;
        handles.push(tokio::spawn(async move {
            let changes = if i % 2 == 0 {
                ItemChanges {
                    color: Some("Blue".to_string()),
                    ..Default::default()
                }
            } else {
                ItemChanges {
                    mileage: Some(20000),
                    ..Default::default()
                }
            };
            repository.update_auction(id, changes).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let updated = repository.get_auction(created.id).await.unwrap();
    assert_eq!(updated.item.color, "Blue");
    assert_eq!(updated.item.mileage, 20000);
    assert_eq!(updated.item.make, "Ford");
}

fn test_new_auction(seller: &str, make: &str) -> NewAuction {
    NewAuction {
        seller: seller.to_string(),
        item: Item {
            make: make.to_string(),
            model: "Mustang".to_string(),
            color: "Red".to_string(),
            mileage: 15000,
            year: 2020,
            image_url: None,
        },
        reserve_price: 0,
        auction_end: None,
    }
}

/// PostgreSQL 저장소 테스트 (DATABASE_URL 설정 시에만 실행)
#[tokio::test]
async fn test_postgres_store_lifecycle() {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL 미설정: PostgreSQL 테스트 생략");
        return;
    };
    let db_manager = Arc::new(
        DatabaseManager::new(&DatabaseConfig {
            url,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            statement_timeout: Duration::from_secs(10),
        })
        .await
        .unwrap(),
    );
    db_manager.initialize_database().await.unwrap();
    let repository = AuctionRepository::new(
        Arc::new(PostgresAuctionStore::new(db_manager)),
        Duration::from_secs(10),
    );

    // 생성 후 조회
    let created = repository
        .create_auction(test_new_auction("alice", "Ford"))
        .await
        .unwrap();
    let fetched = repository.get_auction(created.id).await.unwrap();
    assert_eq!(fetched, created);

    // 부분 수정
    let changes = ItemChanges {
        make: Some("Lincoln".to_string()),
        ..Default::default()
    };
    repository.update_auction(created.id, changes).await.unwrap();
    let updated = repository.get_auction(created.id).await.unwrap();
    assert_eq!(updated.item.make, "Lincoln");
    assert_eq!(updated.item.model, created.item.model);
    assert_eq!(updated.version, created.version + 1);

    // 목록 포함 확인
    let listed = repository.list_auctions().await.unwrap();
    assert!(listed.iter().any(|a| a.id == created.id));
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].item.make.as_bytes() <= pair[1].item.make.as_bytes()));

    // 삭제
    repository.delete_auction(created.id).await.unwrap();
    assert!(matches!(
        repository.get_auction(created.id).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert!(matches!(
        repository.delete_auction(created.id).await,
        Err(RepositoryError::NotFound(_))
    ));
}
