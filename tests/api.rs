//! End-to-end tests for the public router, backed by in-memory repositories.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use prenota::application::catalog::CatalogService;
use prenota::application::directory::{DirectoryLookup, ProductDirectory, ProductSnapshot};
use prenota::application::images::ImageService;
use prenota::application::repos::{
    ImagesRepo, NewImage, NewReservation, ProductPageRequest, ProductsRepo, RepoError,
    ReservationsRepo,
};
use prenota::application::reservations::ReservationService;
use prenota::domain::booking::ReservationPeriod;
use prenota::domain::entities::{ImageRecord, ProductRecord, ReservationRecord};
use prenota::domain::types::{LinkedTableType, ProductState};
use prenota::infra::db::PostgresRepositories;
use prenota::infra::http::{HttpState, build_router};

#[derive(Default)]
struct MemoryReservationsRepo {
    rows: Mutex<Vec<ReservationRecord>>,
}

#[async_trait]
impl ReservationsRepo for MemoryReservationsRepo {
    async fn list_reservations(&self) -> Result<Vec<ReservationRecord>, RepoError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn overlap_exists(&self, period: &ReservationPeriod) -> Result<bool, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().any(|row| {
            period.overlaps(&ReservationPeriod {
                start_date: row.start_date,
                end_date: row.end_date,
            })
        }))
    }

    async fn append_reservations(
        &self,
        reservations: &[NewReservation],
    ) -> Result<Vec<ReservationRecord>, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let mut inserted = Vec::new();
        for reservation in reservations {
            let record = ReservationRecord {
                id: reservation.id,
                product_id: reservation.product_id,
                start_date: reservation.start_date,
                end_date: reservation.end_date,
                approval_state: reservation.approval_state,
                created_at: OffsetDateTime::now_utc(),
            };
            rows.push(record.clone());
            inserted.push(record);
        }
        Ok(inserted)
    }
}

#[derive(Default)]
struct MemoryImagesRepo {
    rows: Mutex<Vec<ImageRecord>>,
}

#[async_trait]
impl ImagesRepo for MemoryImagesRepo {
    async fn insert_images(&self, images: &[NewImage]) -> Result<Vec<ImageRecord>, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let mut inserted = Vec::new();
        for image in images {
            let record = ImageRecord {
                id: Uuid::new_v4(),
                linked_key: image.linked_key,
                linked_table_type: image.linked_table_type,
                size_bytes: image.blob.len() as i64,
                created_at: OffsetDateTime::now_utc(),
            };
            rows.push(record.clone());
            inserted.push(record);
        }
        Ok(inserted)
    }

    async fn list_for_entity(
        &self,
        linked_table_type: LinkedTableType,
        linked_key: i32,
    ) -> Result<Vec<ImageRecord>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|row| {
                row.linked_table_type == linked_table_type && row.linked_key == linked_key
            })
            .cloned()
            .collect())
    }
}

struct MemoryProductsRepo {
    rows: Vec<ProductRecord>,
}

impl MemoryProductsRepo {
    fn with_products(count: i32) -> Self {
        let rows = (1..=count)
            .map(|id| ProductRecord {
                id,
                catalog_number: 1000 + id,
                name: format!("Product {id}"),
                description: "A rentable product".to_string(),
                requires_approval: false,
                status: ProductState::Available,
                category: "tools".to_string(),
                archived_since: None,
                created_at: OffsetDateTime::now_utc(),
            })
            .collect();
        Self { rows }
    }
}

#[async_trait]
impl ProductsRepo for MemoryProductsRepo {
    async fn list_products(
        &self,
        page: ProductPageRequest,
    ) -> Result<Vec<ProductRecord>, RepoError> {
        Ok(self
            .rows
            .iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count_products(&self) -> Result<u64, RepoError> {
        Ok(self.rows.len() as u64)
    }

    async fn find_product(&self, id: i32) -> Result<Option<ProductRecord>, RepoError> {
        Ok(self.rows.iter().find(|row| row.id == id).cloned())
    }
}

#[derive(Default)]
struct StubDirectory {
    snapshots: HashMap<i32, ProductSnapshot>,
}

impl StubDirectory {
    fn with_available(mut self, id: i32) -> Self {
        self.snapshots.insert(
            id,
            ProductSnapshot {
                id,
                state: ProductState::Available,
                requires_approval: false,
            },
        );
        self
    }
}

#[async_trait]
impl ProductDirectory for StubDirectory {
    async fn fetch(&self, product_id: i32) -> DirectoryLookup {
        match self.snapshots.get(&product_id) {
            Some(snapshot) => DirectoryLookup::Found(*snapshot),
            None => DirectoryLookup::NotFound,
        }
    }
}

fn test_router(directory: StubDirectory) -> Router {
    let reservations = Arc::new(MemoryReservationsRepo::default());
    let images = Arc::new(MemoryImagesRepo::default());
    let products = Arc::new(MemoryProductsRepo::with_products(3));

    let pool = PostgresRepositories::connect_lazy("postgres://localhost/prenota_test", 1)
        .expect("lazy pool");

    build_router(HttpState {
        reservations: ReservationService::new(reservations, Arc::new(directory), 4),
        images: ImageService::new(images),
        catalog: CatalogService::new(products, NonZeroU32::new(2).unwrap()),
        db: Arc::new(PostgresRepositories::new(pool)),
    })
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec()
}

#[tokio::test]
async fn reserve_without_items_returns_no_products_code() {
    let app = test_router(StubDirectory::default());

    for body in [json!({}), json!({ "productModels": [] })] {
        let response = app
            .clone()
            .oneshot(json_request("/reservations/reserveproducts", body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = body_bytes(response).await;
        assert_eq!(bytes, b"PRODUCT.RESERVE.NO_PRODUCTS");
    }
}

#[tokio::test]
async fn reserve_with_invalid_item_returns_ordered_error_items() {
    let app = test_router(StubDirectory::default());

    let response = app
        .oneshot(json_request(
            "/reservations/reserveproducts",
            json!({
                "productModels": [
                    { "id": 0, "startDate": "2099-06-15", "endDate": "2099-06-18" }
                ]
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).expect("json");
    let items = body.as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["value"], "PRODUCT.RESERVE.PRODUCT_NO_ID");
    assert_eq!(items[1]["value"], "PRODUCT.RESERVE.PRODUCT_NOT_FOUND");
    for item in items {
        assert_eq!(item["key"]["id"], 0);
        assert_eq!(item["key"]["startDate"], "2099-06-15");
        assert_eq!(item["key"]["endDate"], "2099-06-18");
    }
}

#[tokio::test]
async fn reserve_clean_batch_returns_ok_with_empty_body() {
    let app = test_router(StubDirectory::default().with_available(1));

    let response = app
        .clone()
        .oneshot(json_request(
            "/reservations/reserveproducts",
            json!({
                "productModels": [
                    { "id": 1, "startDate": "2099-06-15", "endDate": "2099-06-18" }
                ]
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());

    let listing = app
        .oneshot(get_request("/reservations"))
        .await
        .expect("response");
    assert_eq!(listing.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(listing).await).expect("json");
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["productId"], 1);
    assert_eq!(rows[0]["startDate"], "2099-06-15");
    assert_eq!(rows[0]["approvalState"], "not_required");
}

#[tokio::test]
async fn images_roundtrip_through_the_api() {
    let app = test_router(StubDirectory::default());

    let response = app
        .clone()
        .oneshot(json_request(
            "/images",
            json!({
                "images": ["data:image/png;base64,aGVsbG8="],
                "linkedKey": 4,
                "linkedTableType": "product"
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let listing = app
        .oneshot(get_request("/images/product/4"))
        .await
        .expect("response");
    assert_eq!(listing.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(listing).await).expect("json");
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["linkedKey"], 4);
    assert_eq!(rows[0]["sizeBytes"], 5);
}

#[tokio::test]
async fn invalid_image_payload_returns_wire_code() {
    let app = test_router(StubDirectory::default());

    let response = app
        .oneshot(json_request(
            "/images",
            json!({
                "images": ["!!not-base64!!"],
                "linkedKey": 4,
                "linkedTableType": "product"
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_bytes(response).await, b"INVALID_IMAGE");
}

#[tokio::test]
async fn catalog_pages_and_directory_endpoint() {
    let app = test_router(StubDirectory::default());

    let response = app
        .clone()
        .oneshot(get_request("/products?page=2&page_size=2"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).expect("json");
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 2);
    assert_eq!(body["items"].as_array().expect("array").len(), 1);
    assert_eq!(body["items"][0]["id"], 3);

    let snapshot = app
        .clone()
        .oneshot(get_request("/api/product/2"))
        .await
        .expect("response");
    assert_eq!(snapshot.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(snapshot).await).expect("json");
    assert_eq!(body["id"], 2);
    assert_eq!(body["productState"], "AVAILABLE");
    assert_eq!(body["requiresApproval"], false);

    let missing = app
        .oneshot(get_request("/api/product/99"))
        .await
        .expect("response");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(missing).await.is_empty());
}
