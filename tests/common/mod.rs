//! Shared test harness
//!
//! Spins up the full router against an in-memory SQLite database and
//! provides request helpers that drive it through `tower::ServiceExt`.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use storefront::api::build_app;
use storefront::auth::{self, JwtConfig, JwtService};
use storefront::core::{Config, ServerState};
use storefront::db::DbService;
use storefront::db::models::User;
use storefront::db::repository::user as user_repo;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub state: ServerState,
    /// Staff user owning all seeded catalog rows
    pub seed_user_id: i64,
    // Held so uploaded files have a directory for the test's lifetime
    _work_dir: TempDir,
}

pub async fn setup() -> TestApp {
    let work_dir = TempDir::new().expect("Failed to create temp dir");

    let jwt_config = JwtConfig {
        secret: "test-secret-test-secret-test-secret-test".to_string(),
        expiration_minutes: 60,
        issuer: "storefront".to_string(),
        audience: "storefront-clients".to_string(),
    };

    let mut config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    config.jwt = jwt_config.clone();

    let db = DbService::in_memory()
        .await
        .expect("Failed to open in-memory database");
    let pool = db.pool.clone();

    let state = ServerState::new(config, db.pool, Arc::new(JwtService::with_config(jwt_config)));
    let app = build_app(state.clone());

    let hash = auth::hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let seed_user = user_repo::create(&pool, "catalog_owner", &hash, "Catalog", true)
        .await
        .expect("Failed to create seed user");

    TestApp {
        app,
        pool,
        state,
        seed_user_id: seed_user.id,
        _work_dir: work_dir,
    }
}

impl TestApp {
    pub async fn create_user(&self, username: &str, first_name: &str, is_staff: bool) -> User {
        let hash = auth::hash_password(TEST_PASSWORD).expect("Failed to hash password");
        user_repo::create(&self.pool, username, &hash, first_name, is_staff)
            .await
            .expect("Failed to create test user")
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state
            .get_jwt_service()
            .generate_token(user.id, &user.username, &user.first_name, user.is_staff)
            .expect("Failed to generate test token")
    }

    /// Seed a product row directly; the API has no endpoint that sets
    /// arbitrary rating or stock in one call.
    pub async fn seed_product(
        &self,
        name: &str,
        price: f64,
        count_in_stock: i64,
        rating: f64,
    ) -> i64 {
        let id = storefront::utils::snowflake_id();
        sqlx::query(
            "INSERT INTO product (id, user_id, name, image, brand, category, description, price, count_in_stock, rating, num_reviews, created_at) \
             VALUES (?, ?, ?, '', 'Acme', 'Gadgets', '', ?, ?, ?, 0, ?)",
        )
        .bind(id)
        .bind(self.seed_user_id)
        .bind(name)
        .bind(price)
        .bind(count_in_stock)
        .bind(rating)
        .bind(storefront::utils::now_millis())
        .execute(&self.pool)
        .await
        .expect("Failed to seed product");
        id
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response was not valid JSON")
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request("POST", uri, token, body).await
    }

    pub async fn put(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request("PUT", uri, token, body).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", uri, token, None).await
    }

    /// Current product row, for asserting on stock and review aggregates.
    pub async fn product_row(&self, id: i64) -> (i64, f64, i64) {
        sqlx::query_as::<_, (i64, f64, i64)>(
            "SELECT count_in_stock, rating, num_reviews FROM product WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .expect("Product row missing")
    }
}

/// Build a multipart/form-data body with an image file and a product_id field.
pub fn multipart_upload(boundary: &str, product_id: i64, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"product_id\"\r\n\r\n{product_id}\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// A tiny valid PNG generated in memory.
pub fn sample_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("Failed to encode test PNG");
    buffer.into_inner()
}
