//! Integration tests for Shelf.
//!
//! Each test starts its own server on an ephemeral port over a fresh
//! temporary data directory, then talks to it over HTTP.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_health() {
//!     let server = TestServer::spawn().await;
//!     let resp = server.client.get(server.url("/health")).send().await.unwrap();
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;

use reqwest::Client;
use serde_json::{Value, json};
use shelf_server::config::ShelfConfig;
use shelf_server::db::Collections;
use shelf_server::state::AppState;
use tempfile::TempDir;

/// A live server bound to `127.0.0.1` on an ephemeral port.
pub struct TestServer {
    pub client: Client,
    pub base_url: String,
    data_dir: TempDir,
}

impl TestServer {
    /// Start a server over an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the configuration is invalid.
    pub async fn spawn() -> Self {
        let data_dir = TempDir::new().expect("Failed to create data directory");
        let data_path = data_dir.path().to_path_buf();
        Self::start(data_dir, &data_path).await
    }

    /// Start a server whose data directory is `relative` inside a fresh
    /// temporary directory. The path is not created.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the configuration is invalid.
    pub async fn spawn_with_data_path(relative: &str) -> Self {
        let data_dir = TempDir::new().expect("Failed to create data directory");
        let data_path = data_dir.path().join(relative);
        Self::start(data_dir, &data_path).await
    }

    async fn start(data_dir: TempDir, data_path: &Path) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let data_path = data_path.to_string_lossy().into_owned();
        let port = addr.port().to_string();
        let config = ShelfConfig::from_lookup(|key| match key {
            "SHELF_DATA_DIR" => Some(data_path.clone()),
            "SHELF_PORT" => Some(port.clone()),
            _ => None,
        })
        .expect("Invalid test configuration");

        let app = shelf_server::app(AppState::new(config));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            data_dir,
        }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The temporary root. For [`TestServer::spawn`] this is the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Handles to the server's collection files.
    #[must_use]
    pub fn collections(&self) -> Collections {
        Collections::open(self.data_dir(), "products.json", "carts.json")
    }

    /// Create a product through the API and return the response body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the server does not answer 201.
    pub async fn create_product(&self, code: &str, category: &str, price: f64) -> Value {
        let resp = self
            .client
            .post(self.url("/api/products"))
            .json(&product_body(code, category, price))
            .send()
            .await
            .expect("Failed to create product");
        assert_eq!(resp.status(), 201, "product creation failed");
        resp.json().await.expect("Invalid product body")
    }
}

/// A complete product creation body.
#[must_use]
pub fn product_body(code: &str, category: &str, price: f64) -> Value {
    json!({
        "title": format!("Product {code}"),
        "description": "Integration test product",
        "code": code,
        "price": price,
        "stock": 5,
        "category": category,
    })
}
