//! Integration tests for the product API.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use shelf_integration_tests::{TestServer, product_body};

#[tokio::test]
async fn test_create_then_list_by_category() {
    let server = TestServer::spawn().await;

    let created = server.create_product("c1", "cat", 10.0).await;
    assert!(created["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(created["status"], true);
    assert_eq!(created["thumbnails"], json!([]));
    assert_eq!(created["price"].as_f64(), Some(10.0));

    let resp = server
        .client
        .get(server.url("/api/products?category=cat&sort=asc&limit=1&page=1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["payload"], json!([created]));
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["hasPrevPage"], false);
    assert_eq!(body["hasNextPage"], false);
    assert_eq!(body["prevPage"], Value::Null);
    assert_eq!(body["nextLink"], Value::Null);
}

#[tokio::test]
async fn test_listing_paginates_with_links() {
    let server = TestServer::spawn().await;
    for (code, price) in [("a", 30.0), ("b", 10.0), ("c", 20.0)] {
        server.create_product(code, "Kitchen", price).await;
    }
    server.create_product("d", "garden", 1.0).await;

    let body: Value = server
        .client
        .get(server.url("/api/products?category=kitchen&sort=desc&limit=2&page=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let prices: Vec<f64> = body["payload"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![30.0, 20.0]);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["nextPage"], 2);
    assert_eq!(
        body["nextLink"],
        format!(
            "{}/api/products?limit=2&page=2&sort=desc&category=kitchen",
            server.base_url
        )
    );

    let body: Value = server
        .client
        .get(body["nextLink"].as_str().unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["payload"].as_array().unwrap().len(), 1);
    assert_eq!(body["hasPrevPage"], true);
    assert_eq!(body["hasNextPage"], false);
}

#[tokio::test]
async fn test_get_update_delete_product() {
    let server = TestServer::spawn().await;
    let created = server.create_product("c1", "cat", 10.0).await;
    let url = server.url(&format!("/api/products/{}", created["id"].as_str().unwrap()));

    let fetched: Value = server.client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(fetched, created);

    let resp = server
        .client
        .put(&url)
        .json(&json!({"stock": 0, "status": false}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["stock"], 0);
    assert_eq!(updated["status"], false);
    assert_eq!(updated["title"], created["title"]);
    assert_eq!(updated["id"], created["id"]);

    let resp = server.client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product deleted successfully");

    let resp = server.client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_create_requires_all_fields() {
    let server = TestServer::spawn().await;

    let mut body = product_body("c1", "cat", 10.0);
    body.as_object_mut().unwrap().remove("category");

    let resp = server
        .client
        .post(server.url("/api/products"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "All fields are required");

    assert!(!server.data_dir().join("products.json").exists());
}

#[tokio::test]
async fn test_any_non_zero_stock_is_accepted() {
    let server = TestServer::spawn().await;

    for (code, stock) in [("neg", json!(-1)), ("frac", json!(2.5))] {
        let mut body = product_body(code, "cat", 10.0);
        body["stock"] = stock.clone();

        let resp = server
            .client
            .post(server.url("/api/products"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = resp.json().await.unwrap();
        assert_eq!(created["stock"], stock);
    }

    let mut body = product_body("zero", "cat", 10.0);
    body["stock"] = json!(0);
    let resp = server
        .client
        .post(server.url("/api/products"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_product_is_404_and_file_untouched() {
    let server = TestServer::spawn().await;
    server.create_product("c1", "cat", 10.0).await;
    let before = std::fs::read(server.data_dir().join("products.json")).unwrap();

    for resp in [
        server.client.delete(server.url("/api/products/missing")).send().await.unwrap(),
        server
            .client
            .put(server.url("/api/products/missing"))
            .json(&json!({"stock": 1}))
            .send()
            .await
            .unwrap(),
    ] {
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let after = std::fs::read(server.data_dir().join("products.json")).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_corrupt_collection_is_server_error() {
    let server = TestServer::spawn().await;
    std::fs::write(server.data_dir().join("products.json"), "{not json").unwrap();

    let resp = server.client.get(server.url("/api/products")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Internal Server Error");
}

#[tokio::test]
async fn test_concurrent_creates_are_all_kept() {
    let server = TestServer::spawn().await;

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = server.client.clone();
        let url = server.url("/api/products");
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&product_body(&format!("c{i}"), "cat", 1.0))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::CREATED);
    }

    let products = server.collections().products.load().await.unwrap();
    assert_eq!(products.len(), 20);
}

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let server = TestServer::spawn().await;
    for code in ["a", "b", "c"] {
        server.create_product(code, "cat", 1.0).await;
    }

    let resp = server
        .client
        .get(server.url("/api/products?limit=2&limit=3"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["payload"].as_array().unwrap().len(), 2);
    assert_eq!(body["totalPages"], 2);
}
