use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tally_api::{app, AppState};
use tally_catalog::PricingCatalog;
use tally_store::MemorySessionStore;
use tempfile::NamedTempFile;
use tower::ServiceExt;

const PRICING: &str = r#"{
    "A": {"unitPrice": 50, "specialPrice": {"quantity": 3, "price": 130}},
    "C": {"unitPrice": 20}
}"#;

fn catalog_app(catalog: Arc<PricingCatalog>) -> Router {
    app(AppState {
        store: Arc::new(MemorySessionStore::new()),
        rules: catalog,
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_checkout(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::post("/checkouts").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["checkoutId"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn scan(app: &Router, checkout_id: &str, sku: &str) -> StatusCode {
    let response = app
        .clone()
        .oneshot(
            Request::post(format!("/checkouts/{checkout_id}/scan"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "sku": sku }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

async fn total(app: &Router, checkout_id: &str) -> u64 {
    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/checkouts/{checkout_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["totalPrice"].as_u64().unwrap()
}

#[tokio::test]
async fn file_backed_catalog_prices_scans() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PRICING.as_bytes()).unwrap();
    file.flush().unwrap();

    let catalog = PricingCatalog::load(file.path()).unwrap();
    let app = catalog_app(catalog);

    let id = create_checkout(&app).await;
    for sku in ["A", "A", "A", "C"] {
        assert_eq!(scan(&app, &id, sku).await, StatusCode::NO_CONTENT);
    }
    assert_eq!(total(&app, &id).await, 150);
}

#[tokio::test]
async fn reload_changes_pricing_for_new_scans_only() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PRICING.as_bytes()).unwrap();
    file.flush().unwrap();

    let catalog = PricingCatalog::load(file.path()).unwrap();
    let app = catalog_app(Arc::clone(&catalog));

    let before = create_checkout(&app).await;
    assert_eq!(scan(&app, &before, "C").await, StatusCode::NO_CONTENT);

    std::fs::write(file.path(), r#"{"C": {"unitPrice": 35}}"#).unwrap();
    catalog.reload().await.unwrap();

    // The already-scanned line keeps the rule captured at scan time.
    assert_eq!(total(&app, &before).await, 20);

    // "A" is gone from the catalog now, new scans of it are rejected.
    let after = create_checkout(&app).await;
    assert_eq!(scan(&app, &after, "A").await, StatusCode::BAD_REQUEST);
    assert_eq!(scan(&app, &after, "C").await, StatusCode::NO_CONTENT);
    assert_eq!(total(&app, &after).await, 35);
}
