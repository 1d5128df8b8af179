use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use configuration::{DashboardSettings, DatasetPaths};
use core_types::AnalyticsParams;
use dashboard::{Dashboard, Workspace};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use web_server::{build_router, preload_workspace, AppState};

const BOUNDARY: &str = "retail-test-boundary";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../dataset/tests/fixtures")
        .join(name)
}

fn create_app(workspace: Workspace) -> Router {
    let dashboard = Dashboard::new(AnalyticsParams::default(), DashboardSettings::default()).unwrap();
    let state = AppState::new(workspace, dashboard, Duration::from_secs(5));
    build_router(Arc::new(state), 1024 * 1024)
}

fn loaded_app() -> Router {
    let workspace = preload_workspace(&DatasetPaths {
        products: Some(fixture("products.csv")),
        sales: Some(fixture("sales.csv")),
        purchases: Some(fixture("purchases.csv")),
    })
    .unwrap();
    create_app(workspace)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn upload(files: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (file_name, content) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri("/api/datasets")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = create_app(Workspace::new()).oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn test_dashboard_requires_all_tables() {
    let response = create_app(Workspace::new())
        .oneshot(get("/api/dashboard"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("products, sales, purchases"));
}

#[tokio::test]
async fn test_upload_then_dashboard() {
    let app = create_app(Workspace::new());
    let read = |name: &str| std::fs::read_to_string(fixture(name)).unwrap();
    let (products, sales, purchases) = (read("products.csv"), read("sales.csv"), read("purchases.csv"));

    let response = app
        .clone()
        .oneshot(upload(&[("products.csv", products.as_str()), ("sales.csv", sales.as_str())]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response).await;
    assert_eq!(status["ready"], false);
    assert_eq!(status["tables"][0]["table"], "products");
    assert_eq!(status["tables"][0]["rows"], 6);
    assert_eq!(status["tables"][2]["rows"], Value::Null);

    let response = app
        .clone()
        .oneshot(upload(&[("purchases.csv", purchases.as_str())]))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["ready"], true);

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await;
    assert_eq!(view["kpis"]["total_understocked_products"], 1);
    assert_eq!(view["products"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_invalid_uploads_are_rejected() {
    let app = create_app(Workspace::new());

    let response = app
        .clone()
        .oneshot(upload(&[("inventory.csv", "a,b\n1,2\n")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(upload(&[("sales.csv", "product_id,quantity_sold\n101,3\n")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("sale_date"));

    // Nothing was stored by the failed uploads.
    let status = body_json(app.oneshot(get("/api/datasets")).await.unwrap()).await;
    assert_eq!(status["tables"][1]["rows"], Value::Null);
}

#[tokio::test]
async fn test_upload_with_one_bad_file_replaces_nothing() {
    let app = loaded_app();
    let sales = "product_id,quantity_sold,sale_date,location\n101,5,2024-12-30,Dhaka\n";
    let bad_purchases = "product_id,quantity_purchased\n101,5\n";

    let response = app
        .clone()
        .oneshot(upload(&[("sales.csv", sales), ("purchases.csv", bad_purchases)]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let status = body_json(app.oneshot(get("/api/datasets")).await.unwrap()).await;
    assert_eq!(status["tables"][1]["rows"], 9);
    assert_eq!(status["tables"][2]["rows"], 8);
}

#[tokio::test]
async fn test_uploaded_sales_report_unknown_locations() {
    let app = loaded_app();
    let status = body_json(app.clone().oneshot(get("/api/datasets")).await.unwrap()).await;
    assert_eq!(status["unknown_locations"], serde_json::json!([]));

    let sales = "product_id,quantity_sold,sale_date,location\n101,5,2024-12-30,Khulna\n102,1,2024-12-30,Dhaka\n";
    let response = app.oneshot(upload(&[("sales.csv", sales)])).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response).await;
    assert_eq!(status["ready"], true);
    assert_eq!(status["unknown_locations"], serde_json::json!(["Khulna"]));
}

#[tokio::test]
async fn test_dashboard_query_parameters() {
    let response = loaded_app()
        .oneshot(get(
            "/api/dashboard?start=2024-12-01&end=2024-12-31&locations=Chittagong,Rajshahi&categories=Groceries,Clothing",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await;
    assert_eq!(view["query"]["locations"], serde_json::json!(["Chittagong", "Rajshahi"]));
    assert_eq!(view["products"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_inverted_date_range_is_a_bad_request() {
    let response = loaded_app()
        .oneshot(get("/api/dashboard?start=2024-12-31&end=2024-01-01"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_csv_export() {
    let response = loaded_app()
        .oneshot(get("/api/export/stock_issues.csv"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"stock_issues.csv\""
    );
    let csv = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(csv.starts_with("product_name,category,current_stock,reorder_level,stock_status,suggested_reorder\n"));
    assert!(csv.contains("Mustard Oil 1L,Groceries,10,80,Understocked,70"));
}

#[tokio::test]
async fn test_unknown_export_is_not_found() {
    let response = loaded_app()
        .oneshot(get("/api/export/everything.csv"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_metrics() {
    let app = loaded_app();

    let response = app.clone().oneshot(get("/api/products/102")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let metrics = body_json(response).await;
    assert_eq!(metrics["current_stock"], 10);
    assert_eq!(metrics["stock_status"], "Understocked");

    let response = app.oneshot(get("/api/products/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
