//! End-to-end router tests against PostgreSQL.
//!
//! Uses `DATABASE_URL` (default `DEFAULT_TEST_DATABASE_URL`); fixtures are
//! uniquely named per test and removed afterwards.

use std::collections::HashMap;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt as _;

use kedai_api::{build_router, ApiConfig, AppState};
use kedai_db::test_fixtures::{
    cleanup_merchants, insert_merchant, insert_merchant_type, test_database_url, MerchantSeed,
};
use kedai_db::{create_pool, Database};

async fn setup() -> (Router, Database) {
    dotenvy::dotenv().ok();
    let pool = create_pool(&test_database_url())
        .await
        .expect("Failed to create test pool");
    let db = Database::new(pool);
    db.migrate().await.expect("Failed to run migrations");

    let env: HashMap<&str, &str> = HashMap::from([
        ("SECRET_KEY", "flow-test-secret"),
        ("RATE_LIMIT_ENABLED", "false"),
    ]);
    let config = ApiConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
    let app = build_router(AppState::new(db.clone(), config));
    (app, db)
}

fn unique(label: &str) -> String {
    format!("test_{}_{}", label, uuid::Uuid::new_v4().simple())
}

async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "username={}&password={}",
            email.replace('@', "%40"),
            password
        )))
        .unwrap()
}

#[tokio::test]
async fn test_register_login_and_me() {
    let (app, db) = setup().await;
    let email = format!("{}@example.com", unique("flow"));

    let resp = send(
        &app,
        json_post(
            "/api/v1/auth/register",
            serde_json::json!({ "name": "Putri", "email": email, "password": "rahasia123" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = Request::get("/api/v1/users/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = send(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await;
    assert_eq!(me["email"], email.as_str());
    assert_eq!(me["name"], "Putri");
    assert!(me.get("hashed_password").is_none());

    let resp = send(
        &app,
        json_post(
            "/api/v1/auth/register",
            serde_json::json!({ "name": "Putri", "email": email, "password": "rahasia123" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&app, login_request(&email, "rahasia123")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json(resp).await["access_token"].is_string());

    let resp = send(&app, login_request(&email, "salah-sandi")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");

    assert!(db.users.delete_by_email(&email).await.unwrap());

    // Token outlives the account: subject lookup fails.
    let req = Request::get("/api/v1/users/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_email_is_unauthorized() {
    let (app, _db) = setup().await;
    let email = format!("{}@example.com", unique("ghost"));
    let resp = send(&app, login_request(&email, "whatever1")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "Incorrect email or password");
}

#[tokio::test]
async fn test_merchant_detail_and_sub_resources() {
    let (app, db) = setup().await;
    let key = unique("detail");

    let id = insert_merchant(
        db.pool(),
        &MerchantSeed::new(format!("{}_0", key), "Kopi Kenangan")
            .primary_type("coffee_shop")
            .rating(4.6),
    )
    .await
    .unwrap();
    insert_merchant_type(db.pool(), id, "coffee_shop").await.unwrap();
    insert_merchant_type(db.pool(), id, "cafe").await.unwrap();

    let resp = get(&app, &format!("/api/v1/merchants/{}", id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let detail = body_json(resp).await;
    assert_eq!(detail["display_name"], "Kopi Kenangan");
    assert_eq!(detail["primary_type"], "Coffee Shop");

    let resp = get(&app, &format!("/api/v1/merchants/{}/types", id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        serde_json::json!(["Cafe", "Coffee Shop"])
    );

    let resp = get(&app, &format!("/api/v1/merchants/{}/photos", id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!([]));

    let resp = get(&app, &format!("/api/v1/merchants/{}/opening-hours", id)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"], "Opening hours not found");

    let resp = get(&app, &format!("/api/v1/merchants/{}/amenities", id)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    cleanup_merchants(db.pool(), &key).await.unwrap();

    for suffix in ["", "/photos", "/reviews", "/types", "/opening-hours", "/amenities"] {
        let resp = get(&app, &format!("/api/v1/merchants/{}{}", id, suffix)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{suffix}");
        assert_eq!(body_json(resp).await["error"], "Merchant not found");
    }
}

#[tokio::test]
async fn test_list_endpoint_shape() {
    let (app, db) = setup().await;
    let key = unique("listing");

    for (i, name) in ["Alpha Bakery", "Beta Bakery", "Gamma Bakery"].iter().enumerate() {
        let id = insert_merchant(
            db.pool(),
            &MerchantSeed::new(format!("{}_{}", key, i), *name).primary_type(key.as_str()),
        )
        .await
        .unwrap();
        insert_merchant_type(db.pool(), id, &key).await.unwrap();
    }

    let uri = format!(
        "/api/v1/merchants?primary_type={}&page=1&page_size=2&sort_by=name&sort_order=asc",
        key
    );
    let resp = get(&app, &uri).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["display_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha Bakery", "Beta Bakery"]);
    assert_eq!(
        body["meta"],
        serde_json::json!({
            "total": 3,
            "page": 1,
            "page_size": 2,
            "total_pages": 2,
            "has_next": true,
            "has_previous": false
        })
    );

    let resp = get(&app, "/api/v1/merchant-types").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let labels = body_json(resp).await;
    let expected = kedai_core::format_type_name(&key);
    assert!(labels
        .as_array()
        .unwrap()
        .iter()
        .any(|l| l.as_str() == Some(expected.as_str())));

    cleanup_merchants(db.pool(), &key).await.unwrap();
}

#[tokio::test]
async fn test_feedback_created() {
    let (app, db) = setup().await;
    let resp = send(
        &app,
        json_post(
            "/api/v1/feedbacks",
            serde_json::json!({ "name": "Bima", "message": "Mantap", "rating": 4 }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["name"], "Bima");
    assert_eq!(body["rating"], 4);

    sqlx::query("DELETE FROM feedbacks WHERE id = $1")
        .bind(body["id"].as_i64().unwrap() as i32)
        .execute(db.pool())
        .await
        .unwrap();
}
