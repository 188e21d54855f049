//! End-to-end auth, catalog and review submission flows.

use dealer_reviews_sdk::ReviewRequest;
use serde_json::json;

mod common;

fn sample_review(dealership: u64) -> ReviewRequest {
    ReviewRequest {
        name: String::new(),
        dealership,
        review: "Friendly staff and a fair price".into(),
        purchase: true,
        purchase_date: "2024-03-01".into(),
        car_make: "Toyota".into(),
        car_model: "Corolla".into(),
        car_year: 2023,
    }
}

async fn app_with_backend() -> (common::TestApp, common::MockUpstream) {
    let backend = common::start_mock_upstream(|req| match req.path.as_str() {
        "/insert_review" => (200, r#"{"id": 1}"#.to_string()),
        _ => (404, "{}".to_string()),
    })
    .await;
    let sentiment = common::unreachable_url().await;
    let app = common::spawn_app(&backend.url(), &sentiment).await;
    (app, backend)
}

#[tokio::test]
async fn test_register_then_login() {
    let (app, _backend) = app_with_backend().await;
    let client = app.client();

    let res = client
        .register("jane", "s3cret", "Jane", "Doe", "jane@example.com")
        .await
        .unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"userName": "jane", "status": "Authenticated"}));

    let fresh = app.client();
    let res = fresh.login("jane", "s3cret").await.unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"userName": "jane", "status": "Authenticated"}));
}

#[tokio::test]
async fn test_login_with_bad_credentials_has_no_status() {
    let (app, _backend) = app_with_backend().await;
    let client = app.client();
    client.register("jane", "s3cret", "", "", "").await.unwrap();

    let res = app.client().login("jane", "wrong").await.unwrap();
    assert_eq!(res.status, 401);
    assert_eq!(res.body, json!({"userName": "jane"}));

    let res = app.client().login("nobody", "s3cret").await.unwrap();
    assert_eq!(res.status, 401);
    assert_eq!(res.body, json!({"userName": "nobody"}));
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let (app, _backend) = app_with_backend().await;

    let first = app.client().register("sam", "pw1", "", "", "").await.unwrap();
    assert_eq!(first.status, 200);

    let second = app.client().register("sam", "pw2", "", "", "").await.unwrap();
    assert_eq!(second.status, 409);
    assert_eq!(second.body, json!({"userName": "sam", "error": "Already Registered"}));

    // The original password still works.
    let res = app.client().login("sam", "pw1").await.unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "Authenticated");
}

#[tokio::test]
async fn test_register_requires_post() {
    let (app, _backend) = app_with_backend().await;

    let res = app.client().get_raw("/djangoapp/register").await.unwrap();
    assert_eq!(res.status(), 400);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "Invalid request"}));
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let (app, backend) = app_with_backend().await;
    let client = app.client();
    client.register("lee", "pw", "", "", "").await.unwrap();

    let res = client.logout().await.unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"userName": ""}));

    let res = client.add_review(&sample_review(15)).await.unwrap();
    assert_eq!(res.status, 403);
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_anonymous_review_is_forbidden_without_upstream_call() {
    let (app, backend) = app_with_backend().await;

    let res = app.client().add_review(&sample_review(15)).await.unwrap();
    assert_eq!(res.status, 403);
    assert_eq!(res.body, json!({"status": 403, "message": "Unauthorized"}));
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_authenticated_review_is_forwarded() {
    let (app, backend) = app_with_backend().await;
    let client = app.client();
    client.register("kim", "pw", "Kim", "Park", "").await.unwrap();

    let res = client.add_review(&sample_review(15)).await.unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"status": 200}));

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/insert_review");

    let forwarded: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(forwarded["dealership"], 15);
    assert_eq!(forwarded["review"], "Friendly staff and a fair price");
    assert_eq!(forwarded["name"], "kim");
}

#[tokio::test]
async fn test_dealership_id_may_be_a_string() {
    let (app, backend) = app_with_backend().await;
    let client = app.client();
    client.register("ana", "pw", "", "", "").await.unwrap();

    let res = client
        .add_review_raw(&json!({"name": "Ana", "dealership": "7", "review": "Quick service"}))
        .await
        .unwrap();
    assert_eq!(res.status, 200);

    let forwarded: serde_json::Value = serde_json::from_str(&backend.requests()[0].body).unwrap();
    assert_eq!(forwarded["dealership"], 7);
    assert_eq!(forwarded["name"], "Ana");
}

#[tokio::test]
async fn test_review_body_is_forwarded_as_sent() {
    let (app, backend) = app_with_backend().await;
    let client = app.client();
    client.register("pat", "pw", "", "", "").await.unwrap();

    let res = client
        .add_review_raw(&json!({
            "name": "P",
            "dealership": 15,
            "review": "ok",
            "time": "2024-01-01",
            "source": "web"
        }))
        .await
        .unwrap();
    assert_eq!(res.status, 200);

    let res = client
        .add_review_raw(&json!({"name": null, "dealership": 15, "review": "ok", "purchase": null}))
        .await
        .unwrap();
    assert_eq!(res.status, 200);

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);

    let first: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(
        first,
        json!({"name": "P", "dealership": 15, "review": "ok", "time": "2024-01-01", "source": "web"})
    );

    let second: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(
        second,
        json!({"name": "pat", "dealership": 15, "review": "ok", "purchase": null})
    );
}

#[tokio::test]
async fn test_malformed_review_is_rejected() {
    let (app, backend) = app_with_backend().await;
    let client = app.client();
    client.register("max", "pw", "", "", "").await.unwrap();

    let res = client.add_review_raw(&json!({"dealership": 15})).await.unwrap();
    assert_eq!(res.status, 401);
    assert_eq!(res.body, json!({"status": 401, "message": "Error in posting review"}));

    let res = client
        .add_review_raw(&json!({"dealership": 15, "review": "   "}))
        .await
        .unwrap();
    assert_eq!(res.status, 401);
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_review_backend_failure_is_bad_gateway() {
    let backend = common::start_mock_upstream(|_| (500, r#"{"error": "db down"}"#.to_string())).await;
    let app = common::spawn_app(&backend.url(), &common::unreachable_url().await).await;
    let client = app.client();
    client.register("zoe", "pw", "", "", "").await.unwrap();

    let res = client.add_review(&sample_review(3)).await.unwrap();
    assert_eq!(res.status, 502);
    assert_eq!(res.body, json!({"status": 502, "message": "Upstream service unavailable"}));
}

#[tokio::test]
async fn test_get_cars_populates_once() {
    let (app, _backend) = app_with_backend().await;
    let client = app.client();

    let first = client.cars().await.unwrap();
    assert_eq!(first.status, 200);
    let models = first.body["CarModels"].as_array().unwrap();
    assert_eq!(models.len(), 15);
    assert!(models
        .iter()
        .any(|m| m["CarModel"] == "Pathfinder" && m["CarMake"] == "NISSAN"));

    let second = client.cars().await.unwrap();
    assert_eq!(second.body, first.body);
}

#[tokio::test]
async fn test_health_and_request_id() {
    let (app, _backend) = app_with_backend().await;

    let res = app.client().health().await.unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "healthy");

    let raw = app.client().get_raw("/health").await.unwrap();
    assert!(raw.headers().contains_key("x-request-id"));
}
