use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use blog_portal::{
    AppState, InMemoryRepository,
    auth::{Role, issue_token},
    config::AppConfig,
    create_router,
};
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

// --- Test Harness ---

struct TestApp {
    router: Router,
    admin_token: String,
    user_token: String,
}

impl TestApp {
    fn new() -> Self {
        let config = AppConfig::default();
        let token = |subject: &str, roles: &[Role]| {
            issue_token(&config.jwt_secret, subject, roles, Duration::from_secs(3600)).unwrap()
        };
        let admin_token = token("admin", &[Role::Admin, Role::User]);
        let user_token = token("reader", &[Role::User]);

        let state = AppState::new(Arc::new(InMemoryRepository::new()), config);
        TestApp {
            router: create_router(state),
            admin_token,
            user_token,
        }
    }

    /// Sends one request through the full middleware stack and returns the status plus the
    /// raw body text.
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, text) = self.send(Method::GET, uri, None, None).await;
        (status, serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        self.send(method, uri, Some(&self.admin_token), body).await
    }

    async fn create_category(&self, name: &str) -> Value {
        let (status, text) = self
            .admin(
                Method::POST,
                "/api/categories",
                Some(json!({ "name": name, "description": format!("{name} posts") })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{text}");
        serde_json::from_str(&text).unwrap()
    }

    async fn create_post(&self, title: &str, category_id: i64) -> Value {
        let (status, text) = self
            .admin(Method::POST, "/api/v1/posts", Some(post_body(title, category_id)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{text}");
        serde_json::from_str(&text).unwrap()
    }
}

fn post_body(title: &str, category_id: i64) -> Value {
    json!({
        "title": title,
        "description": "Long enough description",
        "content": "Some content",
        "categoryId": category_id,
    })
}

fn parse(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

// --- Infrastructure Routes ---

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = TestApp::new();

    let (status, doc) = app.get("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/v1/posts"));
    assert!(paths.contains_key("/api/v1/posts/category/{id}"));
    assert!(paths.contains_key("/api/categories/{id}"));
    assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

// --- Categories ---

#[tokio::test]
async fn test_create_and_fetch_category() {
    let app = TestApp::new();

    let (status, text) = app
        .admin(
            Method::POST,
            "/api/categories",
            Some(json!({ "name": "Tech", "description": "Tech posts" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let expected = json!({ "id": 1, "name": "Tech", "description": "Tech posts" });
    assert_eq!(parse(&text), expected);

    let (status, fetched) = app.get("/api/categories/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, expected);

    let (_, all) = app.get("/api/categories").await;
    assert_eq!(all, json!([expected]));
}

#[tokio::test]
async fn test_category_name_is_validated() {
    let app = TestApp::new();

    let (status, text) = app
        .admin(Method::POST, "/api/categories", Some(json!({ "name": "" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = parse(&text);
    assert_eq!(body["status"], 400);
    assert_eq!(body["errors"]["name"], "Category name should not be empty");
}

#[tokio::test]
async fn test_delete_category_in_use_is_conflict() {
    let app = TestApp::new();
    app.create_category("Tech").await;
    app.create_post("Hello", 1).await;

    let (status, text) = app.admin(Method::DELETE, "/api/categories/1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(parse(&text)["error"], "Conflict");

    // Once the post is gone the category can be deleted.
    let (status, _) = app.admin(Method::DELETE, "/api/v1/posts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, text) = app.admin(Method::DELETE, "/api/categories/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Category deleted successfully!");

    let (status, _) = app.get("/api/categories/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_category_is_not_found() {
    let app = TestApp::new();

    let (status, text) = app
        .admin(Method::PUT, "/api/categories/9", Some(json!({ "name": "Tech" })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&text)["message"], "Category not found with id : '9'");
}

// --- Posts ---

#[tokio::test]
async fn test_create_then_get_post() {
    let app = TestApp::new();
    app.create_category("Tech").await;

    let created = app.create_post("Hello", 1).await;
    assert_eq!(
        created,
        json!({
            "id": 1,
            "title": "Hello",
            "description": "Long enough description",
            "content": "Some content",
            "categoryId": 1,
        })
    );

    let (status, fetched) = app.get("/api/v1/posts/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_post_with_unknown_category() {
    let app = TestApp::new();

    let (status, text) = app
        .admin(Method::POST, "/api/v1/posts", Some(post_body("Hello", 3)))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&text)["message"], "Category not found with id : '3'");
    let (_, page) = app.get("/api/v1/posts").await;
    assert_eq!(page["totalElements"], 0);
}

#[tokio::test]
async fn test_post_validation_errors() {
    let app = TestApp::new();
    app.create_category("Tech").await;

    let (status, text) = app
        .admin(
            Method::POST,
            "/api/v1/posts",
            Some(json!({
                "title": "a",
                "description": "short",
                "content": "x",
                "categoryId": 1,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = parse(&text);
    assert_eq!(
        body["errors"]["title"],
        "Post title should have at least 2 characters"
    );
    assert_eq!(
        body["errors"]["description"],
        "Post description should have at least 10 characters"
    );
    assert!(body["errors"].get("content").is_none());
}

#[tokio::test]
async fn test_post_missing_category_id_is_bad_request() {
    let app = TestApp::new();

    let (status, text) = app
        .admin(
            Method::POST,
            "/api/v1/posts",
            Some(json!({
                "title": "Hello",
                "description": "Long enough description",
                "content": "Some content",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&text)["status"], 400);
}

#[tokio::test]
async fn test_pagination_over_twenty_five_posts() {
    let app = TestApp::new();
    app.create_category("Tech").await;
    for i in 0..25 {
        app.create_post(&format!("Post {i:02}"), 1).await;
    }

    let (status, first) = app.get("/api/v1/posts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["content"].as_array().unwrap().len(), 10);
    assert_eq!(first["content"][0]["id"], 1);
    assert_eq!(first["pageNo"], 0);
    assert_eq!(first["pageSize"], 10);
    assert_eq!(first["totalElements"], 25);
    assert_eq!(first["totalPages"], 3);
    assert_eq!(first["last"], false);

    let (_, third) = app.get("/api/v1/posts?pageNo=2&pageSize=10").await;
    assert_eq!(third["content"].as_array().unwrap().len(), 5);
    assert_eq!(third["content"][0]["id"], 21);
    assert_eq!(third["last"], true);

    let (status, beyond) = app.get("/api/v1/posts?pageNo=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(beyond["content"], json!([]));
    assert_eq!(beyond["totalElements"], 25);
    assert_eq!(beyond["last"], true);
}

#[tokio::test]
async fn test_pagination_sorting() {
    let app = TestApp::new();
    app.create_category("Tech").await;
    for title in ["Banana", "Apple", "Cherry"] {
        app.create_post(title, 1).await;
    }

    let (_, desc) = app
        .get("/api/v1/posts?sortBy=title&sortDir=DESC&pageSize=5")
        .await;
    let titles: Vec<_> = desc["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["Cherry", "Banana", "Apple"]);

    // An unrecognised direction ascends.
    let (status, asc) = app.get("/api/v1/posts?sortBy=title&sortDir=upwards").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(asc["content"][0]["title"], "Apple");
}

#[tokio::test]
async fn test_invalid_query_and_path_values() {
    let app = TestApp::new();

    for uri in [
        "/api/v1/posts?sortBy=author",
        "/api/v1/posts?pageSize=0",
        "/api/v1/posts?pageNo=-1",
        "/api/v1/posts?pageSize=ten",
        "/api/v1/posts/abc",
        "/api/categories/abc",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["status"], 400, "{uri}");
    }
}

#[tokio::test]
async fn test_extreme_paging_values() {
    let app = TestApp::new();
    app.create_category("Tech").await;
    app.create_post("Hello", 1).await;
    app.create_post("World", 1).await;

    let (status, wide) = app.get("/api/v1/posts?pageSize=9223372036854775807").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wide["content"].as_array().unwrap().len(), 2);
    assert_eq!(wide["totalPages"], 1);
    assert_eq!(wide["last"], true);

    let (status, far) = app
        .get("/api/v1/posts?pageNo=9223372036854775807&pageSize=9223372036854775807")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(far["content"], json!([]));
    assert_eq!(far["totalElements"], 2);
    assert_eq!(far["last"], true);
}

#[tokio::test]
async fn test_update_post_not_found_cases() {
    let app = TestApp::new();
    app.create_category("Tech").await;

    let (status, text) = app
        .admin(Method::PUT, "/api/v1/posts/1", Some(post_body("Hello", 1)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&text)["message"], "Post not found with id : '1'");

    app.create_post("Hello", 1).await;
    let (status, text) = app
        .admin(Method::PUT, "/api/v1/posts/1", Some(post_body("Hello", 8)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&text)["message"], "Category not found with id : '8'");
}

#[tokio::test]
async fn test_update_post_replaces_fields() {
    let app = TestApp::new();
    app.create_category("Tech").await;
    app.create_post("Hello", 1).await;

    let (status, text) = app
        .admin(
            Method::PUT,
            "/api/v1/posts/1",
            Some(json!({
                "id": 500,
                "title": "Updated title",
                "description": "Updated description",
                "content": "Updated content",
                "categoryId": 1,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let updated = parse(&text);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["title"], "Updated title");
    let (_, fetched) = app.get("/api/v1/posts/1").await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_delete_post_then_not_found() {
    let app = TestApp::new();
    app.create_category("Tech").await;
    app.create_post("Hello", 1).await;

    let (status, text) = app.admin(Method::DELETE, "/api/v1/posts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Post entity deleted successfully.");

    let (status, body) = app.get("/api/v1/posts/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Post not found with id : '1'");
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_posts_by_category() {
    let app = TestApp::new();
    app.create_category("Tech").await;
    app.create_category("Travel").await;
    app.create_post("Hello", 1).await;
    app.create_post("World", 1).await;

    let (status, tech) = app.get("/api/v1/posts/category/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tech.as_array().unwrap().len(), 2);

    let (status, travel) = app.get("/api/v1/posts/category/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(travel, json!([]));

    let (status, _) = app.get("/api/v1/posts/category/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- Access Control ---

#[tokio::test]
async fn test_writes_without_token_are_unauthorized() {
    let app = TestApp::new();

    let (status, text) = app
        .send(
            Method::POST,
            "/api/categories",
            None,
            Some(json!({ "name": "Tech" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse(&text)["status"], 401);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/categories",
            Some("not-a-token"),
            Some(json!({ "name": "Tech" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, all) = app.get("/api/categories").await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_writes_without_admin_role_are_forbidden() {
    let app = TestApp::new();
    app.create_category("Tech").await;
    app.create_post("Hello", 1).await;

    let user = Some(app.user_token.as_str());
    let attempts = [
        (Method::POST, "/api/categories", Some(json!({ "name": "Other" }))),
        (Method::PUT, "/api/categories/1", Some(json!({ "name": "Other" }))),
        (Method::DELETE, "/api/categories/1", None),
        (Method::POST, "/api/v1/posts", Some(post_body("Other", 1))),
        (Method::PUT, "/api/v1/posts/1", Some(post_body("Other", 1))),
        (Method::DELETE, "/api/v1/posts/1", None),
    ];
    for (method, uri, body) in attempts {
        let (status, text) = app.send(method.clone(), uri, user, body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(parse(&text)["status"], 403);
    }

    // Nothing changed.
    let (_, category) = app.get("/api/categories/1").await;
    assert_eq!(category["name"], "Tech");
    let (_, page) = app.get("/api/v1/posts").await;
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["content"][0]["title"], "Hello");
}

#[tokio::test]
async fn test_reads_are_public_even_with_user_token() {
    let app = TestApp::new();
    app.create_category("Tech").await;

    let (status, _) = app
        .send(Method::GET, "/api/categories/1", Some(app.user_token.as_str()), None)
        .await;

    assert_eq!(status, StatusCode::OK);
}
