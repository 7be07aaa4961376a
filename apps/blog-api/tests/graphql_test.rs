//! End-to-end GraphQL tests against the full router with in-memory storage.
//!
//! Requests go through the auth middleware, so tokens travel exactly as they
//! would from a browser.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_helpers::{JwtAuth, JwtConfig};
use blog_api::{AppState, BlogConfig, build_router};
use core_config::app_info;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt; // For oneshot()

const SECRET: &str = "graphql-integration-test-secret-0123456789";

struct TestApp {
    router: Router,
    _images: TempDir,
}

impl TestApp {
    fn new() -> Self {
        Self::with_per_page(2)
    }

    fn with_per_page(posts_per_page: u64) -> Self {
        let images = tempfile::tempdir().unwrap();
        let blog = BlogConfig {
            images_dir: images.path().to_path_buf(),
            posts_per_page,
            cors_allowed_origin: None,
        };
        let jwt = JwtAuth::new(&JwtConfig::new(SECRET));
        let state = AppState::in_memory(app_info!(), blog, jwt);

        Self {
            router: build_router(&state).unwrap(),
            _images: images,
        }
    }

    async fn graphql(&self, token: Option<&str>, query: &str, variables: Value) -> Value {
        let mut request = Request::builder()
            .method("POST")
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = request
            .body(Body::from(
                json!({ "query": query, "variables": variables }).to_string(),
            ))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn signup(&self, email: &str) -> String {
        let body = self
            .graphql(
                None,
                "mutation($input: UserInputData!) { createUser(userInput: $input) { _id } }",
                json!({ "input": { "email": email, "name": "Tester", "password": "secret-pw" } }),
            )
            .await;
        assert!(body.get("errors").is_none(), "{body}");
        body["data"]["createUser"]["_id"].as_str().unwrap().to_string()
    }

    async fn login(&self, email: &str) -> String {
        let body = self
            .graphql(
                None,
                "query($email: String!, $password: String!) { login(email: $email, password: $password) { token userId } }",
                json!({ "email": email, "password": "secret-pw" }),
            )
            .await;
        assert!(body.get("errors").is_none(), "{body}");
        body["data"]["login"]["token"].as_str().unwrap().to_string()
    }

    async fn create_post(&self, token: &str, title: &str) -> String {
        let body = self
            .graphql(
                Some(token),
                "mutation($input: PostInputData!) { createPost(postInput: $input) { _id } }",
                json!({ "input": { "title": title, "content": "Some content", "imageUrl": "images/pic.png" } }),
            )
            .await;
        assert!(body.get("errors").is_none(), "{body}");
        body["data"]["createPost"]["_id"].as_str().unwrap().to_string()
    }
}

fn first_error(body: &Value) -> &Value {
    &body["errors"][0]
}

#[tokio::test]
async fn test_protected_query_without_token_is_401() {
    let app = TestApp::new();

    let body = app
        .graphql(None, "{ getPosts(page: 1) { totalItems } }", json!({}))
        .await;

    let error = first_error(&body);
    assert_eq!(error["message"], "Not authenticated!");
    assert_eq!(error["extensions"]["statusCode"], 401);
}

#[tokio::test]
async fn test_garbage_token_is_treated_as_anonymous() {
    let app = TestApp::new();

    let body = app
        .graphql(Some("not-a-jwt"), "{ getUserStatus { status } }", json!({}))
        .await;

    assert_eq!(first_error(&body)["extensions"]["statusCode"], 401);
}

#[tokio::test]
async fn test_create_user_reports_every_invalid_field() {
    let app = TestApp::new();

    let body = app
        .graphql(
            None,
            "mutation($input: UserInputData!) { createUser(userInput: $input) { _id } }",
            json!({ "input": { "email": "not-an-email", "name": "X", "password": "abc" } }),
        )
        .await;

    let error = first_error(&body);
    assert_eq!(error["message"], "Invalid input");
    assert_eq!(error["extensions"]["statusCode"], 422);
    assert_eq!(
        error["extensions"]["data"],
        json!([{ "message": "Email is invalid" }, { "message": "Password is too short" }])
    );
}

#[tokio::test]
async fn test_duplicate_email_is_409() {
    let app = TestApp::new();
    app.signup("dup@example.com").await;

    let body = app
        .graphql(
            None,
            "mutation($input: UserInputData!) { createUser(userInput: $input) { _id } }",
            json!({ "input": { "email": "dup@example.com", "name": "Again", "password": "secret-pw" } }),
        )
        .await;

    let error = first_error(&body);
    assert_eq!(error["message"], "User exists already.");
    assert_eq!(error["extensions"]["statusCode"], 409);
}

#[tokio::test]
async fn test_new_user_has_default_status_and_hidden_password() {
    let app = TestApp::new();

    let body = app
        .graphql(
            None,
            "mutation($input: UserInputData!) { createUser(userInput: $input) { email name status password posts { _id } } }",
            json!({ "input": { "email": "new@example.com", "name": "New", "password": "secret-pw" } }),
        )
        .await;

    let user = &body["data"]["createUser"];
    assert_eq!(user["email"], "new@example.com");
    assert_eq!(user["status"], "I am new!");
    assert_eq!(user["password"], Value::Null);
    assert_eq!(user["posts"], json!([]));
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new();
    app.signup("login@example.com").await;

    let query = "query($email: String!, $password: String!) { login(email: $email, password: $password) { token } }";

    let body = app
        .graphql(None, query, json!({ "email": "nobody@example.com", "password": "secret-pw" }))
        .await;
    assert_eq!(first_error(&body)["message"], "User does not exist!");
    assert_eq!(first_error(&body)["extensions"]["statusCode"], 404);

    let body = app
        .graphql(None, query, json!({ "email": "login@example.com", "password": "wrong-pw" }))
        .await;
    assert_eq!(first_error(&body)["message"], "Password is incorrect!");
    assert_eq!(first_error(&body)["extensions"]["statusCode"], 401);
}

#[tokio::test]
async fn test_login_token_unlocks_user_status() {
    let app = TestApp::new();
    let user_id = app.signup("status@example.com").await;
    let token = app.login("status@example.com").await;

    let body = app
        .graphql(
            Some(&token),
            "mutation { updateUserStatus(status: \"Writing Rust\") { _id status } }",
            json!({}),
        )
        .await;
    assert_eq!(body["data"]["updateUserStatus"]["_id"], user_id.as_str());
    assert_eq!(body["data"]["updateUserStatus"]["status"], "Writing Rust");

    let body = app
        .graphql(Some(&token), "{ getUserStatus { status } }", json!({}))
        .await;
    assert_eq!(body["data"]["getUserStatus"]["status"], "Writing Rust");
}

#[tokio::test]
async fn test_token_cookie_is_accepted() {
    let app = TestApp::new();
    app.signup("cookie@example.com").await;
    let token = app.login("cookie@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("access_token={}", token))
        .body(Body::from(
            json!({ "query": "{ getUserStatus { status } }" }).to_string(),
        ))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["data"]["getUserStatus"]["status"], "I am new!");
}

#[tokio::test]
async fn test_create_post_validation_order() {
    let app = TestApp::new();
    app.signup("writer@example.com").await;
    let token = app.login("writer@example.com").await;

    let body = app
        .graphql(
            Some(&token),
            "mutation($input: PostInputData!) { createPost(postInput: $input) { _id } }",
            json!({ "input": { "title": "Hi", "content": "", "imageUrl": "images/a.png" } }),
        )
        .await;

    let error = first_error(&body);
    assert_eq!(error["extensions"]["statusCode"], 422);
    assert_eq!(
        error["extensions"]["data"],
        json!([{ "message": "Title is too short" }, { "message": "Content is too short" }])
    );
}

#[tokio::test]
async fn test_post_lifecycle_and_creator_links() {
    let app = TestApp::new();
    let user_id = app.signup("owner@example.com").await;
    let token = app.login("owner@example.com").await;
    let post_id = app.create_post(&token, "First post").await;

    let body = app
        .graphql(
            Some(&token),
            "query($id: ID!) { singlePost(postId: $id) { title imageUrl createdAt creator { _id name posts { _id } } } }",
            json!({ "id": post_id }),
        )
        .await;
    let post = &body["data"]["singlePost"];
    assert_eq!(post["title"], "First post");
    assert_eq!(post["imageUrl"], "images/pic.png");
    assert!(post["createdAt"].as_str().unwrap().ends_with('Z'));
    assert_eq!(post["creator"]["_id"], user_id.as_str());
    assert_eq!(post["creator"]["posts"][0]["_id"], post_id.as_str());

    let body = app
        .graphql(
            Some(&token),
            "mutation($id: ID!, $input: PostInputData!) { updatePost(postId: $id, postInput: $input) { title imageUrl } }",
            json!({ "id": post_id, "input": { "title": "Edited title", "content": "New content", "imageUrl": "undefined" } }),
        )
        .await;
    assert_eq!(body["data"]["updatePost"]["title"], "Edited title");
    assert_eq!(body["data"]["updatePost"]["imageUrl"], "images/pic.png");

    let body = app
        .graphql(
            Some(&token),
            "mutation($id: ID!) { deletePost(postId: $id) }",
            json!({ "id": post_id }),
        )
        .await;
    assert_eq!(body["data"]["deletePost"], true);

    let body = app
        .graphql(
            Some(&token),
            "query($id: ID!) { singlePost(postId: $id) { _id } }",
            json!({ "id": post_id }),
        )
        .await;
    assert_eq!(first_error(&body)["message"], "Post not found!");
    assert_eq!(first_error(&body)["extensions"]["statusCode"], 404);

    let body = app
        .graphql(Some(&token), "{ getUserStatus { posts { _id } } }", json!({}))
        .await;
    assert_eq!(body["data"]["getUserStatus"]["posts"], json!([]));
}

#[tokio::test]
async fn test_only_the_owner_may_change_a_post() {
    let app = TestApp::new();
    app.signup("alice@example.com").await;
    app.signup("mallory@example.com").await;
    let alice = app.login("alice@example.com").await;
    let mallory = app.login("mallory@example.com").await;
    let post_id = app.create_post(&alice, "Alice's post").await;

    let body = app
        .graphql(
            Some(&mallory),
            "mutation($id: ID!, $input: PostInputData!) { updatePost(postId: $id, postInput: $input) { _id } }",
            json!({ "id": post_id, "input": { "title": "Hijacked", "content": "Hijacked", "imageUrl": "undefined" } }),
        )
        .await;
    assert_eq!(
        first_error(&body)["message"],
        "You are not owner of the post so you cannot update this post!"
    );
    assert_eq!(first_error(&body)["extensions"]["statusCode"], 403);

    let body = app
        .graphql(
            Some(&mallory),
            "mutation($id: ID!) { deletePost(postId: $id) }",
            json!({ "id": post_id }),
        )
        .await;
    assert_eq!(
        first_error(&body)["message"],
        "You are not owner of the post so you cannot delete this post!"
    );
    assert_eq!(first_error(&body)["extensions"]["statusCode"], 403);

    let body = app
        .graphql(
            Some(&alice),
            "query($id: ID!) { singlePost(postId: $id) { title } }",
            json!({ "id": post_id }),
        )
        .await;
    assert_eq!(body["data"]["singlePost"]["title"], "Alice's post");
}

#[tokio::test]
async fn test_get_posts_pages_newest_first() {
    let app = TestApp::with_per_page(2);
    app.signup("feed@example.com").await;
    let token = app.login("feed@example.com").await;

    for title in ["Post number 1", "Post number 2", "Post number 3"] {
        app.create_post(&token, title).await;
    }

    let query = "query($page: Int!) { getPosts(page: $page) { totalItems posts { title } } }";

    let body = app.graphql(Some(&token), query, json!({ "page": 1 })).await;
    let data = &body["data"]["getPosts"];
    assert_eq!(data["totalItems"], 3);
    assert_eq!(
        data["posts"],
        json!([{ "title": "Post number 3" }, { "title": "Post number 2" }])
    );

    let body = app.graphql(Some(&token), query, json!({ "page": 2 })).await;
    assert_eq!(
        body["data"]["getPosts"]["posts"],
        json!([{ "title": "Post number 1" }])
    );

    let body = app.graphql(Some(&token), query, json!({ "page": 0 })).await;
    assert_eq!(body["data"]["getPosts"]["posts"][0]["title"], "Post number 3");
}

#[tokio::test]
async fn test_malformed_post_id_is_not_found() {
    let app = TestApp::new();
    app.signup("ids@example.com").await;
    let token = app.login("ids@example.com").await;

    let body = app
        .graphql(Some(&token), "{ singlePost(postId: \"12345\") { _id } }", json!({}))
        .await;

    assert_eq!(first_error(&body)["message"], "Post not found!");
    assert_eq!(first_error(&body)["extensions"]["statusCode"], 404);
}

#[tokio::test]
async fn test_graphiql_is_served() {
    let app = TestApp::new();

    let request = Request::builder()
        .uri("/graphql")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("graphiql"));
}
