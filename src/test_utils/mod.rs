#![allow(missing_docs)]

use axum::{Extension, Router};
use axum_test::TestServer;
use serde_json::json;

use crate::{
    AppState, AuthSettings,
    auth::{LogInResponse, PasswordHash, UserID, create_user},
    build_router,
    db::DbPool,
};

pub(crate) const TEST_SECRET: &str = "averysecretsecret";

/// An in-memory database with two users, returned as (pool, alice, bob).
pub(crate) async fn get_test_db_pool() -> (DbPool, UserID, UserID) {
    let db_pool = DbPool::open_in_memory().expect("Could not open in-memory database");
    let (alice, bob) = {
        let connection = db_pool.acquire().await.unwrap();
        let hash = PasswordHash::new_unchecked("hunter2");
        let alice = create_user("alice@example.com", &hash, "alice-token", &connection).unwrap();
        let bob = create_user("bob@example.com", &hash, "bob-token", &connection).unwrap();
        (alice.id, bob.id)
    };

    (db_pool, alice, bob)
}

/// Serve `router` as if every request was authenticated as `user_id`.
pub(crate) fn serve_as(user_id: UserID, router: Router<DbPool>, db_pool: DbPool) -> TestServer {
    let app = router.layer(Extension(user_id)).with_state(db_pool);

    TestServer::new(app).expect("Could not create test server.")
}

/// A server for the full application backed by an in-memory database.
pub(crate) fn get_test_app_server() -> TestServer {
    let db_pool = DbPool::open_in_memory().expect("Could not open in-memory database");
    let settings = AuthSettings {
        password_cost: 4,
        ..Default::default()
    };
    let app = build_router(AppState::new(db_pool, TEST_SECRET, settings), None);

    TestServer::new(app).expect("Could not create test server.")
}

/// Register and log in `email` through the public endpoints, returning the token.
pub(crate) async fn register_and_log_in(server: &TestServer, email: &str) -> String {
    let credentials = json!({"email": email, "password": "hunter2"});

    server
        .post("/register")
        .json(&credentials)
        .await
        .assert_status_ok();

    server
        .post("/login")
        .json(&credentials)
        .await
        .json::<LogInResponse>()
        .token
}
