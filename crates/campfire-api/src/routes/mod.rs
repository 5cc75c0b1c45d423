//! API routes

pub mod auth;
mod health;
mod relays;
mod stories;
pub mod types;

use axum::Router;

use crate::state::AppState;

// Re-export the auth gate for external use
pub use auth::RequireAuth;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(stories::routes())
        .merge(relays::routes())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::create_router;
    use crate::state::AppState;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode, header};
    use campfire_auth::{TokenService, hash_password};
    use campfire_db::{Database, NewUser, Role};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    pub struct TestApp {
        pub router: Router,
        pub state: AppState,
    }

    pub async fn test_app() -> TestApp {
        // One pinned connection: an in-memory SQLite database exists per
        // connection, and a recycled connection would lose the schema.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let db = Database::with_pool(pool).await.unwrap();
        let tokens = Arc::new(TokenService::new("test-secret-key", 24));
        let state = AppState::new(db, tokens);
        TestApp {
            router: create_router(state.clone()),
            state,
        }
    }

    pub fn signup_body(nickname: &str, password: &str) -> Value {
        json!({"nickname": nickname, "password": password})
    }

    async fn send(
        app: &TestApp,
        method: &str,
        uri: &str,
        body: Option<&Value>,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(value) => Body::from(serde_json::to_vec(value).unwrap()),
            None => Body::empty(),
        };
        let request = builder.body(body).unwrap();
        app.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
        send(app, "GET", uri, None, None).await
    }

    pub async fn post_json(
        app: &TestApp,
        uri: &str,
        body: &Value,
        cookie: Option<&str>,
    ) -> Response<Body> {
        send(app, "POST", uri, Some(body), cookie).await
    }

    pub async fn put_json(
        app: &TestApp,
        uri: &str,
        body: &Value,
        cookie: Option<&str>,
    ) -> Response<Body> {
        send(app, "PUT", uri, Some(body), cookie).await
    }

    pub async fn delete(app: &TestApp, uri: &str, cookie: Option<&str>) -> Response<Body> {
        send(app, "DELETE", uri, None, cookie).await
    }

    pub async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Extract the cookie pair from a signin response's Set-Cookie header
    fn auth_cookie(response: &Response<Body>) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("signin sets a cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    pub async fn signup_and_signin(app: &TestApp, nickname: &str, password: &str) -> String {
        let response = post_json(app, "/signup", &signup_body(nickname, password), None).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = post_json(app, "/signin", &signup_body(nickname, password), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        auth_cookie(&response)
    }

    /// Insert an admin account directly and sign it in over HTTP
    pub async fn seed_admin_and_signin(app: &TestApp) -> String {
        let password_hash = hash_password("adminpw99").unwrap();
        app.state
            .db
            .insert_user(NewUser {
                nickname: "moderator".to_string(),
                password_hash,
                role: Role::Admin,
            })
            .await
            .unwrap();

        let response = post_json(
            app,
            "/signin",
            &signup_body("moderator", "adminpw99"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        auth_cookie(&response)
    }

    /// Create a story through the API and return its id
    pub async fn create_story(app: &TestApp, cookie: &str, title: &str) -> i64 {
        let response = post_json(
            app,
            "/stories",
            &json!({"title": title, "content": "Once upon a time"}),
            Some(cookie),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(get(app, "/stories").await).await;
        body["stories"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["title"] == title)
            .expect("created story listed")["id"]
            .as_i64()
            .unwrap()
    }
}
