#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use axum_extra::extract::cookie::Key;
use linkpage::config::Config;
use linkpage::db::LinkStorage;
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub storage: LinkStorage,
    db_path: PathBuf,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` pair from the response's `Set-Cookie`, ready for a `Cookie` header.
    pub fn session_cookie(&self) -> String {
        self.headers
            .get(header::SET_COOKIE)
            .expect("response did not set a cookie")
            .to_str()
            .expect("set-cookie was not ascii")
            .split(';')
            .next()
            .expect("empty set-cookie")
            .to_string()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Start an app whose config is adjusted by `configure` after the test defaults.
    pub async fn spawn_with(configure: impl FnOnce(&mut Config)) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut db_path = std::env::temp_dir();
        db_path.push(format!(
            "linkpage-test-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));

        let mut cfg = Config::default();
        cfg.basic.database_url = format!("sqlite:{}", db_path.display());
        cfg.basic.insecure_cookie = true;
        // Lowest bcrypt cost keeps the suite fast.
        cfg.auth.bcrypt_cost = 4;
        configure(&mut cfg);

        let storage = linkpage::db::connect(&cfg.basic.database_url)
            .await
            .expect("failed to open test database");
        let state = linkpage::LinkpageState::new(storage.clone(), &cfg, Key::generate());
        let app = linkpage::linkpage_router(state);

        Self {
            app,
            storage,
            db_path,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let resp = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, cookie, None).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, cookie, Some(body)).await
    }

    /// Register `email` and return its session cookie.
    pub async fn sign_up(&self, email: &str) -> String {
        let resp = self
            .post(
                "/signup",
                None,
                json!({ "email": email, "password": "password123" }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "signup failed: {:?}", resp.body);
        resp.session_cookie()
    }

    pub async fn set_username(&self, cookie: &str, username: &str) -> TestResponse {
        self.post("/settings", Some(cookie), json!({ "username": username }))
            .await
    }

    pub async fn add_link(&self, cookie: &str, title: &str, url: &str) -> TestResponse {
        self.post("/links", Some(cookie), json!({ "title": title, "url": url }))
            .await
    }
}

impl TestApp {
    /// Run raw SQL against the app's database, bypassing the services.
    pub async fn execute_sql(&self, sql: &str) {
        sqlx::query(sql)
            .execute(self.storage.pool())
            .await
            .expect("raw sql failed");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.db_path);
        for suffix in ["-wal", "-shm"] {
            let mut p = self.db_path.clone().into_os_string();
            p.push(suffix);
            let _ = fs::remove_file(p);
        }
    }
}

pub fn titles(links: &Value) -> Vec<String> {
    links
        .as_array()
        .expect("links should be an array")
        .iter()
        .map(|l| l["title"].as_str().expect("title").to_string())
        .collect()
}
