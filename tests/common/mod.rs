//! 测试公共模块
//! 提供内存存储的应用状态与请求辅助函数

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use quicknote::{
    auth::Identity,
    config::{
        AppConfig, BootstrapConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig,
        StorageBackend,
    },
    middleware::AppState,
    models::user::{CreateUserRequest, Role, User},
    repository::MemoryUserStore,
    routes,
};
use secrecy::Secret;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
            graceful_shutdown_timeout_secs: 5,
            body_limit_bytes: 64 * 1024,
        },
        database: DatabaseConfig {
            backend: StorageBackend::Memory,
            url: std::env::var("TEST_DATABASE_URL").ok().map(Secret::new),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_SECRET.to_string()),
            token_ttl_secs: 300, // 5分钟用于测试
            // 最小成本，保持测试速度
            argon2_memory_kib: 64,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        },
        bootstrap: BootstrapConfig::default(),
    }
}

/// 创建基于内存存储的测试应用状态
pub fn create_test_app_state() -> Arc<AppState> {
    let users = MemoryUserStore::new();
    let notes = Arc::new(users.note_store());

    Arc::new(
        AppState::new(create_test_config(), Arc::new(users), notes)
            .expect("Failed to create test app state"),
    )
}

/// 测试应用：共享状态与路由
pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = create_test_app_state();
        let router = routes::create_router(state.clone());
        Self { state, router }
    }

    /// 发送请求，返回状态码、响应头和解析后的响应体
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send_request(builder.body(body).unwrap()).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, headers, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let (status, _, body) = self.send(Method::GET, uri, token, None).await;
        (status, body)
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let (status, _, body) = self.send(Method::POST, uri, token, Some(body)).await;
        (status, body)
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let (status, _, body) = self.send(Method::PUT, uri, token, Some(body)).await;
        (status, body)
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let (status, _, body) = self.send(Method::DELETE, uri, token, None).await;
        (status, body)
    }

    /// 直接在存储中创建用户
    pub async fn create_test_user(&self, username: &str, password: &str, role: Role) -> User {
        self.state
            .user_service
            .create(CreateUserRequest {
                username: Some(username.to_string()),
                password: Some(password.to_string()),
                role: Some(role.to_string()),
            })
            .await
            .expect("Failed to create test user")
    }

    /// 为用户签发令牌
    pub fn token_for(&self, user: &User) -> String {
        self.issue(user, self.state.tokens.ttl_secs())
    }

    /// 签发一个已过期的令牌
    pub fn expired_token_for(&self, user: &User) -> String {
        self.issue(user, -1)
    }

    fn issue(&self, user: &User, ttl_secs: i64) -> String {
        let identity = Identity {
            subject: user.id.to_string(),
            role: user.role,
        };
        self.state
            .tokens
            .issue(&identity, ttl_secs)
            .expect("Failed to issue test token")
    }

    /// 创建用户并返回其令牌
    pub async fn login_as(&self, username: &str, role: Role) -> (User, String) {
        let user = self.create_test_user(username, "pw1", role).await;
        let token = self.token_for(&user);
        (user, token)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// 初始化测试数据库（需要 TEST_DATABASE_URL）
pub async fn setup_test_db() -> sqlx::PgPool {
    let mut config = create_test_config();
    config.database.backend = StorageBackend::Postgres;
    assert!(
        config.database.url.is_some(),
        "TEST_DATABASE_URL must be set for database tests"
    );

    let pool = quicknote::db::create_pool(&config.database)
        .await
        .expect("Failed to create test database pool");

    quicknote::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE TABLE notes, users CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean test database");

    pool
}
