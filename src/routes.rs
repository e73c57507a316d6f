//! 路由注册
//! 创建所有 API 路由，并为每组路由声明所需的保护级别

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{
    auth::{jwt_auth_middleware, protect, Protection, ResourceKind, TokenService},
    handlers,
    middleware::{request_tracking_middleware, AppState},
};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点
    let public_routes = Router::new()
        .route("/", get(handlers::health::banner))
        .route("/health", get(handlers::health::health_check))
        .route("/register", post(handlers::auth::register))
        .route("/authenticate", post(handlers::auth::authenticate));

    let note_collection = Router::new().route(
        "/api/notes",
        get(handlers::note::list_notes).post(handlers::note::create_note),
    );

    // 单条笔记：路由层只要求认证，记录归属由 NoteService 检查
    let note_item = Router::new().route(
        "/api/notes/{id}",
        get(handlers::note::get_note)
            .put(handlers::note::update_note)
            .delete(handlers::note::delete_note),
    );

    let user_routes = Router::new()
        .route(
            "/api/users",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/api/users/{id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        );

    Router::new()
        .merge(public_routes)
        .merge(guarded(note_collection, Protection::Authenticated, &state.tokens))
        .merge(guarded(note_item, Protection::OwnerOf(ResourceKind::Note), &state.tokens))
        .merge(guarded(user_routes, Protection::Admin, &state.tokens))
        .layer(DefaultBodyLimit::max(state.config.server.body_limit_bytes))
        .layer(from_fn(request_tracking_middleware))
        .with_state(state)
}

/// 认证在外层先执行，随后检查保护级别
fn guarded(
    routes: Router<Arc<AppState>>,
    protection: Protection,
    tokens: &Arc<TokenService>,
) -> Router<Arc<AppState>> {
    routes
        .route_layer(from_fn_with_state(protection, protect))
        .route_layer(from_fn_with_state(tokens.clone(), jwt_auth_middleware))
}
