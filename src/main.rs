use anyhow::Context;
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, DODGE_DB, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = crate::config::config();
    tracing::info!("Starting dodge API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("DODGE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    println!("dodge API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn app() -> Router {
    let config = crate::config::config();

    let mut router = Router::new()
        // Service meta
        .route("/", get(root))
        .route("/health", get(health))
        // Resource areas
        .merge(user_routes())
        .merge(post_routes())
        .merge(vote_routes())
        .merge(comment_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(axum::extract::DefaultBodyLimit::max(
            config.api.max_request_size_bytes,
        ));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn user_routes() -> Router {
    use axum::routing::{post, put};
    use handlers::users;

    Router::new()
        .route(
            "/api/users",
            post(users::register).get(users::list).delete(users::delete_all),
        )
        .route("/api/users/:id", get(users::show).delete(users::remove))
        .route("/api/users/:id/password", put(users::update_password))
}

fn post_routes() -> Router {
    use axum::routing::post;
    use handlers::posts;

    Router::new()
        .route(
            "/api/posts",
            post(posts::create).get(posts::list).delete(posts::delete_all),
        )
        .route("/api/posts/:pid", get(posts::show).delete(posts::remove))
        .route("/api/posts/user/:uid", get(posts::list_by_author))
}

fn vote_routes() -> Router {
    use axum::routing::post;
    use handlers::votes;

    Router::new()
        .route("/api/votes", post(votes::cast))
        .route("/api/votes/posts/:pid", get(votes::list_by_post))
        .route("/api/votes/users/:uid", get(votes::list_by_user))
        .route("/api/votes/results/:pid", get(votes::results))
}

fn comment_routes() -> Router {
    use axum::routing::post;
    use handlers::comments;

    Router::new()
        .route("/api/comments", post(comments::create))
        .route("/api/comments/post/:pid", get(comments::list_by_post))
        .route(
            "/api/comments/:cid/like",
            post(comments::react).delete(comments::unreact),
        )
        .route("/api/comments/:cid/votes", get(comments::reaction_counts))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "dodge API",
            "version": version,
            "description": "Binary-choice voting and discussion API built with Rust (Axum)",
            "endpoints": {
                "users": "/api/users[/:id]",
                "posts": "/api/posts[/:pid], /api/posts/user/:uid",
                "votes": "/api/votes, /api/votes/{posts,users,results}/:id",
                "comments": "/api/comments, /api/comments/post/:pid, /api/comments/:cid/{like,votes}",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
