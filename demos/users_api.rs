//! A small users API demonstrating routes, scoped middleware and the
//! response helpers.
//!
//! Run with `RUST_LOG=debug cargo run --example users_api`, then try:
//!
//! ```text
//! curl -i http://localhost:8080/users/42?active=true
//! curl -i http://localhost:8080/admin
//! curl -i -H 'X-Api-Key: letmein' http://localhost:8080/admin
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use microroute_rs::{
    HandlerArgs, HttpRequest, HttpServer, Rejection, ResponseValue, Router, ServerConfig, ServerError,
    StatusCode, GLOBAL_SCOPE,
};
use serde::Serialize;
use serde_json::{json, Value};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Serialize)]
struct User<'a> {
    id: &'a str,
    name: String,
}

#[derive(Serialize)]
struct UserView<'a> {
    user: User<'a>,
    query: &'a microroute_rs::QueryParams,
    request_id: Option<&'a Value>,
}

async fn show_user(args: HandlerArgs) -> Result<ResponseValue, ServerError> {
    let id = args.params.get("id").unwrap_or_default();
    if id == "0" {
        return Ok(ResponseValue::error(StatusCode::NOT_FOUND, format!("no user with id {id}")));
    }

    ResponseValue::json(&UserView {
        user: User { id, name: format!("user-{id}") },
        query: &args.query,
        request_id: args.middleware.first(),
    })
}

async fn request_id(_req: HttpRequest) -> Result<Value, Rejection> {
    Ok(Value::from(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)))
}

async fn require_api_key(req: HttpRequest) -> Result<Value, Rejection> {
    match req.get_header("X-Api-Key") {
        Some(key) if key == "letmein" => Ok(json!({ "principal": "admin" })),
        _ => Err(Rejection::new("missing or invalid API key").with_status(StatusCode::UNAUTHORIZED)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ServerConfig::from_env()?;

    let mut builder = Router::builder();
    builder.middleware(GLOBAL_SCOPE, request_id);
    builder.middleware("/admin", require_api_key);

    builder
        .get("/", |_args: HandlerArgs| async {
            Ok::<_, ServerError>(ResponseValue::from("<h1>Welcome to microroute-rs!</h1>").with_content_type("text/html"))
        })?
        .get("/users/:id", show_user)?
        .post("/users", |_args: HandlerArgs| async {
            ResponseValue::json(&json!({ "created": true })).map(|value| value.with_status(StatusCode::CREATED))
        })?
        .delete("/users/:id", |args: HandlerArgs| async move {
            Ok::<_, ServerError>(ResponseValue::from(format!("deleted {}", &args.params[0])))
        })?
        .get("/files/*path", |args: HandlerArgs| async move {
            Ok::<_, ServerError>(ResponseValue::from(format!("would serve {}", args.params.get("path").unwrap_or(""))))
        })?
        .get("/admin", |args: HandlerArgs| async move {
            // [request id, principal]
            ResponseValue::json(&args.middleware)
        })?;

    let server = HttpServer::new(config, builder.build());
    server.start().await?;

    Ok(())
}
