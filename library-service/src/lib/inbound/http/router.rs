use std::sync::Arc;
use std::time::Duration;

use auth::TokenIssuer;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_book::create_book;
use super::handlers::delete_book::delete_book;
use super::handlers::health::health;
use super::handlers::list_books::list_books;
use super::handlers::login::login;
use super::handlers::register::register;
use super::middleware::authenticate;
use crate::domain::book::ports::BookServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub book_service: Arc<dyn BookServicePort>,
    pub token_issuer: Arc<TokenIssuer>,
    pub isbn_length: usize,
}

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.clone(), authenticate);

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    // Listing is public; writes on the same paths go through the guard.
    let book_routes = Router::new()
        .route(
            "/books",
            get(list_books).merge(post(create_book).route_layer(auth_layer.clone())),
        )
        .route("/books/:id", delete(delete_book).route_layer(auth_layer));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(book_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::header::AUTHORIZATION;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::book::service::BookService;
    use crate::outbound::repositories::InMemoryBookRepository;
    use crate::outbound::repositories::InMemoryUserRepository;
    use crate::user::service::UserService;

    const SECRET: &[u8] = b"router-test-secret-at-least-32-bytes-long";

    fn app() -> Router {
        let users = Arc::new(InMemoryUserRepository::new());
        let books = Arc::new(InMemoryBookRepository::new());

        let state = AppState {
            user_service: Arc::new(UserService::new(Arc::clone(&users))),
            book_service: Arc::new(BookService::new(books, users)),
            token_issuer: Arc::new(TokenIssuer::new(SECRET)),
            isbn_length: 13,
        };

        create_router(state, Duration::from_secs(5))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn create_book_request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/books")
            .header("content-type", "application/json");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder
            .body(Body::from(
                r#"{"isbn":"1111111111111","title":"T","author":"A","release_date":"2025-06-09"}"#,
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();

        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_books_is_public() {
        let request = Request::get("/books").body(Body::empty()).unwrap();

        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_book_requires_token() {
        let (status, body) = send(app(), create_book_request(None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing Authorization header");
    }

    #[tokio::test]
    async fn test_create_book_rejects_bad_token() {
        let (status, body) = send(app(), create_book_request(Some("Bearer junk"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn test_delete_book_requires_token() {
        let request = Request::delete("/books/1").body(Body::empty()).unwrap();

        let (status, _) = send(app(), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_book_with_valid_token() {
        let issuer = TokenIssuer::new(SECRET);
        let tokens = issuer
            .issue(&auth::TokenSubject::new(1, "a@x.com"))
            .unwrap();
        let authorization = format!("Bearer {}", tokens.access_token);

        let (status, body) = send(app(), create_book_request(Some(&authorization))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
    }
}
