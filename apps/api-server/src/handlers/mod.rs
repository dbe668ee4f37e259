//! HTTP handlers and route configuration.

mod health;
mod posts;
mod search;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    // Public routes
    .route("/health", web::get().to(health::health_check))
    // Authenticated routes
    .route("/post", web::post().to(posts::create_post))
    .route("/search", web::get().to(search::search_posts));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test, web};
    use chrono::{TimeDelta, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::{Value, json};

    use around_core::domain::Distance;
    use around_core::ports::{SearchIndex, TokenService};
    use around_core::services::ensure_index;
    use around_infra::{InMemoryObjectStore, InMemorySearchIndex, JwtConfig, JwtTokenService};
    use around_shared::dto::PostResponse;

    use super::configure_routes;
    use crate::config::{AppConfig, IndexConfig, PostConfig};
    use crate::middleware;
    use crate::observability::RequestIdMiddleware;
    use crate::state::AppState;

    const SECRET: &str = "test-secret";
    const BOUNDARY: &str = "around-test-boundary";

    struct Fixture {
        state: AppState,
        index: Arc<InMemorySearchIndex>,
        store: Arc<InMemoryObjectStore>,
    }

    fn test_config(require_image: bool, max_upload_bytes: usize) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            index: IndexConfig {
                url: None,
                name: "around".to_string(),
                default_radius: Distance::default(),
                max_results: 100,
            },
            storage: None,
            jwt: JwtConfig {
                secret: SECRET.to_string(),
                issuer: None,
                leeway_secs: 0,
            },
            posts: PostConfig {
                require_image,
                max_upload_bytes,
            },
            upstream_timeout: Duration::from_secs(2),
        }
    }

    async fn fixture_with(config: AppConfig) -> Fixture {
        let index = Arc::new(InMemorySearchIndex::new(config.index.name.clone()));
        let store = Arc::new(InMemoryObjectStore::new("posts"));
        ensure_index(index.as_ref()).await.unwrap();

        let state = AppState::from_parts(index.clone(), store.clone(), &config);
        Fixture {
            state,
            index,
            store,
        }
    }

    async fn fixture(require_image: bool) -> Fixture {
        fixture_with(test_config(require_image, 1 << 20)).await
    }

    fn token_service() -> web::Data<Arc<dyn TokenService>> {
        let service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: SECRET.to_string(),
            issuer: None,
            leeway_secs: 0,
        }));
        web::Data::new(service)
    }

    fn bearer(username: &str) -> (header::HeaderName, String) {
        let claims = json!({
            "username": username,
            "exp": (Utc::now() + TimeDelta::hours(1)).timestamp(),
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    fn multipart(fields: &[(&str, &str)], image: Option<&[u8]>) -> (String, Vec<u8>) {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(bytes) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"cat.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        (format!("multipart/form-data; boundary={BOUNDARY}"), body)
    }

    fn post_request(fields: &[(&str, &str)], image: Option<&[u8]>) -> test::TestRequest {
        let (content_type, body) = multipart(fields, image);
        test::TestRequest::post()
            .uri("/post")
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
    }

    const HELLO: &[(&str, &str)] = &[("message", "hello"), ("lat", "37.0"), ("lon", "-122.0")];

    macro_rules! init_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap(RequestIdMiddleware)
                    .wrap(middleware::cors())
                    .app_data(web::Data::new($state))
                    .app_data(token_service())
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_post_then_search_finds_post() {
        let fx = fixture(true).await;
        let app = init_app!(fx.state.clone());

        let req = post_request(HELLO, Some(b"\xff\xd8\xff\xe0".as_slice()))
            .insert_header(bearer("alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Post received: hello");
        let id = body["data"]["id"].as_str().unwrap().to_string();
        let stored = fx.store.get(&id).await.unwrap();
        assert_eq!(stored.file_name.as_deref(), Some("cat.jpg"));
        assert_eq!(stored.content_type.as_deref(), Some("image/jpeg"));

        let req = test::TestRequest::get()
            .uri("/search?lat=37.0&lon=-122.0&range=1")
            .insert_header(bearer("bob"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let posts: Vec<PostResponse> = test::read_body_json(resp).await;

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].user, "alice");
        assert_eq!(posts[0].message, "hello");
        assert_eq!(posts[0].location.lat, 37.0);
        assert_eq!(posts[0].location.lon, -122.0);
        assert_eq!(posts[0].url.as_deref(), Some(format!("memory://posts/{id}").as_str()));
    }

    #[actix_web::test]
    async fn test_post_without_image_fails_and_indexes_nothing() {
        let fx = fixture(true).await;
        let app = init_app!(fx.state.clone());

        let req = post_request(HELLO, None).insert_header(bearer("alice")).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(fx.index.is_empty().await);
        assert!(fx.store.is_empty().await);
    }

    #[actix_web::test]
    async fn test_truncated_image_fails_and_indexes_nothing() {
        let fx = fixture(true).await;
        let app = init_app!(fx.state.clone());

        // Body ends inside the image part, without a closing boundary
        let (content_type, mut body) = multipart(HELLO, None);
        body.truncate(body.len() - format!("--{BOUNDARY}--\r\n").len());
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"cat.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"\xff\xd8\xff");
        let req = test::TestRequest::post()
            .uri("/post")
            .insert_header((header::CONTENT_TYPE, content_type))
            .insert_header(bearer("alice"))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().starts_with("Image is not available"));
        assert!(fx.index.is_empty().await);
        assert!(fx.store.is_empty().await);
    }

    #[actix_web::test]
    async fn test_post_without_image_when_optional() {
        let fx = fixture(false).await;
        let app = init_app!(fx.state.clone());

        let req = post_request(HELLO, None).insert_header(bearer("alice")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri("/search?lat=37.0&lon=-122.0&range=1")
            .insert_header(bearer("alice"))
            .to_request();
        let posts: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].message, "hello");
        assert_eq!(posts[0].url, None);
    }

    #[actix_web::test]
    async fn test_search_far_away_is_empty() {
        let fx = fixture(false).await;
        let app = init_app!(fx.state.clone());

        let req = post_request(HELLO, None).insert_header(bearer("alice")).to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::get()
            .uri("/search?lat=0&lon=0&range=1")
            .insert_header(bearer("alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"[]");
    }

    #[actix_web::test]
    async fn test_default_radius_applies_without_range() {
        let fx = fixture(false).await;
        let app = init_app!(fx.state.clone());

        let req = post_request(HELLO, None).insert_header(bearer("alice")).to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        // ~111 km north of the post, inside the 200 km default
        let req = test::TestRequest::get()
            .uri("/search?lat=38.0&lon=-122.0")
            .insert_header(bearer("alice"))
            .to_request();
        let posts: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(posts.len(), 1);
    }

    #[actix_web::test]
    async fn test_unauthorized_requests_never_reach_pipelines() {
        let fx = fixture(false).await;
        let app = init_app!(fx.state.clone());

        let req = post_request(HELLO, Some(b"img".as_slice())).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = post_request(HELLO, Some(b"img".as_slice()))
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/search?lat=37.0&lon=-122.0")
            .insert_header((header::AUTHORIZATION, "Basic YWxpY2U6c2VjcmV0"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Auth is checked before the query string is decoded
        let req = test::TestRequest::get().uri("/search?lat=abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        assert!(fx.index.is_empty().await);
        assert!(fx.store.is_empty().await);
    }

    #[actix_web::test]
    async fn test_invalid_coordinates_are_rejected() {
        let fx = fixture(true).await;
        let app = init_app!(fx.state.clone());

        let fields = [("message", "hello"), ("lat", "north"), ("lon", "-122.0")];
        let req = post_request(&fields, Some(b"img".as_slice()))
            .insert_header(bearer("alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/search?lat=abc&lon=0")
            .insert_header(bearer("alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 400);

        let req = test::TestRequest::get()
            .uri("/search?lat=0&lon=0&range=-5")
            .insert_header(bearer("alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert!(fx.index.is_empty().await);
        assert!(fx.store.is_empty().await);
    }

    #[actix_web::test]
    async fn test_oversized_upload_is_rejected() {
        let fx = fixture_with(test_config(true, 16)).await;
        let app = init_app!(fx.state.clone());

        let req = post_request(HELLO, Some([0u8; 64].as_slice()))
            .insert_header(bearer("alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(fx.index.is_empty().await);
    }

    #[actix_web::test]
    async fn test_search_allows_cross_origin_reads() {
        let fx = fixture(false).await;
        let app = init_app!(fx.state.clone());

        let req = test::TestRequest::get()
            .uri("/search?lat=37.0&lon=-122.0")
            .insert_header(bearer("alice"))
            .insert_header((header::ORIGIN, "https://around.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[actix_web::test]
    async fn test_request_id_is_echoed() {
        let fx = fixture(false).await;
        let app = init_app!(fx.state.clone());

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header(("X-Request-ID", "req-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-123");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["index"], "around");
        assert_eq!(body["index_reachable"], true);
    }

    #[actix_web::test]
    async fn test_index_bootstrap_is_idempotent() {
        let fx = fixture(false).await;

        ensure_index(fx.index.as_ref()).await.unwrap();
        assert!(fx.index.exists().await.unwrap());
        assert_eq!(fx.state.index.name(), "around");
    }
}
