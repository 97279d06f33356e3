use axum::{
    Router,
    http::{Method, header},
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{features, middleware::auth::ApiKeys, state::AppState};

#[derive(OpenApi)]
#[openapi(
    paths(
        features::proxy::handlers::create_repartition,
        features::winners::handlers::list_winners,
        features::winners::handlers::export_winners_csv,
    ),
    components(
        schemas(
            storage::dto::common::PaginationMeta,
            storage::dto::common::ErrorBody,
            storage::models::Winner,
        )
    ),
    tags(
        (name = "proxy", description = "Server-side relay to privileged gateway functions"),
        (name = "winners", description = "Admin winners export"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

pub fn create_app(state: AppState, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_DISPOSITION])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .nest("/api/ocr", features::proxy::routes::routes())
        .nest("/api/admin", features::winners::routes::routes(api_keys))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{HeaderMap, Request, StatusCode},
        routing::{get, post},
    };
    use client::HttpGateway;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn upstream() -> String {
        let router = Router::new()
            .route(
                "/functions/v1/create-repartition",
                post(|headers: HeaderMap, body: String| async move {
                    assert_eq!(headers["authorization"], "Bearer service-key");
                    (StatusCode::CREATED, body)
                }),
            )
            .route(
                "/functions/v1/get-gagnants",
                get(|| async {
                    let winners: Vec<Value> = (1..=7)
                        .map(|n| {
                            json!({
                                "nom": format!("Nom{}", n),
                                "prenom": "Léa",
                                "email": format!("lea{}@example.fr", n),
                                "telephone": "0612345678",
                                "lot_titre": "Menu Best Of",
                                "type_lot_nom": "instant",
                                "date_attribution": "2025-07-14",
                                "statut_validation": "validé"
                            })
                        })
                        .collect();
                    axum::Json(winners)
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", address)
    }

    fn app(gateway_url: &str) -> Router {
        let gateway = HttpGateway::new(gateway_url, "anon-key").unwrap();
        create_app(
            AppState::new(gateway, "service-key"),
            ApiKeys::from_comma_separated("admin-key"),
        )
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn admin_get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("Authorization", "Bearer admin-key")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_proxy_relays_status_and_body() {
        let app = app(&upstream().await);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ocr/create-repartition")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"participation_id":"p1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(body_text(response).await, r#"{"participation_id":"p1"}"#);
    }

    #[tokio::test]
    async fn test_proxy_unreachable_upstream_is_bad_gateway() {
        let app = app("http://127.0.0.1:1");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ocr/create-repartition")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_winners_require_api_key() {
        let app = app(&upstream().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/admin/winners")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_winners_page() {
        let app = app(&upstream().await);

        let response = app
            .oneshot(admin_get("/api/admin/winners?page=2&page_size=5"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["total_items"], 7);
        assert_eq!(body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn test_winners_rejects_unknown_page_size() {
        let app = app(&upstream().await);

        let response = app
            .oneshot(admin_get("/api/admin/winners?page_size=7"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_winners_csv_attachment() {
        let app = app(&upstream().await);

        let response = app
            .oneshot(admin_get("/api/admin/winners.csv"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"gagnants.csv\""
        );
        let csv = body_text(response).await;
        assert_eq!(csv.lines().count(), 8);
        assert!(csv.starts_with("Nom,Prénom,Email"));
    }
}
