use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::fonts::fetch_catalog;
use crate::state::AppState;

pub async fn list_fonts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = &state.config;
    match fetch_catalog(&state.http, &config.fonts_api_url, config.fonts_api_key.as_deref()).await {
        Ok(families) => Json(families).into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch font catalog: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to fetch fonts." })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{body_json, get_req, test_app};
    use axum::{extract::Query, routing::get, Json, Router};
    use axum::http::StatusCode;
    use std::collections::HashMap;
    use tower::ServiceExt;

    /// Stand-in for the upstream catalog; echoes whether the key arrived.
    async fn spawn_upstream() -> String {
        let app = Router::new().route(
            "/webfonts",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                if q.get("key").map(String::as_str) != Some("test-key") {
                    return (StatusCode::FORBIDDEN, Json(serde_json::json!({"error": {}})));
                }
                (
                    StatusCode::OK,
                    Json(serde_json::json!({
                        "kind": "webfonts#webfontList",
                        "items": [
                            {"family": "Lato", "variants": ["regular", "italic", "700"], "category": "sans-serif"},
                            {"family": "Pacifico", "variants": ["regular"]}
                        ]
                    })),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/webfonts", addr)
    }

    async fn closed_port_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/webfonts", addr)
    }

    #[tokio::test]
    async fn lists_families_and_variants() {
        let url = spawn_upstream().await;
        let (_dirs, app) = test_app(|c| {
            c.fonts_api_url = url;
            c.fonts_api_key = Some("test-key".into());
        });

        let resp = app.oneshot(get_req("/fonts")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        for item in items {
            assert!(!item["family"].as_str().unwrap().is_empty());
            assert!(item["variants"].is_array());
            assert!(item.get("category").is_none());
        }
        assert_eq!(items[0]["family"], "Lato");
        assert_eq!(items[0]["variants"], serde_json::json!(["regular", "italic", "700"]));
    }

    #[tokio::test]
    async fn upstream_rejection_is_a_generic_500() {
        let url = spawn_upstream().await;
        let (_dirs, app) = test_app(|c| {
            c.fonts_api_url = url;
            c.fonts_api_key = Some("wrong-key".into());
        });

        let resp = app.oneshot(get_req("/fonts")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body, serde_json::json!({"error": "Failed to fetch fonts."}));
    }

    #[tokio::test]
    async fn network_fault_is_a_generic_500() {
        let url = closed_port_url().await;
        let (_dirs, app) = test_app(|c| {
            c.fonts_api_url = url;
            c.fonts_api_key = Some("secret-key".into());
        });

        let resp = app.oneshot(get_req("/fonts")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(!body.to_string().contains("secret-key"));
        assert_eq!(body["error"], "Failed to fetch fonts.");
    }

    #[tokio::test]
    async fn missing_key_is_a_500() {
        let (_dirs, app) = test_app(|c| c.fonts_api_key = None);
        let resp = app.oneshot(get_req("/fonts")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
