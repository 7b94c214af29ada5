use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::database::{InMemoryStore, RecordStore};
use crate::provider::{ProviderError, WeatherProvider, WeatherStackProvider};
use crate::weather_routes;

// Anything that goes in here must be a handle or pointer that can be cloned.
// The underlying state itself should be shared.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    /// Empty in-memory store and a WeatherStack client built from `config`.
    pub fn from_config(config: &Config) -> Result<AppState, ProviderError> {
        Ok(AppState {
            store: Arc::new(InMemoryStore::new()),
            provider: Arc::new(WeatherStackProvider::from_config(config)?),
        })
    }
}

/// Browsers on `frontend_origin` may call every route with credentials.
/// Requests from any other origin get no `access-control-allow-origin`.
///
/// Wildcards are not allowed together with credentials, so the requested
/// method and headers are echoed back instead.
pub fn cors_layer(frontend_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([frontend_origin]))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub fn create_app(state: AppState, frontend_origin: HeaderValue) -> Router {
    Router::new()
        .nest("/weather", weather_routes::routes(state))
        .layer(cors_layer(frontend_origin))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::provider::test::FakeProvider;

    const ORIGIN: &str = "http://localhost:3000";

    fn app() -> Router {
        let state = AppState {
            store: Arc::new(InMemoryStore::new()),
            provider: Arc::new(FakeProvider::default()),
        };
        create_app(state, HeaderValue::from_static(ORIGIN))
    }

    #[tokio::test]
    async fn preflight_from_frontend_is_allowed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/weather")
                    .header(header::ORIGIN, ORIGIN)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-custom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "content-type,x-custom"
        );
    }

    #[tokio::test]
    async fn other_origins_get_no_cors_headers() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/weather/unknown")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn lookup_is_served_under_weather_prefix() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/weather/unknown")
                    .header(header::ORIGIN, ORIGIN)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            ORIGIN
        );
    }
}
