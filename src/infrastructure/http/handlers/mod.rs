//! HTTP Handlers

mod ai;
mod ping;
mod status;

pub use ai::*;
pub use ping::*;
pub use status::*;

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    use crate::application::{ExternalInferencePort, ExternalSettings};
    use crate::domain::fallback::FallbackEngine;
    use crate::infrastructure::http::routes::create_routes;
    use crate::infrastructure::http::state::AppState;
    use crate::infrastructure::memory::InMemoryStatusCache;

    /// 构造测试路由，`external` 为 None 时仅有本地降级
    pub fn router(external: Option<Arc<dyn ExternalInferencePort>>) -> Router {
        let settings = ExternalSettings {
            credential_present: external.is_some(),
            force_fallback_only: false,
            model_name: "fake-model".to_string(),
        };
        let state = AppState::new(
            external,
            Arc::new(FallbackEngine::new().unwrap()),
            InMemoryStatusCache::new(settings).arc(),
            Duration::from_secs(2),
        );
        create_routes().with_state(Arc::new(state))
    }

    pub async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
