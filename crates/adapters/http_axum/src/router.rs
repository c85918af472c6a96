//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use hmipbridge_app::ports::SwitchControl;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// API routes live under `/api`. The [`TraceLayer`] logs each
/// request/response through `tracing`.
pub fn build<C>(state: AppState<C>) -> Router
where
    C: SwitchControl + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hmipbridge_app::accessory_host::InMemoryAccessoryHost;
    use hmipbridge_app::services::bridge_service::BridgeService;
    use hmipbridge_domain::command::SwitchStateCommand;
    use hmipbridge_domain::error::BridgeError;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubControl;

    impl SwitchControl for StubControl {
        async fn set_switch_state(&self, _command: SwitchStateCommand) -> Result<(), BridgeError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let host = Arc::new(InMemoryAccessoryHost::new(16));
        let bridge = Arc::new(BridgeService::new(Arc::clone(&host), StubControl));
        let app = build(AppState::new(bridge, host));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
