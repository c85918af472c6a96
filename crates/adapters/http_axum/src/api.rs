//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod accessories;
pub mod sse;

use axum::Router;
use axum::routing::{get, put};

use hmipbridge_app::ports::SwitchControl;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<C>() -> Router<AppState<C>>
where
    C: SwitchControl + 'static,
{
    Router::new()
        .route("/accessories", get(accessories::list::<C>))
        .route("/accessories/{id}", get(accessories::get::<C>))
        .route("/accessories/{id}/on", put(accessories::set_on::<C>))
        .route("/events/stream", get(sse::stream::<C>))
}
