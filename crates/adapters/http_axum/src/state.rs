//! Shared application state for axum handlers.

use std::sync::Arc;

use hmipbridge_app::accessory_host::InMemoryAccessoryHost;
use hmipbridge_app::ports::SwitchControl;
use hmipbridge_app::services::bridge_service::BridgeService;

/// Bridge service specialised to the in-process host.
pub type Bridge<C> = BridgeService<Arc<InMemoryAccessoryHost>, C>;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so `C` does not need to be `Clone`.
pub struct AppState<C> {
    /// Accessory registry and write path.
    pub bridge: Arc<Bridge<C>>,
    /// Host the accessories push to; source of the SSE feed.
    pub host: Arc<InMemoryAccessoryHost>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
            host: Arc::clone(&self.host),
        }
    }
}

impl<C> AppState<C>
where
    C: SwitchControl + 'static,
{
    /// Create the state from handles already shared with the sync loop.
    pub fn new(bridge: Arc<Bridge<C>>, host: Arc<InMemoryAccessoryHost>) -> Self {
        Self { bridge, host }
    }
}
