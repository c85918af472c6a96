//! Polling loop feeding vendor snapshots into the [`BridgeService`].

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use hmipbridge_domain::error::BridgeError;

use crate::ports::{AccessoryHost, StateSource, SwitchControl};
use crate::services::bridge_service::{BridgeService, SyncReport};

/// Fetch the current state once and apply it.
///
/// # Errors
///
/// Returns the source's error; the registry is left untouched in that case.
pub async fn sync_once<S, H, C>(
    source: &S,
    service: &BridgeService<H, C>,
) -> Result<SyncReport, BridgeError>
where
    S: StateSource,
    H: AccessoryHost,
    C: SwitchControl,
{
    let snapshot = source.current_state().await?;
    let report = service.apply_snapshot(&snapshot);
    tracing::debug!(
        devices = snapshot.devices.len(),
        added = report.added,
        updated = report.updated,
        removed = report.removed,
        "snapshot applied"
    );
    Ok(report)
}

/// Poll `source` every `interval` forever.
///
/// The first poll happens immediately. Fetch failures are logged and the
/// loop keeps going; stop it by aborting the task it runs in.
pub async fn run<S, H, C>(source: S, service: Arc<BridgeService<H, C>>, interval: Duration)
where
    S: StateSource,
    H: AccessoryHost,
    C: SwitchControl,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(err) = sync_once(&source, &service).await {
            tracing::warn!(error = %err, "failed to fetch current state");
        }
    }
}
