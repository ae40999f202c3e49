//! Linux permission implementation.
//!
//! Traditional Linux has no runtime location permission prompt. GeoClue
//! mediates location access itself through its D-Bus agent, and sandboxed
//! apps (Flatpak/Snap) go through portals, so from the application's point
//! of view access is simply available.

use crate::{LocationPermission, PermissionError, PermissionStatus, RequestOutcome};

pub(crate) async fn check(_permission: LocationPermission) -> PermissionStatus {
    PermissionStatus::Granted
}

pub(crate) async fn request() -> Result<RequestOutcome, PermissionError> {
    Ok(RequestOutcome::uniform(PermissionStatus::Granted, false))
}

pub(crate) async fn should_show_rationale(_permission: LocationPermission) -> bool {
    false
}
