//! Apple platform (iOS/macOS) permission implementation using CoreLocation.
//!
//! Both platforms share a single when-in-use authorization, which is
//! reported for the coarse and fine grades alike.

use objc2_core_location::{CLAuthorizationStatus, CLLocationManager};

use crate::{LocationPermission, PermissionError, PermissionStatus, RequestOutcome};

fn authorization_status() -> PermissionStatus {
    let manager = unsafe { CLLocationManager::new() };
    match unsafe { manager.authorizationStatus() } {
        CLAuthorizationStatus::AuthorizedAlways | CLAuthorizationStatus::AuthorizedWhenInUse => {
            PermissionStatus::Granted
        }
        CLAuthorizationStatus::Denied => PermissionStatus::Denied,
        CLAuthorizationStatus::Restricted => PermissionStatus::Restricted,
        _ => PermissionStatus::NotDetermined,
    }
}

pub(crate) async fn check(_permission: LocationPermission) -> PermissionStatus {
    authorization_status()
}

/// `requestWhenInUseAuthorization` returns before the user answers, so a
/// request issued from the `NotDetermined` state resolves to `NotDetermined`;
/// callers observe the final status on the next check.
pub(crate) async fn request() -> Result<RequestOutcome, PermissionError> {
    let manager = unsafe { CLLocationManager::new() };
    if unsafe { manager.authorizationStatus() } == CLAuthorizationStatus::NotDetermined {
        unsafe { manager.requestWhenInUseAuthorization() };
    }
    Ok(RequestOutcome::uniform(authorization_status(), false))
}

pub(crate) async fn should_show_rationale(_permission: LocationPermission) -> bool {
    false
}
