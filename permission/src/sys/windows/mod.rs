//! Windows permission implementation using WinRT.

use crate::{LocationPermission, PermissionError, PermissionStatus, RequestOutcome};

pub(crate) async fn check(_permission: LocationPermission) -> PermissionStatus {
    location_access().await
}

pub(crate) async fn request() -> Result<RequestOutcome, PermissionError> {
    // On Windows, RequestAccessAsync both checks and requests if needed
    Ok(RequestOutcome::uniform(location_access().await, false))
}

pub(crate) async fn should_show_rationale(_permission: LocationPermission) -> bool {
    false
}

async fn location_access() -> PermissionStatus {
    use windows::Devices::Geolocation::{GeolocationAccessStatus, Geolocator};

    match Geolocator::RequestAccessAsync() {
        Ok(op) => match op.get() {
            Ok(status) => match status {
                GeolocationAccessStatus::Allowed => PermissionStatus::Granted,
                GeolocationAccessStatus::Denied => PermissionStatus::Denied,
                GeolocationAccessStatus::Unspecified => PermissionStatus::NotDetermined,
                _ => PermissionStatus::NotDetermined,
            },
            Err(_) => PermissionStatus::NotDetermined,
        },
        Err(_) => PermissionStatus::NotDetermined,
    }
}
