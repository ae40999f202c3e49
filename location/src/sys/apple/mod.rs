//! Apple platform (iOS/macOS) location implementation using CoreLocation.
//!
//! The requested accuracy level is advisory here; CoreLocation picks the
//! source itself.

use std::time::Duration;

use futures::stream;
use log::debug;
use objc2_core_location::{CLAuthorizationStatus, CLLocation, CLLocationManager};

use crate::{Fix, FixStream, LocationError, WatchConfig};

/// How long to let CoreLocation warm up when no cached fix exists.
const FIX_WAIT: Duration = Duration::from_millis(1000);

fn fix_from(location: &CLLocation) -> Fix {
    let coordinate = unsafe { location.coordinate() };
    let accuracy = unsafe { location.horizontalAccuracy() };
    Fix {
        latitude: coordinate.latitude,
        longitude: coordinate.longitude,
        // Negative accuracy means the fix is invalid per CoreLocation docs
        horizontal_accuracy: (accuracy >= 0.0).then_some(accuracy),
        timestamp: crate::timestamp_now(),
    }
}

/// Reads one fix, blocking the calling thread while CoreLocation warms up.
///
/// The manager must not be held across an await point: `Retained` is not
/// `Send`, and the returned futures and streams promise `Send`.
fn read_location_blocking() -> Result<Fix, LocationError> {
    let manager = unsafe { CLLocationManager::new() };

    match unsafe { manager.authorizationStatus() } {
        CLAuthorizationStatus::AuthorizedAlways | CLAuthorizationStatus::AuthorizedWhenInUse => {}
        _ => return Err(LocationError::PermissionDenied),
    }

    // Prefer the cached location without starting updates
    if let Some(location) = unsafe { manager.location() } {
        return Ok(fix_from(&location));
    }

    unsafe { manager.startUpdatingLocation() };
    std::thread::sleep(FIX_WAIT);
    let location = unsafe { manager.location() };
    unsafe { manager.stopUpdatingLocation() };

    location
        .map(|location| fix_from(&location))
        .ok_or(LocationError::NotAvailable)
}

pub(crate) async fn current() -> Result<Fix, LocationError> {
    read_location_blocking()
}

pub(crate) fn watch(config: &WatchConfig) -> Result<FixStream, LocationError> {
    let interval = Duration::from_millis(u64::from(config.interval_ms));
    // Ticks without a fix are skipped; delivery ends only when the
    // subscription is closed
    Ok(Box::pin(stream::unfold((), move |()| async move {
        loop {
            futures_timer::Delay::new(interval).await;
            match read_location_blocking() {
                Ok(fix) => return Some((fix, ())),
                Err(err) => debug!("skipping location poll: {err}"),
            }
        }
    })))
}
