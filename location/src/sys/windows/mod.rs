//! Windows location implementation using WinRT Geolocator.

use futures::stream;
use log::debug;
use windows::Devices::Geolocation::{
    GeolocationAccessStatus, Geolocator, PositionAccuracy,
};

use crate::{Accuracy, Fix, FixStream, LocationError, WatchConfig};

const fn position_accuracy(accuracy: Accuracy) -> PositionAccuracy {
    match accuracy {
        Accuracy::Best => PositionAccuracy::High,
        Accuracy::Balanced => PositionAccuracy::Default,
    }
}

fn check_access() -> Result<(), LocationError> {
    // RequestAccessAsync also serves as the permission check on Windows
    let access = Geolocator::RequestAccessAsync()
        .map_err(|e| LocationError::Platform {
            message: e.message().to_string(),
        })?
        .get()
        .map_err(|e| LocationError::Platform {
            message: e.message().to_string(),
        })?;

    match access {
        GeolocationAccessStatus::Allowed => Ok(()),
        GeolocationAccessStatus::Denied => Err(LocationError::PermissionDenied),
        _ => Err(LocationError::NotAvailable),
    }
}

fn read_position(accuracy: Accuracy) -> Result<Fix, LocationError> {
    let geolocator = Geolocator::new().map_err(|e| LocationError::Platform {
        message: e.message().to_string(),
    })?;
    let _ = geolocator.SetDesiredAccuracy(position_accuracy(accuracy));

    let position = geolocator
        .GetGeopositionAsync()
        .map_err(|e| LocationError::Platform {
            message: e.message().to_string(),
        })?
        .get()
        .map_err(|e| LocationError::Platform {
            message: e.message().to_string(),
        })?;

    let coord = position.Coordinate().map_err(|e| LocationError::Platform {
        message: e.message().to_string(),
    })?;

    let point = coord.Point().map_err(|e| LocationError::Platform {
        message: e.message().to_string(),
    })?;

    let pos = point.Position().map_err(|e| LocationError::Platform {
        message: e.message().to_string(),
    })?;

    let accuracy = coord.Accuracy().ok();

    Ok(Fix {
        latitude: pos.Latitude,
        longitude: pos.Longitude,
        horizontal_accuracy: accuracy,
        timestamp: crate::timestamp_now(),
    })
}

pub(crate) async fn current() -> Result<Fix, LocationError> {
    check_access()?;
    read_position(Accuracy::Best)
}

pub(crate) fn watch(config: &WatchConfig) -> Result<FixStream, LocationError> {
    check_access()?;
    let interval = std::time::Duration::from_millis(u64::from(config.interval_ms));
    let accuracy = config.accuracy;
    // Ticks without a fix are skipped; delivery ends only when the
    // subscription is closed
    Ok(Box::pin(stream::unfold((), move |()| async move {
        loop {
            futures_timer::Delay::new(interval).await;
            match read_position(accuracy) {
                Ok(fix) => return Some((fix, ())),
                Err(err) => debug!("skipping location poll: {err}"),
            }
        }
    })))
}
