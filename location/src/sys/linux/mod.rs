//! Linux location implementation using GeoClue2 D-Bus service.

use futures::stream;
use log::debug;

use crate::{Accuracy, Fix, FixStream, LocationError, WatchConfig};

/// GeoClue accuracy levels (GClueAccuracyLevel): STREET = 6, EXACT = 8.
const fn geoclue_accuracy(accuracy: Accuracy) -> u32 {
    match accuracy {
        Accuracy::Best => 8,
        Accuracy::Balanced => 6,
    }
}

pub(crate) async fn current() -> Result<Fix, LocationError> {
    fix_once(Accuracy::Best).await
}

pub(crate) fn watch(config: &WatchConfig) -> Result<FixStream, LocationError> {
    let interval = std::time::Duration::from_millis(u64::from(config.interval_ms));
    let accuracy = config.accuracy;
    // Ticks without a fix are skipped; delivery ends only when the
    // subscription is closed
    Ok(Box::pin(stream::unfold((), move |()| async move {
        loop {
            futures_timer::Delay::new(interval).await;
            match fix_once(accuracy).await {
                Ok(fix) => return Some((fix, ())),
                Err(err) => debug!("skipping location poll: {err}"),
            }
        }
    })))
}

/// Runs a full GeoClue client cycle: obtain a client, start it, read one
/// position, stop it.
async fn fix_once(accuracy: Accuracy) -> Result<Fix, LocationError> {
    use zbus::Connection;

    // Connect to the system bus
    let connection = Connection::system().await.map_err(|e| LocationError::Platform {
        message: format!("D-Bus connection failed: {e}"),
    })?;

    // Call GeoClue2 Manager to get a client
    let reply: (zbus::zvariant::OwnedObjectPath,) = connection
        .call_method(
            Some("org.freedesktop.GeoClue2"),
            "/org/freedesktop/GeoClue2/Manager",
            Some("org.freedesktop.GeoClue2.Manager"),
            "GetClient",
            &(),
        )
        .await
        .map_err(|_| LocationError::ServiceDisabled)?
        .body()
        .deserialize()
        .map_err(|e| LocationError::Platform {
            message: format!("Failed to parse response: {e}"),
        })?;

    let client_path = reply.0;

    // Set the desktop ID (required by GeoClue2)
    connection
        .call_method(
            Some("org.freedesktop.GeoClue2"),
            client_path.as_str(),
            Some("org.freedesktop.DBus.Properties"),
            "Set",
            &(
                "org.freedesktop.GeoClue2.Client",
                "DesktopId",
                zbus::zvariant::Value::from("geofix"),
            ),
        )
        .await
        .map_err(|e| LocationError::Platform {
            message: format!("Failed to set desktop ID: {e}"),
        })?;

    // Request the accuracy level before starting
    connection
        .call_method(
            Some("org.freedesktop.GeoClue2"),
            client_path.as_str(),
            Some("org.freedesktop.DBus.Properties"),
            "Set",
            &(
                "org.freedesktop.GeoClue2.Client",
                "RequestedAccuracyLevel",
                zbus::zvariant::Value::from(geoclue_accuracy(accuracy)),
            ),
        )
        .await
        .map_err(|e| LocationError::Platform {
            message: format!("Failed to set accuracy level: {e}"),
        })?;

    // Start the client
    connection
        .call_method(
            Some("org.freedesktop.GeoClue2"),
            client_path.as_str(),
            Some("org.freedesktop.GeoClue2.Client"),
            "Start",
            &(),
        )
        .await
        .map_err(|e| LocationError::Platform {
            message: format!("Failed to start GeoClue client: {e}"),
        })?;

    // Get the location object path
    let location_reply: zbus::zvariant::OwnedValue = connection
        .call_method(
            Some("org.freedesktop.GeoClue2"),
            client_path.as_str(),
            Some("org.freedesktop.DBus.Properties"),
            "Get",
            &("org.freedesktop.GeoClue2.Client", "Location"),
        )
        .await
        .map_err(|e| LocationError::Platform {
            message: format!("Failed to get location: {e}"),
        })?
        .body()
        .deserialize()
        .map_err(|e| LocationError::Platform {
            message: format!("Failed to parse location path: {e}"),
        })?;

    let location_path: zbus::zvariant::OwnedObjectPath = location_reply
        .downcast_ref::<zbus::zvariant::ObjectPath>()
        .map(|p| p.to_owned().into())
        .map_err(|_| LocationError::NotAvailable)?;

    // Get latitude and longitude from the location object
    let get_property = async |prop: &str| {
        let reply: zbus::zvariant::OwnedValue = connection
            .call_method(
                Some("org.freedesktop.GeoClue2"),
                location_path.as_str(),
                Some("org.freedesktop.DBus.Properties"),
                "Get",
                &("org.freedesktop.GeoClue2.Location", prop),
            )
            .await?
            .body()
            .deserialize()?;
        Ok::<f64, zbus::Error>(reply.downcast_ref::<f64>().unwrap_or(0.0))
    };

    let latitude = get_property("Latitude")
        .await
        .map_err(|e| LocationError::Platform {
            message: format!("Failed to get latitude: {e}"),
        })?;
    let longitude = get_property("Longitude")
        .await
        .map_err(|e| LocationError::Platform {
            message: format!("Failed to get longitude: {e}"),
        })?;
    let accuracy = get_property("Accuracy").await.ok();

    // Stop the client
    let _ = connection
        .call_method(
            Some("org.freedesktop.GeoClue2"),
            client_path.as_str(),
            Some("org.freedesktop.GeoClue2.Client"),
            "Stop",
            &(),
        )
        .await;

    Ok(Fix {
        latitude,
        longitude,
        horizontal_accuracy: accuracy,
        timestamp: crate::timestamp_now(),
    })
}
