//! The platform seam for the location screen.

use geofix_geocode::{Address, ReverseGeocoder};
use geofix_location::{Fix, LocationError, Subscription, WatchConfig};
use geofix_permission::{PermissionError, RequestOutcome};

/// Device capabilities the location screen depends on.
///
/// The controller is generic over this trait: production code wires in
/// [`DeviceServices`], tests substitute fakes.
#[allow(async_fn_in_trait)]
pub trait PlatformServices {
    /// Whether both location permission grades are currently granted.
    async fn has_location_permission(&self) -> bool;

    /// Prompt the user for location permissions.
    ///
    /// # Errors
    /// Returns a [`PermissionError`] if the prompt cannot be issued.
    async fn request_location_permission(&self) -> Result<RequestOutcome, PermissionError>;

    /// Start a periodic fix subscription.
    ///
    /// # Errors
    /// Returns a [`LocationError`] if the platform cannot start a watcher.
    fn watch_fixes(&self, config: &WatchConfig) -> Result<Subscription, LocationError>;

    /// Resolve a fix to the nearest address line.
    ///
    /// Blocking, like [`ReverseGeocoder::reverse`].
    fn reverse_geocode(&self, fix: &Fix) -> Option<Address>;
}

/// Production [`PlatformServices`], backed by the device's permission and
/// location services plus a reverse geocoder.
#[derive(Debug, Clone)]
pub struct DeviceServices<G> {
    geocoder: G,
}

impl<G: ReverseGeocoder> DeviceServices<G> {
    /// Wire the device services around `geocoder`.
    #[must_use]
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }
}

impl<G: ReverseGeocoder> PlatformServices for DeviceServices<G> {
    async fn has_location_permission(&self) -> bool {
        geofix_permission::has_access().await
    }

    async fn request_location_permission(&self) -> Result<RequestOutcome, PermissionError> {
        geofix_permission::request().await
    }

    fn watch_fixes(&self, config: &WatchConfig) -> Result<Subscription, LocationError> {
        geofix_location::watch(config.clone())
    }

    fn reverse_geocode(&self, fix: &Fix) -> Option<Address> {
        self.geocoder.reverse(fix.latitude, fix.longitude)
    }
}
