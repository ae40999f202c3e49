//! Reverse geocoding from coordinates to postal addresses.
//!
//! [`ReverseGeocoder`] is the seam consumers program against; [`Nominatim`]
//! implements it over the OpenStreetMap Nominatim HTTP API. Lookups are
//! synchronous and block the calling thread, so callers inside an async
//! runtime should hop through `spawn_blocking`.

#![warn(missing_docs)]

use std::fmt;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

/// Default public Nominatim endpoint.
///
/// Subject to the OSM usage policy (absolute maximum of one request per
/// second); deployments with real traffic should run their own instance.
pub const OSM_NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("geofix/", env!("CARGO_PKG_VERSION"));

/// A resolved postal address line, e.g. "1600 Amphitheatre Pkwy".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Wrap an address line.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The address line as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Interface for reverse geocoding services.
///
/// Implementations resolve a coordinate to the nearest address line, or
/// `None` when the coordinate has no address or the lookup fails. Failures
/// are an implementation concern (logged there, not surfaced): a missing
/// address never blocks displaying the coordinate itself.
pub trait ReverseGeocoder {
    /// Resolve a coordinate to the nearest address line.
    fn reverse(&self, latitude: f64, longitude: f64) -> Option<Address>;
}

/// Errors that can occur during a geocoding lookup.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The HTTP request failed or returned a non-success status.
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The response body was not valid JSON.
    #[error("geocoding response malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The service answered but could not resolve the coordinate.
    #[error("coordinate could not be resolved: {0}")]
    Unresolved(String),
}

/// Reverse geocoder backed by the Nominatim HTTP API.
#[derive(Debug, Clone)]
pub struct Nominatim {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl Nominatim {
    /// Create a geocoder against a Nominatim instance at `endpoint`.
    ///
    /// # Errors
    /// Returns a [`GeocodeError`] if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, GeocodeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create a geocoder against the public OSM Nominatim endpoint.
    ///
    /// # Errors
    /// Returns a [`GeocodeError`] if the HTTP client cannot be constructed.
    pub fn public() -> Result<Self, GeocodeError> {
        Self::new(OSM_NOMINATIM_ENDPOINT)
    }

    fn fetch(&self, latitude: f64, longitude: f64) -> Result<Address, GeocodeError> {
        let url = format!("{}/reverse", self.endpoint.trim_end_matches('/'));
        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let body = self
            .client
            .get(url)
            .query(&[
                ("format", "jsonv2"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
            ])
            .send()?
            .error_for_status()?
            .text()?;
        address_from_json(&body)
    }
}

impl ReverseGeocoder for Nominatim {
    fn reverse(&self, latitude: f64, longitude: f64) -> Option<Address> {
        match self.fetch(latitude, longitude) {
            Ok(address) => Some(address),
            Err(err) => {
                warn!("reverse geocoding ({latitude}, {longitude}) failed: {err}");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    /// Set instead of `display_name` when the coordinate is outside
    /// coverage, e.g. `{"error": "Unable to geocode"}`.
    error: Option<String>,
}

fn address_from_json(body: &str) -> Result<Address, GeocodeError> {
    let response: ReverseResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        return Err(GeocodeError::Unresolved(error));
    }
    response
        .display_name
        .map(Address::new)
        .ok_or_else(|| GeocodeError::Unresolved("no display name in response".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGeocoder(Option<&'static str>);

    impl ReverseGeocoder for FixedGeocoder {
        fn reverse(&self, _latitude: f64, _longitude: f64) -> Option<Address> {
            self.0.map(Address::new)
        }
    }

    #[test]
    fn address_displays_its_line() {
        let address = Address::new("1600 Amphitheatre Pkwy");
        assert_eq!(address.to_string(), "1600 Amphitheatre Pkwy");
        assert_eq!(address.as_str(), "1600 Amphitheatre Pkwy");
    }

    #[test]
    fn geocoder_works_as_trait_object() {
        let geocoder: Box<dyn ReverseGeocoder> = Box::new(FixedGeocoder(Some("Somewhere 1")));
        assert_eq!(
            geocoder.reverse(1.0, 2.0),
            Some(Address::new("Somewhere 1"))
        );

        let geocoder: Box<dyn ReverseGeocoder> = Box::new(FixedGeocoder(None));
        assert_eq!(geocoder.reverse(1.0, 2.0), None);
    }

    #[test]
    fn parses_display_name_from_reverse_response() {
        let body = r#"{
            "place_id": 133317434,
            "licence": "Data © OpenStreetMap contributors",
            "display_name": "1600 Amphitheatre Pkwy, Mountain View, CA, United States",
            "address": {"road": "Amphitheatre Parkway"}
        }"#;
        let address = address_from_json(body).expect("address");
        assert_eq!(
            address.as_str(),
            "1600 Amphitheatre Pkwy, Mountain View, CA, United States"
        );
    }

    #[test]
    fn unresolvable_coordinate_is_an_error() {
        let body = r#"{"error": "Unable to geocode"}"#;
        match address_from_json(body) {
            Err(GeocodeError::Unresolved(message)) => assert_eq!(message, "Unable to geocode"),
            other => panic!("expected Unresolved, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(matches!(
            address_from_json("not json"),
            Err(GeocodeError::Malformed(_))
        ));
    }
}
