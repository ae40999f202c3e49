//! # geofix-screen
//!
//! The single-screen location display flow: one "Get Location" action that
//! checks or requests permission, starts a fix subscription, and shows the
//! coordinate with its reverse-geocoded address.
//!
//! The controller, [`LocationScreen`], is generic over [`PlatformServices`]
//! so the flow can be driven against the real device services
//! ([`DeviceServices`]) or fakes in tests. Screen state lives in a
//! [`StateCell`] that UI layers subscribe to; declined permission prompts
//! surface as [`Notice`]s on a side channel rather than being rendered.
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use geofix_geocode::Nominatim;
//! use geofix_screen::{DeviceServices, LocationScreen};
//!
//! let services = DeviceServices::new(Nominatim::public()?);
//! let mut screen = LocationScreen::new(services);
//! let mut updates = screen.state().subscribe();
//!
//! screen.press_get_location().await?;
//! while screen.pump().await.is_some() {
//!     println!("{}", screen.render());
//! }
//! ```

#![warn(missing_docs)]

mod controller;
mod services;
mod state;

pub use controller::{LocationScreen, NoticeStream, ScreenError};
pub use services::{DeviceServices, PlatformServices};
pub use state::{StateCell, StateWatcher};

pub use geofix_geocode::{Address, ReverseGeocoder};
pub use geofix_location::{Fix, WatchConfig};
pub use geofix_permission::RequestOutcome;

/// Placeholder shown before any fix has arrived.
pub const NO_LOCATION_TEXT: &str = "Location not available";

/// What the screen is currently showing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScreenState {
    /// No fix received yet; the placeholder is shown.
    #[default]
    NoLocation,
    /// A fix has arrived and the coordinate line is shown.
    HasLocation(Fix),
}

impl ScreenState {
    /// Whether a fix has been received.
    #[must_use]
    pub const fn has_location(&self) -> bool {
        matches!(self, Self::HasLocation(_))
    }
}

/// A transient message for the user, emitted when a permission prompt is
/// declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The user denied the prompt but may be asked again; explain why the
    /// permission is needed.
    PermissionRationale,
    /// The user denied the prompt for good; access must be enabled through
    /// system settings.
    PermanentlyDenied,
}

impl Notice {
    /// The user-facing message for this notice.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::PermissionRationale => {
                "Location Permission is required for this feature to work."
            }
            Self::PermanentlyDenied => "Permission denied.\nPlease enable through Settings...",
        }
    }
}
