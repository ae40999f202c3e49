//! # Geofix
//!
//! Cross-platform building blocks for a "where am I" screen: location
//! permission prompts, device fixes, reverse geocoding, and the
//! single-screen flow that ties them together, across macOS, iOS, Android,
//! Windows, and Linux.
//!
//! ## Features
//!
//! Geofix is modular. Enable only the features you need to keep your
//! dependencies minimal.
//!
//! - `permission`: Location permission checks and prompts.
//! - `location`: One-shot fixes and periodic fix subscriptions.
//! - `geocode`: Reverse geocoding of coordinates to address lines.
//! - `notice`: Transient user notices (toasts, desktop notifications).
//! - `screen`: The location screen controller tying the above together.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! geofix = { version = "0.1", features = ["screen", "notice"] }
//! ```
//!
//! ```rust,ignore
//! use geofix::screen::{DeviceServices, LocationScreen};
//!
//! let services = DeviceServices::new(geofix::geocode::Nominatim::public()?);
//! let mut screen = LocationScreen::new(services);
//! screen.press_get_location().await?;
//! while screen.pump().await.is_some() {
//!     println!("{}", screen.render());
//! }
//! ```

#[cfg(feature = "geocode")]
pub use geofix_geocode as geocode;

#[cfg(feature = "location")]
pub use geofix_location as location;

#[cfg(feature = "notice")]
pub use geofix_notice as notice;

#[cfg(feature = "permission")]
pub use geofix_permission as permission;

#[cfg(feature = "screen")]
pub use geofix_screen as screen;
