//! Cross-platform device location access.
//!
//! This crate provides a unified API for reading device location across
//! iOS, macOS, Android, Windows, and Linux platforms.
//!
//! # Usage
//!
//! ```ignore
//! use geofix_location::{WatchConfig, current, watch};
//!
//! // One-shot reading
//! let fix = current().await?;
//! println!("{} {}", fix.latitude, fix.longitude);
//!
//! // Or subscribe to periodic fixes
//! use futures::StreamExt;
//! let mut subscription = watch(WatchConfig::default())?;
//! while let Some(fix) = subscription.next().await {
//!     println!("{} {}", fix.latitude, fix.longitude);
//! }
//! ```
//!
//! Permission handling lives in `geofix-permission`; neither [`current`] nor
//! [`watch`] prompts the user. Reading without access fails with
//! [`LocationError::PermissionDenied`].

#![warn(missing_docs)]

/// Platform-specific implementations.
pub mod sys;

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use serde::{Deserialize, Serialize};

pub use geofix_permission::{LocationPermission, PermissionStatus};

/// A geographic position reported by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Horizontal accuracy in meters, if available.
    pub horizontal_accuracy: Option<f64>,
    /// Timestamp as Unix epoch milliseconds.
    pub timestamp: u64,
}

impl Fix {
    /// A fix at the given coordinate, timestamped now, without accuracy.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            horizontal_accuracy: None,
            timestamp: timestamp_now(),
        }
    }
}

/// Requested positioning accuracy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accuracy {
    /// Precise positioning (GPS where available).
    #[default]
    Best,
    /// Reduced accuracy with lower power use (network-level positioning).
    Balanced,
}

/// Configuration for a location subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Minimum milliseconds between fixes.
    pub interval_ms: u32,
    /// Requested positioning accuracy.
    pub accuracy: Accuracy,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            accuracy: Accuracy::Best,
        }
    }
}

/// Errors that can occur when accessing location.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    /// Location permission was not granted.
    #[error("location permission denied")]
    PermissionDenied,
    /// Location services are disabled on the device.
    #[error("location services disabled")]
    ServiceDisabled,
    /// Location request timed out.
    #[error("location request timed out")]
    Timeout,
    /// Location is not available.
    #[error("location not available")]
    NotAvailable,
    /// The platform needs a host context (e.g., an Android bridge object)
    /// that was not provided.
    #[error("a host context is required for location access on this platform")]
    ContextRequired,
    /// A payload could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the underlying serde error.
        message: String,
    },
    /// An underlying platform error occurred.
    #[error("platform error: {message}")]
    Platform {
        /// Description of the underlying platform error.
        message: String,
    },
}

/// A boxed Stream of location fixes.
pub type FixStream = Pin<Box<dyn Stream<Item = Fix> + Send>>;

/// A live location subscription.
///
/// Yields [`Fix`]es as a [`Stream`]. Delivery stops when [`close`] is called
/// or the subscription is dropped; both release the underlying platform
/// watcher.
///
/// [`close`]: Subscription::close
pub struct Subscription {
    stream: Option<FixStream>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a fix stream whose resources are released by dropping it.
    #[must_use]
    pub fn new(stream: FixStream) -> Self {
        Self {
            stream: Some(stream),
            release: None,
        }
    }

    /// Wrap a fix stream with an explicit release hook.
    ///
    /// The hook runs once, on [`close`] or drop, after delivery has stopped.
    /// Platform backends that hold resources beyond the stream itself (such
    /// as a started Android listener) use this to stop them.
    ///
    /// [`close`]: Subscription::close
    #[must_use]
    pub fn with_release(stream: FixStream, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            stream: Some(stream),
            release: Some(Box::new(release)),
        }
    }

    /// Stop delivery and release the underlying platform watcher.
    ///
    /// After this the stream yields `None`. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.stream = None;
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Whether this subscription has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Stream for Subscription {
    type Item = Fix;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Fix>> {
        match self.get_mut().stream.as_mut() {
            Some(stream) => stream.as_mut().poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

/// Get the current device location.
///
/// # Errors
/// Returns a [`LocationError`] if permission is missing, location services
/// are disabled, or no fix is available.
pub async fn current() -> Result<Fix, LocationError> {
    sys::current().await
}

/// Subscribe to periodic location fixes.
///
/// Fixes arrive no more often than `config.interval_ms` apart. Ticks where
/// the platform has no fix are skipped rather than reported as errors.
///
/// # Errors
/// Returns a [`LocationError`] if permission is missing or the platform
/// cannot start a watcher.
pub fn watch(config: WatchConfig) -> Result<Subscription, LocationError> {
    sys::watch(&config).map(Subscription::new)
}

pub(crate) fn timestamp_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use futures::{StreamExt, stream};

    use super::*;

    fn fix_stream(fixes: Vec<Fix>) -> FixStream {
        Box::pin(stream::iter(fixes))
    }

    #[test]
    fn default_config_matches_standard_cadence() {
        let config = WatchConfig::default();
        assert_eq!(config.interval_ms, 1000);
        assert_eq!(config.accuracy, Accuracy::Best);
    }

    #[tokio::test]
    async fn subscription_yields_fixes_until_closed() {
        let mut subscription =
            Subscription::new(fix_stream(vec![Fix::new(1.0, 2.0), Fix::new(3.0, 4.0)]));

        let first = subscription.next().await.expect("first fix");
        assert_eq!(first.latitude, 1.0);

        subscription.close();
        assert!(subscription.is_closed());
        assert_eq!(subscription.next().await, None);
    }

    #[tokio::test]
    async fn close_runs_release_hook_once() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let mut subscription = Subscription::with_release(fix_stream(Vec::new()), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscription.close();
        subscription.close();
        drop(subscription);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drop_runs_release_hook() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let subscription = Subscription::with_release(fix_stream(Vec::new()), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        drop(subscription);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn watch_config_round_trips_through_json() {
        let config = WatchConfig {
            interval_ms: 250,
            accuracy: Accuracy::Balanced,
        };
        let json = serde_json::to_string(&config).expect("encode config");
        assert_eq!(json, r#"{"interval_ms":250,"accuracy":"balanced"}"#);
    }
}
