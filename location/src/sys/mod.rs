//! Platform-specific location implementations.

#[cfg(any(target_os = "ios", target_os = "macos"))]
mod apple;

/// Android platform implementation and JNI entry points.
#[cfg(target_os = "android")]
pub mod android;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
mod linux;

// Re-export platform implementations
#[cfg(any(target_os = "ios", target_os = "macos"))]
pub(crate) use apple::{current, watch};

#[cfg(target_os = "android")]
pub(crate) use android::{current, watch};

#[cfg(target_os = "windows")]
pub(crate) use windows::{current, watch};

#[cfg(target_os = "linux")]
pub(crate) use linux::{current, watch};

// Fallback for unsupported platforms
#[cfg(not(any(
    target_os = "ios",
    target_os = "macos",
    target_os = "android",
    target_os = "windows",
    target_os = "linux"
)))]
pub(crate) async fn current() -> Result<crate::Fix, crate::LocationError> {
    Err(crate::LocationError::NotAvailable)
}

#[cfg(not(any(
    target_os = "ios",
    target_os = "macos",
    target_os = "android",
    target_os = "windows",
    target_os = "linux"
)))]
pub(crate) fn watch(
    _config: &crate::WatchConfig,
) -> Result<crate::FixStream, crate::LocationError> {
    Err(crate::LocationError::NotAvailable)
}
