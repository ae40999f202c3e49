//! Platform-specific permission implementations.

#[cfg(any(target_os = "ios", target_os = "macos"))]
mod apple;

/// Android permission implementation and JNI entry points.
#[cfg(target_os = "android")]
pub mod android;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
mod linux;

// Re-export platform implementations
#[cfg(any(target_os = "ios", target_os = "macos"))]
pub(crate) use apple::{check, request, should_show_rationale};

#[cfg(target_os = "android")]
pub(crate) use android::{check, request, should_show_rationale};

#[cfg(target_os = "windows")]
pub(crate) use windows::{check, request, should_show_rationale};

#[cfg(target_os = "linux")]
pub(crate) use linux::{check, request, should_show_rationale};

// Fallback for unsupported platforms (compile-time stub)
#[cfg(not(any(
    target_os = "ios",
    target_os = "macos",
    target_os = "android",
    target_os = "windows",
    target_os = "linux"
)))]
pub(crate) async fn check(_permission: crate::LocationPermission) -> crate::PermissionStatus {
    crate::PermissionStatus::NotDetermined
}

#[cfg(not(any(
    target_os = "ios",
    target_os = "macos",
    target_os = "android",
    target_os = "windows",
    target_os = "linux"
)))]
pub(crate) async fn request() -> Result<crate::RequestOutcome, crate::PermissionError> {
    Err(crate::PermissionError::NotSupported)
}

#[cfg(not(any(
    target_os = "ios",
    target_os = "macos",
    target_os = "android",
    target_os = "windows",
    target_os = "linux"
)))]
pub(crate) async fn should_show_rationale(_permission: crate::LocationPermission) -> bool {
    false
}
