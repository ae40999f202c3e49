//! Cross-platform location permission handling.
//!
//! This crate provides a unified API for checking and requesting location
//! permissions across iOS, macOS, Android, Windows, and Linux platforms.
//!
//! Location access comes in two grades, [`LocationPermission::Coarse`] and
//! [`LocationPermission::Fine`]. Android treats them as separate runtime
//! permissions and [`request`] asks for both in a single prompt; every other
//! platform has a single location authorization, which is reported for both
//! grades.

#![warn(missing_docs)]

/// Platform-specific implementations.
pub mod sys;

/// The grade of location access being checked or requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationPermission {
    /// Approximate location (network-level accuracy).
    Coarse,
    /// Precise location (GPS-level accuracy).
    Fine,
}

impl LocationPermission {
    /// The Android manifest name for this permission.
    #[must_use]
    pub const fn android_name(self) -> &'static str {
        match self {
            Self::Coarse => "android.permission.ACCESS_COARSE_LOCATION",
            Self::Fine => "android.permission.ACCESS_FINE_LOCATION",
        }
    }
}

/// The current status of a location permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    /// Permission has been granted by the user.
    Granted,
    /// Permission has been denied by the user.
    Denied,
    /// Permission is restricted (e.g., parental controls on iOS).
    Restricted,
    /// Permission has not been requested yet.
    NotDetermined,
}

impl PermissionStatus {
    /// Whether this status allows location access.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// The result of a permission request prompt.
///
/// Carries the post-prompt status of both permission grades plus the
/// platform's hint about whether a denial should be explained to the user
/// before asking again. On platforms without a rationale concept the flag
/// is always `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Status of the coarse location permission after the prompt.
    pub coarse: PermissionStatus,
    /// Status of the fine location permission after the prompt.
    pub fine: PermissionStatus,
    /// Whether the platform suggests showing a rationale before re-asking.
    ///
    /// On Android this is `shouldShowRequestPermissionRationale`: `true`
    /// after a plain denial, `false` once the user selected "don't ask
    /// again" (or before any prompt was shown).
    pub should_show_rationale: bool,
}

impl RequestOutcome {
    /// Whether both permission grades were granted.
    #[must_use]
    pub const fn all_granted(&self) -> bool {
        self.coarse.is_granted() && self.fine.is_granted()
    }

    /// Outcome for platforms with a single location authorization.
    pub(crate) const fn uniform(status: PermissionStatus, should_show_rationale: bool) -> Self {
        Self {
            coarse: status,
            fine: status,
            should_show_rationale,
        }
    }
}

/// Errors that can occur when requesting location permissions.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PermissionError {
    /// The platform needs a host context (e.g., an Android Activity) that
    /// was not provided.
    #[error("a host context is required to request permissions on this platform")]
    ContextRequired,
    /// Location permissions are not supported on this platform.
    #[error("location permissions are not supported on this platform")]
    NotSupported,
    /// An underlying platform error occurred.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Check the current status of a location permission without requesting it.
pub async fn check(permission: LocationPermission) -> PermissionStatus {
    sys::check(permission).await
}

/// Whether both coarse and fine location access are currently granted.
pub async fn has_access() -> bool {
    sys::check(LocationPermission::Coarse).await.is_granted()
        && sys::check(LocationPermission::Fine).await.is_granted()
}

/// Request location permissions from the user.
///
/// Asks for coarse and fine access in a single prompt. If both have already
/// been granted or denied, this resolves to the current statuses without
/// showing a prompt.
///
/// # Errors
/// Returns a `PermissionError` if:
/// - The platform needs a host context that was not provided.
/// - An underlying platform error occurs.
pub async fn request() -> Result<RequestOutcome, PermissionError> {
    sys::request().await
}

/// Whether the user should be shown an explanation before re-requesting.
///
/// Only meaningful on Android, where it mirrors
/// `shouldShowRequestPermissionRationale`. Other platforms return `false`.
pub async fn should_show_rationale(permission: LocationPermission) -> bool {
    sys::should_show_rationale(permission).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn android_names_match_manifest_constants() {
        assert_eq!(
            LocationPermission::Coarse.android_name(),
            "android.permission.ACCESS_COARSE_LOCATION"
        );
        assert_eq!(
            LocationPermission::Fine.android_name(),
            "android.permission.ACCESS_FINE_LOCATION"
        );
    }

    #[test]
    fn all_granted_requires_both_grades() {
        let outcome = RequestOutcome {
            coarse: PermissionStatus::Granted,
            fine: PermissionStatus::Denied,
            should_show_rationale: true,
        };
        assert!(!outcome.all_granted());

        let outcome = RequestOutcome::uniform(PermissionStatus::Granted, false);
        assert!(outcome.all_granted());
    }

    #[test]
    fn only_granted_counts_as_granted() {
        assert!(PermissionStatus::Granted.is_granted());
        assert!(!PermissionStatus::Denied.is_granted());
        assert!(!PermissionStatus::Restricted.is_granted());
        assert!(!PermissionStatus::NotDetermined.is_granted());
    }
}
