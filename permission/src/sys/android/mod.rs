//! Android permission implementation using JNI.
//!
//! Checking and requesting go through the androidx compat helpers
//! (`ContextCompat.checkSelfPermission`, `ActivityCompat.requestPermissions`),
//! which need a live `Activity` reference, so the entry points here take a
//! `JNIEnv` plus the activity object. The prompt outcome arrives through
//! `com.geofix.permission.PermissionBridge`: the host activity forwards
//! `onRequestPermissionsResult` for [`REQUEST_CODE`] to the bridge's native
//! `dispatchResult` method together with the rationale flag.

use std::sync::{Mutex, OnceLock};

use async_channel::{Receiver, Sender, bounded};
use jni::JNIEnv;
use jni::objects::{JClass, JIntArray, JObject, JObjectArray, JString, JValue};
use jni::sys::{jboolean, jint};
use log::{error, warn};

use crate::{LocationPermission, PermissionError, PermissionStatus, RequestOutcome};

/// Request code passed to `ActivityCompat.requestPermissions`.
///
/// The host activity must forward results for this code to the bridge.
pub const REQUEST_CODE: jint = 4301;

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: jint = 0;

static PENDING: OnceLock<Mutex<Option<Sender<RequestOutcome>>>> = OnceLock::new();

fn pending() -> &'static Mutex<Option<Sender<RequestOutcome>>> {
    PENDING.get_or_init(|| Mutex::new(None))
}

/// A permission prompt in flight, resolved when the host activity forwards
/// the result to the bridge.
#[derive(Debug)]
pub struct PendingRequest {
    receiver: Receiver<RequestOutcome>,
}

impl PendingRequest {
    /// Wait for the user's answer to the prompt.
    ///
    /// # Errors
    /// Returns an error if the prompt was superseded by a newer request
    /// before the user answered.
    pub async fn outcome(self) -> Result<RequestOutcome, PermissionError> {
        self.receiver
            .recv()
            .await
            .map_err(|_| PermissionError::Platform("permission prompt was superseded".into()))
    }
}

/// Check a location permission using the Activity context.
///
/// # Errors
/// Returns a `PermissionError` if the JNI call fails.
pub fn check_with_activity(
    env: &mut JNIEnv<'_>,
    activity: &JObject<'_>,
    permission: LocationPermission,
) -> Result<PermissionStatus, PermissionError> {
    let name = env
        .new_string(permission.android_name())
        .map_err(map_jni_error)?;
    let name = JObject::from(name);

    let granted = env
        .call_static_method(
            "androidx/core/content/ContextCompat",
            "checkSelfPermission",
            "(Landroid/content/Context;Ljava/lang/String;)I",
            &[JValue::Object(activity), JValue::Object(&name)],
        )
        .map_err(map_jni_error)?
        .i()
        .map_err(map_jni_error)?;

    Ok(if granted == PERMISSION_GRANTED {
        PermissionStatus::Granted
    } else {
        PermissionStatus::Denied
    })
}

/// Whether a rationale should be shown before re-requesting, using the
/// Activity context.
///
/// # Errors
/// Returns a `PermissionError` if the JNI call fails.
pub fn rationale_with_activity(
    env: &mut JNIEnv<'_>,
    activity: &JObject<'_>,
    permission: LocationPermission,
) -> Result<bool, PermissionError> {
    let name = env
        .new_string(permission.android_name())
        .map_err(map_jni_error)?;
    let name = JObject::from(name);

    env.call_static_method(
        "androidx/core/app/ActivityCompat",
        "shouldShowRequestPermissionRationale",
        "(Landroid/app/Activity;Ljava/lang/String;)Z",
        &[JValue::Object(activity), JValue::Object(&name)],
    )
    .map_err(map_jni_error)?
    .z()
    .map_err(map_jni_error)
}

/// Prompt for coarse and fine location access using the Activity context.
///
/// Shows a single system dialog covering both permissions. The returned
/// [`PendingRequest`] resolves once the host activity forwards
/// `onRequestPermissionsResult` to the bridge. Issuing a new request while
/// one is pending supersedes the old one.
///
/// # Errors
/// Returns a `PermissionError` if the JNI call fails.
pub fn request_with_activity(
    env: &mut JNIEnv<'_>,
    activity: &JObject<'_>,
) -> Result<PendingRequest, PermissionError> {
    let coarse = env
        .new_string(LocationPermission::Coarse.android_name())
        .map_err(map_jni_error)?;
    let fine = env
        .new_string(LocationPermission::Fine.android_name())
        .map_err(map_jni_error)?;

    let names = env
        .new_object_array(2, "java/lang/String", JObject::null())
        .map_err(map_jni_error)?;
    env.set_object_array_element(&names, 0, &coarse)
        .map_err(map_jni_error)?;
    env.set_object_array_element(&names, 1, &fine)
        .map_err(map_jni_error)?;

    env.call_static_method(
        "androidx/core/app/ActivityCompat",
        "requestPermissions",
        "(Landroid/app/Activity;[Ljava/lang/String;I)V",
        &[
            JValue::Object(activity),
            JValue::Object(&names),
            JValue::Int(REQUEST_CODE),
        ],
    )
    .map_err(map_jni_error)?;

    let (sender, receiver) = bounded(1);
    let mut guard = pending().lock().expect("pending request mutex poisoned");
    if guard.replace(sender).is_some() {
        warn!("superseding an unanswered permission request");
    }

    Ok(PendingRequest { receiver })
}

/// Entry point for `PermissionBridge.dispatchResult`.
///
/// Receives the permission names and grant results from
/// `onRequestPermissionsResult`, plus the post-prompt rationale flag.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_geofix_permission_PermissionBridge_dispatchResult(
    mut env: JNIEnv<'_>,
    _class: JClass<'_>,
    names: JObjectArray<'_>,
    grants: JIntArray<'_>,
    should_show_rationale: jboolean,
) {
    let outcome = match read_outcome(&mut env, &names, &grants, should_show_rationale) {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("failed to read permission result payload: {err}");
            return;
        }
    };

    let sender = pending()
        .lock()
        .expect("pending request mutex poisoned")
        .take();
    match sender {
        Some(sender) => {
            let _ = sender.try_send(outcome);
        }
        None => error!("received a permission result with no pending request"),
    }
}

fn read_outcome(
    env: &mut JNIEnv<'_>,
    names: &JObjectArray<'_>,
    grants: &JIntArray<'_>,
    should_show_rationale: jboolean,
) -> jni::errors::Result<RequestOutcome> {
    let count = env.get_array_length(names)?;
    let mut results = vec![0 as jint; count as usize];
    env.get_int_array_region(grants, 0, &mut results)?;

    // A grade missing from the result array reads as denied.
    let mut coarse = PermissionStatus::Denied;
    let mut fine = PermissionStatus::Denied;
    for (index, granted) in results.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let element = env.get_object_array_element(names, index as jint)?;
        let name = JString::from(element);
        let name = env.get_string(&name)?.to_string_lossy().into_owned();

        let status = if *granted == PERMISSION_GRANTED {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        if name == LocationPermission::Coarse.android_name() {
            coarse = status;
        } else if name == LocationPermission::Fine.android_name() {
            fine = status;
        }
    }

    Ok(RequestOutcome {
        coarse,
        fine,
        should_show_rationale: should_show_rationale != 0,
    })
}

// Async wrappers for the public API (require an Activity context)
pub(crate) async fn check(_permission: LocationPermission) -> PermissionStatus {
    // Without an Activity reference the status cannot be read; the
    // application must call check_with_activity directly.
    PermissionStatus::NotDetermined
}

pub(crate) async fn request() -> Result<RequestOutcome, PermissionError> {
    Err(PermissionError::ContextRequired)
}

pub(crate) async fn should_show_rationale(_permission: LocationPermission) -> bool {
    false
}

#[allow(clippy::needless_pass_by_value)]
fn map_jni_error(err: jni::errors::Error) -> PermissionError {
    PermissionError::Platform(err.to_string())
}
