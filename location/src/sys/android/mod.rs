//! Android location implementation using JNI.
//!
//! The host application supplies a `com.geofix.location.LocationBridge`
//! object wrapping Android's `LocationManager`. [`LocationBridge::new`]
//! registers a native handle with it; fixes then arrive through the bridge's
//! native `dispatchFix` method as JSON with the [`Fix`] field names
//! (`latitude`, `longitude`, `horizontal_accuracy`, `timestamp`).
//!
//! The module-level [`current`] and [`watch`] functions cannot reach the
//! host object and fail with [`LocationError::ContextRequired`]; Android
//! callers go through [`LocationBridge`] directly.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use async_channel::{Sender, unbounded};
use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::jlong;
use jni::{JNIEnv, JavaVM};
use log::error;

use crate::{Fix, FixStream, LocationError, Subscription, WatchConfig};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);
static SENDERS: OnceLock<Mutex<HashMap<u64, Sender<Fix>>>> = OnceLock::new();

fn senders() -> &'static Mutex<HashMap<u64, Sender<Fix>>> {
    SENDERS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Connection to the host application's location bridge object.
pub struct LocationBridge {
    vm: Arc<JavaVM>,
    bridge: GlobalRef,
    handle: u64,
}

impl fmt::Debug for LocationBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationBridge")
            .field("handle", &self.handle)
            .finish()
    }
}

impl LocationBridge {
    /// Create a connection from a host `LocationBridge` object.
    ///
    /// # Errors
    /// Returns a `LocationError` if the JNI calls fail.
    pub fn new(env: &JNIEnv<'_>, bridge: JObject<'_>) -> Result<Self, LocationError> {
        let vm = env.get_java_vm().map_err(map_jni_error)?;
        let global = env.new_global_ref(bridge).map_err(map_jni_error)?;
        let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);

        let connection = Self {
            vm: Arc::new(vm),
            bridge: global,
            handle,
        };
        connection.register_handle()?;
        Ok(connection)
    }

    /// Native handle associated with this bridge for callbacks from Kotlin.
    #[must_use]
    pub fn handle(&self) -> u64 {
        self.handle
    }

    /// Read the last known fix cached by the platform, if any.
    ///
    /// # Errors
    /// Returns [`LocationError::NotAvailable`] when the platform has no
    /// cached fix, or another `LocationError` if the JNI calls fail.
    pub fn last_known(&self) -> Result<Fix, LocationError> {
        let json = self.with_attached_env(|env, bridge| {
            let value = env
                .call_method(bridge, "lastKnownFix", "()Ljava/lang/String;", &[])?
                .l()?;
            if value.is_null() {
                return Ok(None);
            }
            let value = JString::from(value);
            Ok(Some(env.get_string(&value)?.to_string_lossy().into_owned()))
        })?;

        match json {
            Some(json) => from_json(&json),
            None => Err(LocationError::NotAvailable),
        }
    }

    /// Start periodic fixes through the bridge's location listener.
    ///
    /// The returned [`Subscription`] stops the listener when closed or
    /// dropped.
    ///
    /// # Errors
    /// Returns a `LocationError` if the configuration cannot be encoded or
    /// the JNI calls fail.
    pub fn start_updates(&self, config: &WatchConfig) -> Result<Subscription, LocationError> {
        let json = to_json(config)?;
        self.with_attached_env(|env, bridge| {
            let j_string = env.new_string(json.as_str())?;
            let j_object = JObject::from(j_string);
            let args = [JValue::Object(&j_object)];
            env.call_method(bridge, "configureUpdates", "(Ljava/lang/String;)V", &args)?;
            env.call_method(bridge, "startUpdates", "()V", &[])?;
            Ok(())
        })?;

        let (sender, receiver) = unbounded();
        {
            let mut map = senders().lock().expect("sender map mutex poisoned");
            map.insert(self.handle, sender);
        }

        let vm = Arc::clone(&self.vm);
        let bridge = self.bridge.clone();
        let handle = self.handle;
        let stream: FixStream = Box::pin(receiver);
        Ok(Subscription::with_release(stream, move || {
            {
                let mut map = senders().lock().expect("sender map mutex poisoned");
                map.remove(&handle);
            }
            match vm.attach_current_thread() {
                Ok(mut env) => {
                    if let Err(err) = env.call_method(bridge.as_obj(), "stopUpdates", "()V", &[]) {
                        error!("failed to stop Android location updates: {err}");
                    }
                }
                Err(err) => error!("failed to attach JNI thread for stop: {err}"),
            }
        }))
    }

    fn register_handle(&self) -> Result<(), LocationError> {
        self.with_attached_env(|env, bridge| {
            let args = [JValue::Long(self.handle as jlong)];
            env.call_method(bridge, "registerNativeHandle", "(J)V", &args)?;
            Ok(())
        })
    }

    fn with_attached_env<F, R>(&self, action: F) -> Result<R, LocationError>
    where
        F: FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> jni::errors::Result<R>,
    {
        let mut env = self.vm.attach_current_thread().map_err(map_jni_error)?;
        let bridge = self.bridge.as_obj();
        action(&mut env, bridge).map_err(map_jni_error)
    }
}

impl Drop for LocationBridge {
    fn drop(&mut self) {
        if let Some(map) = SENDERS.get() {
            let mut guard = map.lock().expect("sender map mutex poisoned");
            guard.remove(&self.handle);
        }
    }
}

/// Entry point for `LocationBridge.dispatchFix`.
///
/// Receives one fix from the host's location listener as JSON.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_geofix_location_LocationBridge_dispatchFix(
    mut env: JNIEnv<'_>,
    _class: JClass<'_>,
    handle: jlong,
    json_fix: JString<'_>,
) {
    #[allow(clippy::cast_sign_loss)]
    let handle = handle as u64;
    let json = match env.get_string(&json_fix) {
        Ok(value) => value.to_string_lossy().into_owned(),
        Err(err) => {
            error!("failed to read Android fix payload: {err}");
            return;
        }
    };

    match from_json::<Fix>(&json) {
        Ok(fix) => deliver_fix(handle, fix),
        Err(err) => error!("failed to decode Android fix payload: {err}"),
    }
}

/// Entry point for `LocationBridge.dispatchError`.
///
/// Provider errors do not tear the subscription down; the fix simply never
/// arrives, so they are only logged here.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_geofix_location_LocationBridge_dispatchError(
    mut env: JNIEnv<'_>,
    _class: JClass<'_>,
    handle: jlong,
    message: JString<'_>,
) {
    #[allow(clippy::cast_sign_loss)]
    let handle = handle as u64;
    match env.get_string(&message) {
        Ok(value) => {
            let message = value.to_string_lossy();
            error!("Android location error for handle {handle}: {message}");
        }
        Err(err) => error!("failed to read Android error payload: {err}"),
    }
}

fn deliver_fix(handle: u64, fix: Fix) {
    let sender = {
        let map = senders().lock().expect("sender map mutex poisoned");
        map.get(&handle).cloned()
    };

    if let Some(sender) = sender {
        let _ = sender.try_send(fix);
    } else {
        error!("received Android fix for unknown handle {handle}");
    }
}

// Async wrappers for the public API (require a bridge object)
pub(crate) async fn current() -> Result<Fix, LocationError> {
    Err(LocationError::ContextRequired)
}

pub(crate) fn watch(_config: &WatchConfig) -> Result<FixStream, LocationError> {
    Err(LocationError::ContextRequired)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, LocationError> {
    serde_json::to_string(value).map_err(|err| LocationError::Serialization {
        message: err.to_string(),
    })
}

fn from_json<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, LocationError> {
    serde_json::from_str(value).map_err(|err| LocationError::Serialization {
        message: err.to_string(),
    })
}

#[allow(clippy::needless_pass_by_value)]
fn map_jni_error(err: jni::errors::Error) -> LocationError {
    LocationError::Platform {
        message: err.to_string(),
    }
}
