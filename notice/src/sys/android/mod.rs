//! Android toast implementation using JNI.

use jni::JNIEnv;
use jni::objects::{JObject, JValue};

/// `Toast.LENGTH_LONG`.
const LENGTH_LONG: i32 = 1;

/// Without an activity reference the platform toast cannot be shown.
pub fn show_toast(text: &str) {
    log::info!("notice (no activity context): {text}");
}

pub fn show_toast_with_activity(
    env: &mut JNIEnv,
    activity: &JObject,
    text: &str,
) -> Result<(), String> {
    let jtext = env.new_string(text).map_err(|e| format!("new_string: {e}"))?;
    let jtext = JObject::from(jtext);

    let toast = env
        .call_static_method(
            "android/widget/Toast",
            "makeText",
            "(Landroid/content/Context;Ljava/lang/CharSequence;I)Landroid/widget/Toast;",
            &[
                JValue::Object(activity),
                JValue::Object(&jtext),
                JValue::Int(LENGTH_LONG),
            ],
        )
        .map_err(|e| format!("makeText: {e}"))?
        .l()
        .map_err(|e| format!("makeText result: {e}"))?;

    env.call_method(&toast, "show", "()V", &[])
        .map_err(|e| format!("show: {e}"))?;

    Ok(())
}
