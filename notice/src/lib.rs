//! Transient user notices.
//!
//! A [`Toast`] is a short message that appears briefly and dismisses itself.
//! On Android it maps to a platform toast (which needs the host activity),
//! on desktop platforms to a system notification, and elsewhere it falls
//! back to the log.

mod sys;

/// A short transient message shown to the user.
#[derive(Debug, Clone)]
pub struct Toast {
    text: String,
}

impl Toast {
    /// A toast carrying `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Show the toast, best effort.
    pub fn show(self) {
        sys::show_toast(&self.text);
    }

    /// Show the toast through the host activity as a platform toast.
    ///
    /// Must be called on the UI thread.
    ///
    /// # Errors
    /// Returns a description of the JNI failure, if any.
    #[cfg(target_os = "android")]
    pub fn show_with_activity(
        self,
        env: &mut jni::JNIEnv,
        activity: &jni::objects::JObject,
    ) -> Result<(), String> {
        sys::android::show_toast_with_activity(env, activity, &self.text)
    }
}
