#[cfg(target_os = "android")]
pub mod android;
#[cfg(target_os = "android")]
pub use android::show_toast;

#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
pub mod desktop;
#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
pub use desktop::show_toast;

#[cfg(not(any(
    target_os = "android",
    target_os = "linux",
    target_os = "windows",
    target_os = "macos"
)))]
pub fn show_toast(text: &str) {
    log::info!("notice: {text}");
}
