use notify_rust::Notification as NrNotification;

pub fn show_toast(text: &str) {
    let _ = NrNotification::new().summary(text).show();
}
