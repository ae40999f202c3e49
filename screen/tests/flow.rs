//! Screen flow tests against fake device services.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use futures::{FutureExt, StreamExt};

use geofix_location::{LocationError, Subscription};
use geofix_permission::{PermissionError, PermissionStatus};
use geofix_screen::{
    Address, Fix, LocationScreen, NO_LOCATION_TEXT, Notice, PlatformServices, RequestOutcome,
    ScreenState, WatchConfig,
};

#[derive(Clone)]
struct FakeServices {
    granted: Arc<AtomicBool>,
    outcome: RequestOutcome,
    fixes: Vec<Fix>,
    address: Option<String>,
    request_count: Arc<AtomicUsize>,
    watch_count: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl FakeServices {
    fn with_permission(fixes: Vec<Fix>) -> Self {
        Self {
            granted: Arc::new(AtomicBool::new(true)),
            outcome: grant_all(),
            fixes,
            address: Some("1600 Amphitheatre Pkwy".to_string()),
            request_count: Arc::new(AtomicUsize::new(0)),
            watch_count: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn prompting(outcome: RequestOutcome, fixes: Vec<Fix>) -> Self {
        Self {
            granted: Arc::new(AtomicBool::new(false)),
            outcome,
            ..Self::with_permission(fixes)
        }
    }

    fn without_addresses(mut self) -> Self {
        self.address = None;
        self
    }
}

impl PlatformServices for FakeServices {
    async fn has_location_permission(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request_location_permission(&self) -> Result<RequestOutcome, PermissionError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if self.outcome.all_granted() {
            self.granted.store(true, Ordering::SeqCst);
        }
        Ok(self.outcome)
    }

    fn watch_fixes(&self, _config: &WatchConfig) -> Result<Subscription, LocationError> {
        self.watch_count.fetch_add(1, Ordering::SeqCst);
        let stream = futures::stream::iter(self.fixes.clone());
        let released = Arc::clone(&self.released);
        Ok(Subscription::with_release(Box::pin(stream), move || {
            released.fetch_add(1, Ordering::SeqCst);
        }))
    }

    fn reverse_geocode(&self, _fix: &Fix) -> Option<Address> {
        self.address.clone().map(Address::from)
    }
}

fn outcome(
    coarse: PermissionStatus,
    fine: PermissionStatus,
    should_show_rationale: bool,
) -> RequestOutcome {
    RequestOutcome {
        coarse,
        fine,
        should_show_rationale,
    }
}

fn grant_all() -> RequestOutcome {
    outcome(PermissionStatus::Granted, PermissionStatus::Granted, false)
}

fn sample_fix() -> Fix {
    Fix {
        latitude: 37.4220,
        longitude: -122.0841,
        horizontal_accuracy: None,
        timestamp: 1_700_000_000_000,
    }
}

#[tokio::test]
async fn starts_on_placeholder() {
    let mut screen = LocationScreen::new(FakeServices::with_permission(Vec::new()));

    assert_eq!(screen.render(), NO_LOCATION_TEXT);
    assert!(!screen.state().get().has_location());
    assert!(!screen.is_watching());
    assert!(screen.pump().await.is_none());
}

#[tokio::test]
async fn press_with_permission_starts_updates_and_shows_address() {
    let services = FakeServices::with_permission(vec![sample_fix()]);
    let mut screen = LocationScreen::new(services.clone());

    screen.press_get_location().await.expect("press");
    assert!(screen.is_watching());
    assert_eq!(services.watch_count.load(Ordering::SeqCst), 1);
    assert_eq!(services.request_count.load(Ordering::SeqCst), 0);

    let fix = screen.pump().await.expect("fix");
    assert_eq!(fix, sample_fix());
    assert_eq!(
        screen.render(),
        "Address 37.422 -122.0841 \n 1600 Amphitheatre Pkwy"
    );
}

#[tokio::test]
async fn press_without_permission_prompts_then_starts_on_grant() {
    let services = FakeServices::prompting(grant_all(), vec![sample_fix()]);
    let mut screen = LocationScreen::new(services.clone());

    screen.press_get_location().await.expect("press");

    assert!(screen.is_watching());
    assert!(services.granted.load(Ordering::SeqCst));
    assert_eq!(services.request_count.load(Ordering::SeqCst), 1);
    assert!(screen.notices().next().now_or_never().is_none());
}

#[tokio::test]
async fn denied_with_rationale_emits_rationale_notice() {
    let services = FakeServices::prompting(
        outcome(PermissionStatus::Denied, PermissionStatus::Denied, true),
        Vec::new(),
    );
    let mut screen = LocationScreen::new(services);

    screen.press_get_location().await.expect("press");
    assert!(!screen.is_watching());

    let notice = screen.notices().next().await.expect("notice");
    assert_eq!(notice, Notice::PermissionRationale);
    assert_eq!(
        notice.message(),
        "Location Permission is required for this feature to work."
    );
}

#[tokio::test]
async fn denied_forever_emits_settings_notice() {
    let services = FakeServices::prompting(
        outcome(PermissionStatus::Denied, PermissionStatus::Denied, false),
        Vec::new(),
    );
    let mut screen = LocationScreen::new(services);

    screen.press_get_location().await.expect("press");
    assert!(!screen.is_watching());

    let notice = screen.notices().next().await.expect("notice");
    assert_eq!(notice, Notice::PermanentlyDenied);
    assert_eq!(
        notice.message(),
        "Permission denied.\nPlease enable through Settings..."
    );
}

#[tokio::test]
async fn partial_grant_is_still_declined() {
    let services = FakeServices::prompting(
        outcome(PermissionStatus::Granted, PermissionStatus::Denied, true),
        vec![sample_fix()],
    );
    let mut screen = LocationScreen::new(services);

    screen.press_get_location().await.expect("press");

    assert!(!screen.is_watching());
    let notice = screen.notices().next().await.expect("notice");
    assert_eq!(notice, Notice::PermissionRationale);
}

#[tokio::test]
async fn second_press_replaces_subscription() {
    let services = FakeServices::with_permission(vec![sample_fix()]);
    let mut screen = LocationScreen::new(services.clone());

    screen.press_get_location().await.expect("first press");
    screen.press_get_location().await.expect("second press");

    assert_eq!(services.watch_count.load(Ordering::SeqCst), 2);
    assert_eq!(services.released.load(Ordering::SeqCst), 1);

    screen.close();
    assert_eq!(services.released.load(Ordering::SeqCst), 2);
    assert!(!screen.is_watching());
}

#[tokio::test]
async fn fix_updates_notify_state_watchers() {
    let first = Fix::new(37.4220, -122.0841);
    let second = Fix::new(37.4221, -122.0842);
    let services = FakeServices::with_permission(vec![first.clone(), second.clone()]);
    let mut screen = LocationScreen::new(services);
    let mut updates = screen.state().subscribe();

    screen.press_get_location().await.expect("press");
    screen.pump().await.expect("first fix");
    screen.pump().await.expect("second fix");

    assert_eq!(updates.changed().await, Some(ScreenState::HasLocation(first)));
    assert_eq!(updates.changed().await, Some(ScreenState::HasLocation(second)));
}

#[tokio::test]
async fn missing_address_renders_coordinates_only() {
    let services = FakeServices::with_permission(vec![sample_fix()]).without_addresses();
    let mut screen = LocationScreen::new(services);

    screen.press_get_location().await.expect("press");
    screen.pump().await.expect("fix");

    assert_eq!(screen.render(), "Address 37.422 -122.0841");
}

#[tokio::test]
async fn close_releases_watcher() {
    let services = FakeServices::with_permission(Vec::new());
    let mut screen = LocationScreen::new(services.clone());

    screen.press_get_location().await.expect("press");
    assert!(screen.is_watching());

    screen.close();
    screen.close();

    assert!(!screen.is_watching());
    assert_eq!(services.released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dropping_the_screen_releases_watcher() {
    let services = FakeServices::with_permission(Vec::new());
    let mut screen = LocationScreen::new(services.clone());

    screen.press_get_location().await.expect("press");
    drop(screen);

    assert_eq!(services.released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn run_drains_subscription() {
    let fixes = vec![Fix::new(1.0, 2.0), Fix::new(3.0, 4.0), Fix::new(5.0, 6.0)];
    let last = fixes.last().cloned().expect("fixes");
    let services = FakeServices::with_permission(fixes);
    let mut screen = LocationScreen::new(services);

    screen.press_get_location().await.expect("press");
    screen.run().await;

    assert_eq!(screen.state().get(), ScreenState::HasLocation(last));
    assert!(!screen.is_watching());
}
