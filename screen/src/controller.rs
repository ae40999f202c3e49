//! The location screen controller.

use std::fmt;
use std::pin::Pin;

use async_channel::{Receiver, Sender, unbounded};
use futures::{Stream, StreamExt};
use log::debug;

use geofix_location::{Fix, LocationError, Subscription, WatchConfig};
use geofix_permission::PermissionError;

use crate::services::PlatformServices;
use crate::state::StateCell;
use crate::{NO_LOCATION_TEXT, Notice, ScreenState};

/// A boxed Stream of notices.
pub type NoticeStream = Pin<Box<dyn Stream<Item = Notice> + Send>>;

/// Errors surfaced by screen actions.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// The permission prompt could not be issued.
    #[error(transparent)]
    Permission(#[from] PermissionError),
    /// The location watcher could not be started.
    #[error(transparent)]
    Location(#[from] LocationError),
}

/// Controller for the single location screen.
///
/// Owns the screen state, the running fix subscription, and the notice
/// channel. The screen starts on [`ScreenState::NoLocation`] and moves to
/// [`ScreenState::HasLocation`] with the first fix; it never moves back.
pub struct LocationScreen<S> {
    services: S,
    config: WatchConfig,
    state: StateCell<ScreenState>,
    subscription: Option<Subscription>,
    notice_tx: Sender<Notice>,
    notice_rx: Receiver<Notice>,
}

impl<S: PlatformServices> LocationScreen<S> {
    /// A screen over `services` with the default watch cadence.
    pub fn new(services: S) -> Self {
        Self::with_config(services, WatchConfig::default())
    }

    /// A screen over `services` watching at `config`'s cadence.
    pub fn with_config(services: S, config: WatchConfig) -> Self {
        let (notice_tx, notice_rx) = unbounded();
        Self {
            services,
            config,
            state: StateCell::new(ScreenState::NoLocation),
            subscription: None,
            notice_tx,
            notice_rx,
        }
    }

    /// Handle on the observable screen state.
    #[must_use]
    pub fn state(&self) -> StateCell<ScreenState> {
        self.state.clone()
    }

    /// Stream of notices to surface to the user, e.g. as toasts.
    #[must_use]
    pub fn notices(&self) -> NoticeStream {
        Box::pin(self.notice_rx.clone())
    }

    /// Whether a fix subscription is currently running.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.subscription.is_some()
    }

    /// The "Get Location" button.
    ///
    /// With permission in hand this (re)starts the fix subscription,
    /// closing any previous one. Without it, the user is prompted: a full
    /// grant starts the subscription, a declined prompt emits a [`Notice`]
    /// instead.
    ///
    /// # Errors
    /// Returns a [`ScreenError`] if the prompt cannot be issued or the
    /// watcher cannot be started.
    pub async fn press_get_location(&mut self) -> Result<(), ScreenError> {
        if self.services.has_location_permission().await {
            return self.start_updates();
        }

        let outcome = self.services.request_location_permission().await?;
        if outcome.all_granted() {
            return self.start_updates();
        }

        let notice = if outcome.should_show_rationale {
            Notice::PermissionRationale
        } else {
            Notice::PermanentlyDenied
        };
        debug!("location permission declined: {notice:?}");
        let _ = self.notice_tx.try_send(notice);
        Ok(())
    }

    /// Record an arrived fix and notify state watchers.
    pub fn apply_fix(&self, fix: Fix) {
        self.state.set(ScreenState::HasLocation(fix));
    }

    /// Wait for the next fix from the running subscription and apply it.
    ///
    /// Returns the applied fix, or `None` when no subscription is running
    /// or the running one has ended.
    pub async fn pump(&mut self) -> Option<Fix> {
        let subscription = self.subscription.as_mut()?;
        match subscription.next().await {
            Some(fix) => {
                self.apply_fix(fix.clone());
                Some(fix)
            }
            None => {
                self.subscription = None;
                None
            }
        }
    }

    /// Drive the running subscription until it ends.
    pub async fn run(&mut self) {
        while self.pump().await.is_some() {}
    }

    /// The display text for the current state.
    ///
    /// The address segment is resolved at render time and omitted when the
    /// geocoder has nothing for the coordinate.
    #[must_use]
    pub fn render(&self) -> String {
        match self.state.get() {
            ScreenState::NoLocation => NO_LOCATION_TEXT.to_string(),
            ScreenState::HasLocation(fix) => match self.services.reverse_geocode(&fix) {
                Some(address) => {
                    format!("Address {} {} \n {}", fix.latitude, fix.longitude, address)
                }
                None => format!("Address {} {}", fix.latitude, fix.longitude),
            },
        }
    }

    /// Stop the fix subscription, if any, releasing the platform watcher.
    pub fn close(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.close();
        }
    }

    fn start_updates(&mut self) -> Result<(), ScreenError> {
        // One active watcher at a time; a new press replaces the old one
        if let Some(mut previous) = self.subscription.take() {
            previous.close();
        }
        let subscription = self.services.watch_fixes(&self.config)?;
        self.subscription = Some(subscription);
        Ok(())
    }
}

impl<S> fmt::Debug for LocationScreen<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationScreen")
            .field("state", &self.state.get())
            .field("watching", &self.subscription.is_some())
            .finish()
    }
}
