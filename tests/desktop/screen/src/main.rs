//! Desktop test binary for geofix-screen.
//!
//! Run with: cargo run -p geofix-screen-test

use futures::{FutureExt, StreamExt};
use geofix_geocode::{GeocodeError, Nominatim};
use geofix_notice::Toast;
use geofix_screen::{DeviceServices, LocationScreen};

/// Nominatim against `GEOFIX_NOMINATIM_URL`, or the public instance.
fn nominatim_from_env() -> Result<Nominatim, GeocodeError> {
    match std::env::var("GEOFIX_NOMINATIM_URL") {
        Ok(endpoint) => Nominatim::new(endpoint),
        Err(_) => Nominatim::public(),
    }
}

// The geocoder blocks on HTTP, so async steps run through an explicit
// runtime and rendering happens between them on the plain main thread.
fn main() {
    env_logger::init();
    println!("=== Geofix Screen Test (desktop) ===\n");

    let geocoder = match nominatim_from_env() {
        Ok(geocoder) => geocoder,
        Err(e) => {
            println!("✗ Failed to build the geocoder: {e}");
            return;
        }
    };
    let mut screen = LocationScreen::new(DeviceServices::new(geocoder));
    let mut notices = screen.notices();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            println!("✗ Failed to start the runtime: {e}");
            return;
        }
    };

    println!("{}\n", screen.render());

    println!("Pressing \"Get Location\"...");
    if let Err(e) = runtime.block_on(screen.press_get_location()) {
        println!("✗ Press failed: {e}");
        return;
    }

    while let Some(notice) = notices.next().now_or_never().flatten() {
        println!("Notice: {}", notice.message());
        Toast::new(notice.message()).show();
    }

    if !screen.is_watching() {
        println!("Permission declined, nothing to watch.");
        return;
    }

    for _ in 0..3 {
        match runtime.block_on(screen.pump()) {
            Some(fix) => {
                println!("✓ Fix: {:.6}° {:.6}°", fix.latitude, fix.longitude);
                println!("{}\n", screen.render());
            }
            None => {
                println!("✗ Fix stream ended");
                break;
            }
        }
    }

    screen.close();
}
