//! Sign Recorder - sign-language gesture recognition from hand landmarks.
//!
//! This is the library crate for the recognizer core. Drivers feed it one
//! extracted landmark frame at a time plus begin/end/mode signals, and get
//! back a verdict for each recognized gesture. Reference gestures are
//! recorded through the same interface and matched with dynamic time warping.

pub mod announce;
pub mod config;
pub mod landmarks;
pub mod library;
pub mod matcher;
pub mod recorder;
pub mod utils;

pub use announce::{Announcement, Announcer};
pub use config::RecognizerConfig;
pub use landmarks::{HandFrame, HolisticDetection, LandmarkFrame, Sequence};
pub use library::{FsSignStore, ReferenceLibrary, SignStore};
pub use matcher::{DtwMatcher, Recognition, Verdict};
pub use recorder::{CaptureState, FlushOutcome, FrameOutcome, Mode, RecorderEvent, SignRecorder};
pub use utils::{AppError, AppResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_directives`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_logging(default_directives: &str) {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("Starting sign recorder v{}", env!("CARGO_PKG_VERSION"));
    }
}
