//! Logging infrastructure for structured console output.

mod logger;
mod subscriber;

pub use logger::Logger;
pub use subscriber::init_subscriber;

/// Target used for stage headers.
pub const STAGE_TARGET: &str = "ruff_sync::stage";

/// Target used for dry-run action messages.
pub const DRY_RUN_TARGET: &str = "ruff_sync::dry_run";

/// Events captured by [`capture`], as `(level, target, message)`.
#[cfg(test)]
pub(crate) type Captured = std::sync::Arc<std::sync::Mutex<Vec<(tracing::Level, String, String)>>>;

/// Install a per-thread subscriber that records every event.
///
/// Returns the shared event buffer and a [`tracing::dispatcher::DefaultGuard`]
/// that must be kept alive for the duration of the test.
#[cfg(test)]
pub(crate) fn capture() -> (Captured, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::layer::SubscriberExt as _;
    let events = Captured::default();
    let subscriber =
        tracing_subscriber::registry().with(subscriber::CaptureLayer::new(events.clone()));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (events, guard)
}
