//! Tracing subscriber setup: console formatter and initialisation.
use super::{DRY_RUN_TARGET, STAGE_TARGET};

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Debug, Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Render one console line (without the trailing newline).
fn console_line(level: tracing::Level, target: &str, msg: &str) -> String {
    match level {
        tracing::Level::ERROR => format!("\x1b[31mERROR\x1b[0m {msg}"),
        tracing::Level::WARN => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        tracing::Level::INFO if target == STAGE_TARGET => {
            format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
        }
        tracing::Level::INFO if target == DRY_RUN_TARGET => {
            format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}")
        }
        tracing::Level::INFO => format!("  {msg}"),
        _ => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits ruff-sync console
/// output.
#[derive(Debug)]
struct RuffSyncFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for RuffSyncFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(
            writer,
            "{}",
            console_line(*metadata.level(), metadata.target(), &extractor.message)
        )
    }
}

/// Records events into a shared buffer.
#[cfg(test)]
#[derive(Debug)]
pub(super) struct CaptureLayer {
    events: super::Captured,
}

#[cfg(test)]
impl CaptureLayer {
    pub(super) const fn new(events: super::Captured) -> Self {
        Self { events }
    }
}

#[cfg(test)]
impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        if let Ok(mut events) = self.events.lock() {
            events.push((
                *metadata.level(),
                metadata.target().to_string(),
                extractor.message,
            ));
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout. `RUST_LOG`
/// overrides the level chosen by `verbose`.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(RuffSyncFormatter)
        .with_writer(make_writer)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn stage_line_has_arrow() {
        let line = console_line(tracing::Level::INFO, STAGE_TARGET, "Fetching upstream");
        assert!(line.contains("==>"));
        assert!(line.contains("Fetching upstream"));
    }

    #[test]
    fn dry_run_line_is_tagged() {
        let line = console_line(tracing::Level::INFO, DRY_RUN_TARGET, "would write x");
        assert!(line.contains("[DRY RUN]"));
    }

    #[test]
    fn plain_info_is_indented() {
        assert_eq!(
            console_line(tracing::Level::INFO, "ruff_sync", "hello"),
            "  hello"
        );
    }

    #[test]
    fn warn_and_error_are_labelled() {
        assert!(console_line(tracing::Level::WARN, "ruff_sync", "w").contains("WARN"));
        assert!(console_line(tracing::Level::ERROR, "ruff_sync", "e").contains("ERROR"));
    }

    #[test]
    fn debug_is_dimmed() {
        assert_eq!(
            console_line(tracing::Level::DEBUG, "ruff_sync", "d"),
            "  \x1b[2md\x1b[0m"
        );
    }
}
