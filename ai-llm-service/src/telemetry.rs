//! Process-wide tracing setup shared by the backend binary.
//!
//! One `fmt` layer with RFC3339 UTC timestamps, filtered by `RUST_LOG`
//! (or the given fallback). Chat-completion events from this crate can be
//! raised independently via [`LLM_LOG_ENV`].

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Crate target prefix used for the per-crate level directive.
pub const TARGET_PREFIX: &str = "ai_llm_service";

/// Env variable holding the level for this crate only (e.g. `debug`).
pub const LLM_LOG_ENV: &str = "LLM_LOG";

/// RFC3339 UTC timer, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Level directive for this library only, e.g. `ai_llm_service=debug`.
pub fn level_directive(level: Level) -> Directive {
    let s = format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase());
    // Always a valid directive: crate name plus a known level.
    Directive::from_str(&s).unwrap_or_else(|_| Level::INFO.into())
}

/// Builds the global filter: `RUST_LOG` or `default`, plus the optional
/// [`LLM_LOG_ENV`] override for this crate.
pub fn env_filter(default: &str) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    match std::env::var(LLM_LOG_ENV)
        .ok()
        .and_then(|v| Level::from_str(v.trim()).ok())
    {
        Some(level) => base.add_directive(level_directive(level)),
        None => base,
    }
}

/// Installs the global subscriber.
///
/// - compact single-line format with `file:line`
/// - span close events (durations of `#[instrument]`ed handlers)
/// - ANSI colors only when stdout is a terminal
///
/// # Errors
/// Fails if a global subscriber was already installed.
pub fn init(default_filter: &str) -> Result<(), TryInitError> {
    let layer = fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(io::stdout().is_terminal())
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(layer)
        .try_init()
}
