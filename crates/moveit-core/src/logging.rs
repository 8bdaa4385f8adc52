#![forbid(unsafe_code)]

//! Log and span macros for engine code.
//!
//! Engine modules log through `crate::debug!`, `crate::trace!`,
//! `crate::warn!` and open spans with `crate::trace_span!`. With the
//! `tracing` feature those names are `tracing`'s own macros. Without it they
//! expand to nothing (or to an inert [`NoopSpan`]), so arguments are never
//! evaluated and a build without the feature carries no logging code.
//!
//! `info!` and `error!` are provided for embedders writing against the same
//! names; the engine itself has no log point at those levels.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, trace_span, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Expands to nothing.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// Evaluates to a [`NoopSpan`](crate::logging::NoopSpan); fields are
    /// discarded unevaluated.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Stand-in for `tracing::Span` when logging is compiled out.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Mirrors `Span::enter`; the guard does nothing on drop.
    #[inline]
    #[must_use]
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::enter`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Intended for embedders that run the engine natively (replay tools,
/// headless regression runs). Returns `false` if a global subscriber was
/// already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
