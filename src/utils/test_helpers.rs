use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Installs the tracing subscriber for test runs.
///
/// Tests share one process and run in parallel, so the global subscriber
/// must be set at most once; every test entry point calls this first.
pub fn setup_test_logging() {
    LOGGING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// `true` when the process runs with an effective UID of 0.
///
/// Permission-bit tests observe nothing under root (Docker, CI), so they
/// bail out early via this check.
#[cfg(any(test, doctest))]
#[inline]
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no side effects and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
