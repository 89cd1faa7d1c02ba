use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError};

/// Initialize tracing subscriber with pretty formatting for development
/// and JSON formatting for production.
///
/// Uses RUST_LOG environment variable for filtering (defaults to "info" if not set).
///
/// The classification core is embedded in a host application, so a subscriber
/// may already be installed; in that case the error is returned and the
/// existing subscriber stays in place.
pub fn setup_logging(environment: Environment) -> Result<(), TryInitError> {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    match environment {
        Environment::Production => registry
            .with(tracing_subscriber::fmt::layer().json().with_level(true))
            .try_init(),
        Environment::Development => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_ansi(true))
            .try_init(),
    }
}

/// Enter an info-level span for the rest of the enclosing scope.
///
/// `span!("prepare")` or with fields, `span!("classify_image", rotation = 90)`.
#[macro_export]
macro_rules! span {
    ($name:literal $(, $($fields:tt)*)?) => {
        $crate::tracing::info_span!($name $(, $($fields)*)?).entered()
    };
}

/// Debug-level counterpart of [`span!`].
#[macro_export]
macro_rules! span_debug {
    ($name:literal $(, $($fields:tt)*)?) => {
        $crate::tracing::debug_span!($name $(, $($fields)*)?).entered()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_span_macros_carry_name_and_fields() {
        let subscriber = tracing_subscriber::registry().with(LevelFilter::TRACE);

        tracing::subscriber::with_default(subscriber, || {
            let outer = crate::span!("classify_image", rotation = 90);
            let meta = outer.metadata().expect("span should be enabled");
            assert_eq!(meta.name(), "classify_image");
            assert_eq!(*meta.level(), tracing::Level::INFO);
            assert!(meta.fields().field("rotation").is_some());

            let inner = crate::span_debug!("rotate");
            let meta = inner.metadata().expect("span should be enabled");
            assert_eq!(meta.name(), "rotate");
            assert_eq!(*meta.level(), tracing::Level::DEBUG);
        });
    }

    #[test]
    fn test_second_setup_reports_error_instead_of_panicking() {
        let first = setup_logging(Environment::Development);
        let second = setup_logging(Environment::Production);

        // Another test in this binary may have won the race for the global
        // subscriber, but at most one call can succeed.
        assert!(
            !(first.is_ok() && second.is_ok()),
            "Only one global subscriber can be installed"
        );
        assert!(second.is_err());
    }
}
