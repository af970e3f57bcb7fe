//! Logging setup based on [::tracing].

use nameth::NamedEnumValues as _;
use nameth::nameth;
use tracing::debug;
use tracing::error;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "debug,hyper_util=info,reqwest=info,tower_http=info";

/// Installs a compact `fmt` subscriber and logs panics.
///
/// The filter can be overridden with the `RUST_LOG` environment variable.
pub fn enable_tracing() -> Result<(), EnableTracingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions))
        .with_target(false)
        .with_env_filter(env_filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    debug!("Tracing enabled");

    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(ToString::to_string)
            .unwrap_or_default();
        match panic_info.payload_as_str() {
            Some(payload) => error!(location, "Panic: {payload}"),
            None => error!(location, "Panic"),
        }
    }));
    Ok(())
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum EnableTracingError {
    #[error("[{n}] {0}", n = self.name())]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}

#[cfg(debug_assertions)]
pub mod test_utils {
    use std::sync::Once;

    /// Enables tracing once per test binary, ignoring a subscriber installed elsewhere.
    pub fn enable_tracing_for_tests() {
        static ONCE: Once = Once::new();
        ONCE.call_once(|| {
            let _ = super::enable_tracing();
        });
    }
}
