pub mod config;
pub mod logging;

pub use config::{Environment, env_or};
pub use logging::setup_logging;
pub use tracing_subscriber::util::TryInitError;

#[doc(hidden)]
pub use tracing;
