use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable overriding the log filter (EnvFilter syntax)
pub const LOG_ENV: &str = "UPSTREAM_TRACKER_LOG";

/// Default filter level for the given verbosity flags
pub fn default_level(quiet: bool, verbose: bool) -> &'static str {
  if quiet {
    "error"
  } else if verbose {
    "debug"
  } else {
    "info"
  }
}

/// Initialize the stderr subscriber.
///
/// stdout is reserved for the command's report, so every diagnostic goes to
/// stderr. `UPSTREAM_TRACKER_LOG` wins over the verbosity flags.
pub fn init(quiet: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  let fmt_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(false)
    .with_level(true)
    .without_time()
    .compact();

  let filter_layer = EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_new(default_level(quiet, verbose)))?;

  tracing_subscriber::registry()
    .with(filter_layer)
    .with(fmt_layer)
    .try_init()?;

  Ok(())
}
