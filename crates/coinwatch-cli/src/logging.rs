use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Install the stderr subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_logging(default_filter: &str) -> Result<(), CliError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|error| CliError::Logging(format!("invalid filter '{default_filter}': {error}")))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()
        .map_err(|error| CliError::Logging(error.to_string()))
}
