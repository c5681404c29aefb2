use tracing_subscriber::filter::Directive;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::error::{PlannerError, Result};

const DEFAULT_DIRECTIVE: &str = "forthebirds=info";

/// Output format for [`init_tracing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// Structured JSON for Cloud Logging
    Stackdriver,
}

/// Install a global subscriber for applications embedding the planner
///
/// `RUST_LOG` is honored; the planner's own events default to `info`.
/// Fails with a config error if a global subscriber is already set.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive(default_directive()?);
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Stackdriver => registry.with(tracing_stackdriver::layer()).try_init(),
    };

    installed.map_err(|e| PlannerError::Config(format!("tracing subscriber: {}", e)))
}

fn default_directive() -> Result<Directive> {
    Ok(DEFAULT_DIRECTIVE.parse()?)
}
