pub mod paths;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "saisie_core=info";

/// Initializes the global tracing subscriber, writing to stderr so script
/// output on stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

        let filter = match DEFAULT_DIRECTIVE.parse::<Directive>() {
            Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
            Err(_) => EnvFilter::from_default_env(),
        };

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

/// Version string with build metadata captured by the build script.
pub fn build_info() -> String {
    format!(
        "{} {} ({}, {} build, {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("SAISIE_BUILD_HASH"),
        env!("SAISIE_BUILD_PROFILE"),
        env!("SAISIE_BUILD_TIMESTAMP"),
    )
}
