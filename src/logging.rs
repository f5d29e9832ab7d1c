//! Subscriber setup for the binary. The library only emits events.

use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count when `RUST_LOG` is unset.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "remodel_shape=warn",
        1 => "remodel_shape=info",
        _ => "remodel_shape=debug",
    }
}

/// Installs a stderr subscriber so stdout stays machine-readable.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_directive(0), "remodel_shape=warn");
        assert_eq!(default_directive(1), "remodel_shape=info");
        assert_eq!(default_directive(7), "remodel_shape=debug");
    }

    #[test]
    fn init_twice_is_harmless() {
        init(0);
        init(2);
    }
}
