//! Diagnostic logging setup
//!
//! Events go to stderr so stdout stays clean for piping. `TSP_LOG` takes an
//! `EnvFilter` directive string and wins over the verbosity flags.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit filter
pub const LOG_ENV: &str = "TSP_LOG";

/// Default filter directive for the given verbosity flags
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "tsp=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_wins_over_quiet() {
        assert_eq!(default_directive(true, true), "tsp=debug");
        assert_eq!(default_directive(false, true), "error");
        assert_eq!(default_directive(false, false), "warn");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false, true);
        init(true, false);
    }
}
