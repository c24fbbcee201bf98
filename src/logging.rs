//! Diagnostic logging setup.
//!
//! The library only emits `tracing` events. Applications that want them on
//! stdout call [`init`] once; the `DEBUG` environment variable raises the
//! default level from `info` to `debug`, and `RUST_LOG` overrides both.

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::Error;

/// Environment variable that switches on debug output.
pub const DEBUG_ENV: &str = "DEBUG";

/// Installs a stdout subscriber as the global default.
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level().to_string().to_ascii_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Whether `DEBUG` is set to a truthy value.
pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV).is_ok_and(|value| is_truthy(&value))
}

/// The level [`init`] uses when `RUST_LOG` is not set.
pub fn default_level() -> Level {
    level_for(debug_enabled())
}

fn level_for(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        for value in ["1", "true", "yes", "TRUE", "anything"] {
            assert!(is_truthy(value), "{value:?} should be truthy");
        }
        for value in ["", "0", "false", "No", " off "] {
            assert!(!is_truthy(value), "{value:?} should be falsy");
        }
    }

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(true), Level::DEBUG);
        assert_eq!(level_for(false), Level::INFO);
    }
}
