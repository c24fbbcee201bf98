//! Automatic configuration loading for consuming types.
//!
//! A type that wants configuration on hand implements [`Configurable`] and
//! calls [`Configurable::configure`] once during start-up. The default
//! configuration file is looked up from the type's own source location; a
//! missing file is not an error, and a file that holds no usable document is
//! reported as a warning and ignored.

use std::path::Path;
use std::sync::MutexGuard;

use tracing::{debug, warn};

use crate::config::{ConfigError, ConfigStore};

/// Loads the default configuration file for the project containing
/// `caller_location` into `store`.
///
/// Returns `Ok(true)` when a file was merged and `Ok(false)` when there was
/// nothing to load or the file was ignored as invalid. In the latter case the
/// store is left as it was. Every other failure propagates.
pub fn include_config(
    store: &mut ConfigStore,
    caller_location: impl AsRef<Path>,
) -> Result<bool, ConfigError> {
    let caller_location = caller_location.as_ref();
    debug!("calling_file: {}", caller_location.display());

    let config_path = store.layout().resolve_config_path(caller_location);
    if !config_path.exists() {
        debug!(
            "Expected config file {} not found. Not loading configuration",
            config_path.display()
        );
        return Ok(false);
    }

    match store.add(Some(config_path.as_path())) {
        Ok(_) => Ok(true),
        Err(e) if e.is_invalid_config() => {
            warn!(
                "Read configuration from {}, but configuration not valid. Ignoring, check your config: {e}",
                config_path.display()
            );
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Gives a type access to the project's configuration.
///
/// ## Example
///
/// ```no_run
/// use anchor_config::{ConfigStore, Configurable};
///
/// struct Worker;
///
/// impl Configurable for Worker {
///     fn source_location() -> &'static str {
///         concat!(env!("CARGO_MANIFEST_DIR"), "/src")
///     }
/// }
///
/// Worker::configure(&mut ConfigStore::instance())?;
/// let retries = Worker::config().get("worker.retries")?.as_i64();
/// # Ok::<(), anchor_config::ConfigError>(())
/// ```
pub trait Configurable {
    /// A file or directory inside the implementing type's project.
    fn source_location() -> &'static str;

    /// Runs [`include_config`] for this type's source location.
    fn configure(store: &mut ConfigStore) -> Result<bool, ConfigError> {
        include_config(store, Self::source_location())
    }

    /// The process-wide configuration store.
    fn config() -> MutexGuard<'static, ConfigStore> {
        ConfigStore::instance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn project(config: Option<&str>) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("core");
        fs::create_dir_all(root.join("lib/core")).unwrap();
        fs::write(root.join("Cargo.toml"), "").unwrap();
        if let Some(contents) = config {
            fs::create_dir_all(root.join("config")).unwrap();
            fs::write(root.join("config/config.yml"), contents).unwrap();
        }
        (tmp, root)
    }

    #[test]
    fn test_loads_config_for_caller() {
        let (_tmp, root) = project(Some("core: {name: one}\n"));
        let mut store = ConfigStore::new();

        let loaded = include_config(&mut store, root.join("lib/core/core_one.rs")).unwrap();

        assert!(loaded);
        assert_eq!(store.get("core.name").unwrap().as_str(), Some("one"));
    }

    #[test]
    fn test_missing_config_is_not_an_error() {
        let (_tmp, root) = project(None);
        let mut store = ConfigStore::new();

        let loaded = include_config(&mut store, root.join("lib/core/core_one.rs")).unwrap();

        assert!(!loaded);
        assert!(store.is_empty());
    }

    #[test]
    fn test_unresolvable_caller_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut store = ConfigStore::new();

        let loaded = include_config(&mut store, tmp.path().join("loose/file.rs")).unwrap();

        assert!(!loaded);
    }

    #[test]
    #[traced_test]
    fn test_invalid_config_is_downgraded_to_warning() {
        let (_tmp, root) = project(Some("\n"));
        let mut store = ConfigStore::new();
        store.merge(serde_yaml::from_str("kept: true").unwrap());
        let before = store.data().cloned();

        let loaded = include_config(&mut store, root.join("lib/core/core_one.rs")).unwrap();

        assert!(!loaded);
        assert_eq!(store.data().cloned(), before);
        assert!(logs_contain("configuration not valid"));
    }

    #[test]
    fn test_parse_errors_propagate() {
        let (_tmp, root) = project(Some("key: [unclosed\n"));
        let mut store = ConfigStore::new();

        let result = include_config(&mut store, root.join("lib/core/core_one.rs"));

        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_configurable_trait() {
        struct ThisCrate;

        impl Configurable for ThisCrate {
            fn source_location() -> &'static str {
                concat!(env!("CARGO_MANIFEST_DIR"), "/src/context/mod.rs")
            }
        }

        // This crate ships no config/config.yml, so nothing is loaded.
        let mut store = ConfigStore::new();
        assert!(!ThisCrate::configure(&mut store).unwrap());
        assert!(store.is_empty());
    }
}
