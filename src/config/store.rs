use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::document::load_document;
use super::key_path;
use super::merge::deep_merge;
use super::view::{Node, View};
use super::ConfigError;
use crate::root::ProjectLayout;

static INSTANCE: OnceLock<Mutex<ConfigStore>> = OnceLock::new();

/// Holds the merged configuration document and the view built from it.
///
/// Documents are deep-merged in the order they are added: nested mappings
/// merge key by key, every other value (arrays included) is replaced. The
/// view is rebuilt after every merge, so reads always see the latest data.
///
/// Reads come in two flavours:
///
/// - [`get`](Self::get) resolves a dotted key path and fails on any segment
///   without a defined value;
/// - [`view`](Self::view) hands out a [`View`] whose member access returns
///   [`Node::Absent`] for missing keys.
///
/// ## Example
///
/// ```no_run
/// use anchor_config::ConfigStore;
///
/// let mut store = ConfigStore::new();
/// store.add_from(file!())?;
///
/// let host = store.get("database.host")?.as_str();
/// let port = store.view().map(|v| v.get("database").get("port").as_i64());
/// # Ok::<(), anchor_config::ConfigError>(())
/// ```
///
/// The store has no internal locking. The process-wide instance from
/// [`instance`](Self::instance) sits behind a mutex so it can live in a
/// static; hold the guard across any sequence of calls that must be consistent.
#[derive(Debug, Default)]
pub struct ConfigStore {
    data_raw: Option<Mapping>,
    view: Option<View>,
    layout: ProjectLayout,
}

impl ConfigStore {
    /// Creates an empty store with the default project layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that resolves paths with `layout`.
    pub fn with_layout(layout: ProjectLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Returns the process-wide store.
    pub fn instance() -> MutexGuard<'static, ConfigStore> {
        INSTANCE
            .get_or_init(|| Mutex::new(ConfigStore::new()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Loads `config/config.yml` relative to the current working directory.
    pub fn load(&mut self) -> Result<&mut Self, ConfigError> {
        let cwd = current_dir()?;
        self.load_from(cwd)
    }

    /// Loads `config/config.yml` relative to `dir`.
    pub fn load_from(&mut self, dir: impl AsRef<Path>) -> Result<&mut Self, ConfigError> {
        let path = dir.as_ref().join(self.layout.config_location());
        self.add(Some(path.as_path()))
    }

    /// Reads the file at `path` and merges it into the store.
    ///
    /// Without a path, the default configuration file is resolved from the
    /// source file of the calling code (see [`add_from`](Self::add_from)).
    /// That location is usually relative to the caller's manifest directory,
    /// so the lookup succeeds when the process runs from the project root.
    ///
    /// On error the stored document is left exactly as it was.
    #[track_caller]
    pub fn add(&mut self, path: Option<&Path>) -> Result<&mut Self, ConfigError> {
        match path {
            Some(path) => self.add_file(path),
            None => {
                let caller = Location::caller().file();
                debug!("Resolving configuration from caller {caller}");
                self.add_from(caller)
            }
        }
    }

    /// Resolves the default configuration file from `caller_location`, a file
    /// or directory inside the project, and merges it into the store.
    pub fn add_from(&mut self, caller_location: impl AsRef<Path>) -> Result<&mut Self, ConfigError> {
        let path = self.layout.resolve_config_path(caller_location.as_ref());
        self.add_file(&path)
    }

    fn add_file(&mut self, path: &Path) -> Result<&mut Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        debug!("Reading configuration from {}", path.display());
        let document = load_document(path)?;
        Ok(self.merge(document))
    }

    /// Deep-merges `document` into the stored configuration and rebuilds the view.
    pub fn merge(&mut self, document: Mapping) -> &mut Self {
        let merged = match &self.data_raw {
            Some(current) => deep_merge(current, &document),
            None => document,
        };
        self.view = Some(View::from_mapping(&merged));
        self.data_raw = Some(merged);
        self
    }

    /// Drops all configuration data.
    pub fn reset(&mut self) -> &mut Self {
        self.view = None;
        self.data_raw = None;
        self
    }

    /// True when nothing has been loaded since creation or the last reset.
    pub fn is_empty(&self) -> bool {
        self.view.is_none()
    }

    /// Resolves a dotted key path such as `database.host`.
    ///
    /// Fails with [`ConfigError::InvalidArgument`] for an empty or absent path
    /// and with [`ConfigError::MissingKey`] when any segment is missing,
    /// `null` or `false`.
    pub fn get<'k>(&self, key_path: impl Into<Option<&'k str>>) -> Result<&Node, ConfigError> {
        key_path::resolve(self.view.as_ref(), key_path.into())
    }

    /// Lenient view over the stored configuration, if any has been loaded.
    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    /// The merged document as stored.
    pub fn data(&self) -> Option<&Mapping> {
        self.data_raw.as_ref()
    }

    /// Deserializes the value at `key_path` into `T`.
    pub fn extract<'k, T: DeserializeOwned>(
        &self,
        key_path: impl Into<Option<&'k str>>,
    ) -> Result<T, ConfigError> {
        let node = self.get(key_path)?;
        Ok(serde_yaml::from_value(node.to_value())?)
    }

    /// Deserializes the whole configuration into `T`.
    ///
    /// Fails with [`ConfigError::MissingKey`] when nothing has been loaded.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let data = self
            .data_raw
            .clone()
            .ok_or_else(|| ConfigError::MissingKey("configuration has no defined value".to_string()))?;
        Ok(serde_yaml::from_value(Value::Mapping(data))?)
    }
}

fn current_dir() -> Result<PathBuf, ConfigError> {
    std::env::current_dir().map_err(|e| ConfigError::ReadError {
        path: PathBuf::from("."),
        source: e,
    })
}
