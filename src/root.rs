//! Project root discovery.
//!
//! A project root is the directory holding the dependency manifest marker
//! (`Cargo.toml` by default) next to one of the conventional source-tree
//! directories (`src`, `tests`, ...). Starting from any file inside the
//! project, the walk goes upward one path component at a time and the first
//! source-tree directory whose parent holds the marker wins.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

/// Base name for both the configuration directory and the file stem.
pub const DEFAULT_BASE_NAME: &str = "config";

/// File that marks a project root.
pub const DEFAULT_MARKER: &str = "Cargo.toml";

/// Directory names that conventionally sit directly under a project root.
pub const DEFAULT_SOURCE_DIRS: &[&str] = &["src", "lib", "bin", "tests", "benches", "examples", "spec"];

/// Layout conventions used to find a project root and its configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    base_name: String,
    marker: String,
    source_dirs: Vec<String>,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            source_dirs: DEFAULT_SOURCE_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ProjectLayout {
    /// Sets the base name; the config directory becomes `<name>/` and the
    /// file `<name>.yml`.
    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    /// Sets the marker file that must sit next to a source-tree directory.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Replaces the set of recognized source-tree directory names.
    pub fn with_source_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Location of the configuration file relative to the project root.
    pub fn config_location(&self) -> PathBuf {
        Path::new(&self.base_name).join(format!("{}.yml", self.base_name))
    }

    /// Finds the project root for a file or directory inside the project.
    ///
    /// Returns an empty path when no root can be found.
    pub fn find_execution_root(&self, path: &Path) -> PathBuf {
        let dir = if path.extension().is_some() {
            path.parent().unwrap_or(Path::new(""))
        } else {
            path
        };

        let components: Vec<Component<'_>> = dir.components().collect();
        let mut project_root = PathBuf::new();

        // The walk runs to the top even after a match; only the first match counts.
        for index in (0..components.len()).rev() {
            if !project_root.as_os_str().is_empty() || !self.is_source_dir(&components[index]) {
                continue;
            }

            let parent: PathBuf = components[..index].iter().collect();
            let parent = if parent.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                parent
            };

            let candidate = parent.join(&self.marker);
            if candidate.exists() {
                debug!("Found project marker at {}", candidate.display());
                project_root = parent;
            }
        }

        project_root
    }

    /// Full path of the configuration file for a file inside the project,
    /// or an empty path when the project root cannot be found.
    pub fn resolve_config_path(&self, path: &Path) -> PathBuf {
        let root = self.find_execution_root(path);
        if root.as_os_str().is_empty() {
            root
        } else {
            root.join(self.config_location())
        }
    }

    fn is_source_dir(&self, component: &Component<'_>) -> bool {
        match component {
            Component::Normal(name) => name
                .to_str()
                .is_some_and(|name| self.source_dirs.iter().any(|dir| dir == name)),
            _ => false,
        }
    }
}

/// [`ProjectLayout::find_execution_root`] with the default layout.
pub fn find_execution_root(path: impl AsRef<Path>) -> PathBuf {
    ProjectLayout::default().find_execution_root(path.as_ref())
}

/// [`ProjectLayout::resolve_config_path`] with the default layout.
pub fn resolve_config_path(path: impl AsRef<Path>) -> PathBuf {
    ProjectLayout::default().resolve_config_path(path.as_ref())
}
