pub mod config;
pub mod context;
mod error;
pub mod logging;
pub mod root;

pub use config::{ConfigError, ConfigStore, Node, View};
pub use context::{include_config, Configurable};
pub use error::Error;
pub use root::{find_execution_root, resolve_config_path, ProjectLayout};
