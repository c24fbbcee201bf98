//! Configuration loading, merging and access.

mod document;
mod error;
pub mod key_path;
mod merge;
mod store;
mod view;

pub use document::{load_document, parse_document, Format};
pub use error::{ConfigError, ParseFailure};
pub use merge::deep_merge;
pub use store::ConfigStore;
pub use view::{Node, Scalar, View};
