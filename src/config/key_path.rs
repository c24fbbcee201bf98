//! Strict dotted key path resolution.
//!
//! Resolves `section.field` style paths against a [`View`]. Unlike member
//! access on the view, every segment must hold a defined value.

use super::view::{Node, View};
use super::ConfigError;

/// Resolves `key_path` against `root`, failing on the first segment that has
/// no defined value.
///
/// A segment counts as undefined when it is missing, `null` or `false`. The
/// error message names the dotted prefix consumed up to and including the
/// failing segment.
pub fn resolve<'a>(root: Option<&'a View>, key_path: Option<&str>) -> Result<&'a Node, ConfigError> {
    let key_path = match key_path {
        Some(path) if !path.is_empty() => path,
        _ => return Err(ConfigError::InvalidArgument("config_key required".to_string())),
    };

    let segments: Vec<&str> = key_path.split('.').collect();
    let missing = |consumed: usize| {
        ConfigError::MissingKey(format!(
            "config_key {} has no defined value",
            segments[..consumed].join(".")
        ))
    };

    let root = root.ok_or_else(|| missing(1))?;
    let mut current = root.get(segments[0]);
    if !current.is_truthy() {
        return Err(missing(1));
    }

    for (index, segment) in segments.iter().enumerate().skip(1) {
        current = current.get(segment);
        if !current.is_truthy() {
            return Err(missing(index + 1));
        }
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(yaml: &str) -> View {
        View::from_mapping(&serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_nested_path() {
        let v = view("a: {b: {c: 42}}");
        let node = resolve(Some(&v), Some("a.b.c")).unwrap();
        assert_eq!(node.as_i64(), Some(42));
    }

    #[test]
    fn test_partial_path_returns_view() {
        let v = view("a: {b: {c: 42}}");
        let node = resolve(Some(&v), Some("a.b")).unwrap();
        assert_eq!(node.as_view().unwrap().keys(), vec!["c"]);
    }

    #[test]
    fn test_missing_segment_names_prefix() {
        let v = view("a: {b: {c: 42}}");
        let err = resolve(Some(&v), Some("a.x.y")).unwrap_err();

        assert!(matches!(err, ConfigError::MissingKey(_)));
        assert_eq!(err.to_string(), "config_key a.x has no defined value");
    }

    #[test]
    fn test_missing_first_segment() {
        let v = view("a: 1");
        let err = resolve(Some(&v), Some("nope")).unwrap_err();
        assert_eq!(err.to_string(), "config_key nope has no defined value");
    }

    #[test]
    fn test_descending_into_scalar_fails() {
        let v = view("a: {b: text}");
        let err = resolve(Some(&v), Some("a.b.c")).unwrap_err();
        assert_eq!(err.to_string(), "config_key a.b.c has no defined value");
    }

    #[test]
    fn test_false_and_null_are_undefined() {
        let v = view("flag: false\nunset: ~\nzero: 0");

        assert!(matches!(resolve(Some(&v), Some("flag")), Err(ConfigError::MissingKey(_))));
        assert!(matches!(resolve(Some(&v), Some("unset")), Err(ConfigError::MissingKey(_))));
        assert_eq!(resolve(Some(&v), Some("zero")).unwrap().as_i64(), Some(0));
    }

    #[test]
    fn test_empty_or_absent_path() {
        let v = view("a: 1");

        assert!(matches!(resolve(Some(&v), Some("")), Err(ConfigError::InvalidArgument(_))));
        assert!(matches!(resolve(Some(&v), None), Err(ConfigError::InvalidArgument(_))));
    }

    #[test]
    fn test_uninitialized_root() {
        let err = resolve(None, Some("a.b")).unwrap_err();
        assert_eq!(err.to_string(), "config_key a has no defined value");
    }

    #[test]
    fn test_sequence_value_returned() {
        let v = view("hosts: [a, b]");
        let node = resolve(Some(&v), Some("hosts")).unwrap();
        assert_eq!(node.as_sequence().map(<[Node]>::len), Some(2));
    }
}
