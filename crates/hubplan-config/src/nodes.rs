//! Helper functions for extracting values from KDL nodes.

use kdl::KdlNode;

use crate::{ConfigError, ConfigResult};

pub(crate) fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

/// The first positional string argument, required to be present and non-blank.
pub(crate) fn required_string_arg(node: &KdlNode) -> ConfigResult<String> {
    let field = node.name().value();
    let value = get_first_string_arg(node)
        .ok_or_else(|| ConfigError::MissingField(format!("{} value", field)))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

/// Store a single-valued setting, rejecting a second occurrence.
pub(crate) fn set_once<T>(slot: &mut Option<T>, node: &KdlNode, value: T) -> ConfigResult<()> {
    if slot.is_some() {
        return Err(ConfigError::Duplicate(format!(
            "`{}` node",
            node.name().value()
        )));
    }
    *slot = Some(value);
    Ok(())
}

/// Normalize a repository-relative location: no leading `./`, no trailing `/`.
pub(crate) fn normalize_location(field: &str, raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    let trimmed = trimmed.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("'{}' is not a repository path", raw),
        });
    }
    Ok(trimmed.to_string())
}
