//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let expanded = shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        Ok(std::env::var(var).ok())
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.var_name),
    })?;

    // Unset variables without a default are left verbatim by the expander.
    if let Some(var_name) = first_unexpanded(&expanded) {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{var_name}}} not set"),
        });
    }

    Ok(expanded)
}

/// Return the name of the first `${NAME}` reference left in `value`.
fn first_unexpanded(value: &str) -> Option<&str> {
    let start = value.find("${")? + 2;
    let len = value[start..].find('}')?;
    let name = &value[start..start + len];
    let is_name = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_name.then_some(name)
}

/// Error returned when environment variable lookup fails.
#[derive(Debug)]
struct LookupError;
