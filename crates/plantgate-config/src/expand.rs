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
    // Fast path: no expansion needed
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(|cow| cow.into_owned())
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PLANTGATE_TEST_VAR", "http://engine:8000");
        }
        let result = expand_env("${PLANTGATE_TEST_VAR}", "engine.url").unwrap();
        assert_eq!(result, "http://engine:8000");
        unsafe {
            std::env::remove_var("PLANTGATE_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PLANTGATE_UNSET_VAR");
        }
        let result = expand_env("${PLANTGATE_UNSET_VAR:-http://fallback:8000}", "engine.url")
            .unwrap();
        assert_eq!(result, "http://fallback:8000");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PLANTGATE_TEST_HOST", "engine.example.com");
        }
        let result = expand_env("https://${PLANTGATE_TEST_HOST}/plantuml", "engine.url").unwrap();
        assert_eq!(result, "https://engine.example.com/plantuml");
        unsafe {
            std::env::remove_var("PLANTGATE_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PLANTGATE_MISSING_VAR");
        }
        let err = expand_env("${PLANTGATE_MISSING_VAR}", "engine.url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("PLANTGATE_MISSING_VAR"));
        assert!(err.to_string().contains("engine.url"));
    }

    #[test]
    fn test_expand_literal_unchanged() {
        let result = expand_env("http://127.0.0.1:8000/plantuml", "engine.url").unwrap();
        assert_eq!(result, "http://127.0.0.1:8000/plantuml");
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("http://host/$path", "engine.url").unwrap();
        assert_eq!(result, "http://host/$path");
    }
}
