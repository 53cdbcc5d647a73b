//! Configuration for the dispatcher.
//!
//! The surrounding host normally configures the [`Invoker`](crate::invoker::Invoker)
//! programmatically, but an optional YAML file lets an installation pin the
//! engine, the host-directive marker, or the executable search path without
//! code changes.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default path for the dispatcher configuration file
const DEFAULT_CONFIG_PATH: &str = "~/.xslt-dispatch/config.yml";

/// Default marker introducing host-directive lines in document text
pub const DEFAULT_DIRECTIVE_MARKER: &str = "@";

/// Host-supplied overrides for one dispatcher instance.
///
/// Every field is optional; an absent field means the built-in default
/// (probe the search path for an engine, `@` as the directive marker, the
/// `PATH` environment variable as the search path).
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokerConfig {
    /// Engine command name, `saxon` or `xsltproc`. Any other name is
    /// rejected when the config is applied.
    pub engine: Option<String>,
    /// Marker that introduces host-directive lines in document text.
    pub directive_marker: Option<String>,
    /// Colon-separated executable search path.
    pub search_path: Option<String>,
}

/// Resolves the configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `config_path_arg` - Optional custom configuration file path
///
/// # Returns
///
/// The resolved absolute path to the configuration file
///
/// # Examples
///
/// ```
/// use xslt_dispatch::config::get_config_path;
///
/// // Use default path
/// let default_path = get_config_path(&None);
///
/// // Use custom path
/// let custom_path = get_config_path(&Some("/path/to/config.yml".to_string()));
/// ```
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}

/// Expands shell variables in each component of a search path.
///
/// The search path is a colon-separated directory list; `~` is expanded in
/// every component. Returns None if no search path is provided.
pub fn expand_search_path(search_path: &Option<String>) -> Option<String> {
    search_path.as_ref().map(|search_path| {
        search_path
            .split(':')
            .map(|dir| shellexpand::tilde(dir).to_string())
            .collect::<Vec<String>>()
            .join(":")
    })
}

/// Reads the dispatcher configuration from disk.
///
/// Returns None if the file doesn't exist, which callers treat as
/// "all defaults".
///
/// # Errors
///
/// Returns an error if:
/// - The file exists but cannot be read
/// - The file contains invalid YAML
/// - The YAML doesn't match the expected structure
pub fn load_config(config_path: &str) -> Result<Option<InvokerConfig>> {
    if !Path::exists(Path::new(config_path)) {
        return Ok(None);
    }

    let reader = match File::open(config_path) {
        Ok(reader) => reader,
        Err(e) => {
            return Err(Error::io_error(
                "config".to_string(),
                config_path.to_string(),
                e,
            ))
        }
    };

    let parsed: serde_yaml::Result<InvokerConfig> = serde_yaml::from_reader(reader);

    match parsed {
        Ok(config) => Ok(Some(config)),
        Err(e) => Err(Error::yaml_error(
            "reading".to_string(),
            "config".to_string(),
            config_path.to_string(),
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_get_config_path_with_custom_path() {
        let custom_path = Some("/custom/path/config.yml".to_string());
        let result = get_config_path(&custom_path);
        assert_eq!(result, "/custom/path/config.yml");
    }

    #[test]
    fn test_get_config_path_with_none() {
        let result = get_config_path(&None);
        // Should expand the tilde in the default path
        assert!(result.contains("config.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_get_config_path_with_tilde() {
        let tilde_path = Some("~/my-config.yml".to_string());
        let result = get_config_path(&tilde_path);
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("my-config.yml"));
    }

    #[test]
    fn test_expand_search_path_with_tilde_components() {
        let search_path = Some("~/bin:/usr/local/bin".to_string());
        let result = expand_search_path(&search_path).unwrap();

        let components: Vec<&str> = result.split(':').collect();
        assert_eq!(components.len(), 2);
        assert!(!components[0].starts_with('~'));
        assert!(components[0].ends_with("bin"));
        assert_eq!(components[1], "/usr/local/bin");
    }

    #[test]
    fn test_expand_search_path_with_none() {
        assert!(expand_search_path(&None).is_none());
    }

    #[test]
    fn test_load_config_file_not_exists() {
        let result = load_config("/this/path/does/not/exist.yml").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_config_valid_yaml() {
        let yaml_content = r#"
engine: "xsltproc"
directive_marker: "@"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{yaml_content}").unwrap();
        let temp_path = temp_file.path().to_str().unwrap();

        let config = load_config(temp_path).unwrap().unwrap();
        assert_eq!(config.engine, Some("xsltproc".to_string()));
        assert_eq!(config.directive_marker, Some("@".to_string()));
        assert!(config.search_path.is_none());
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let yaml_content = "engine: [unterminated";

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{yaml_content}").unwrap();
        let temp_path = temp_file.path().to_str().unwrap();

        let result = load_config(temp_path);
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }

    #[test]
    fn test_default_directive_marker() {
        assert_eq!(DEFAULT_DIRECTIVE_MARKER, "@");
    }
}
