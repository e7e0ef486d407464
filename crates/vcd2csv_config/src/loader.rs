//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ConvertConfig;
use std::path::{Path, PathBuf};

/// The file name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "vcd2csv.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<ConvertConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ConvertConfig, ConfigError> {
    let config: ConvertConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Returns `<dir>/vcd2csv.toml` if it exists.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    path.is_file().then_some(path)
}

/// Loads the explicit config if given, else `<dir>/vcd2csv.toml` if present,
/// else the defaults.
pub fn load_optional_config(
    explicit: Option<&Path>,
    dir: &Path,
) -> Result<ConvertConfig, ConfigError> {
    match explicit.map(Path::to_path_buf).or_else(|| find_config(dir)) {
        Some(path) => load_config(&path),
        None => Ok(ConvertConfig::default()),
    }
}

fn validate_config(config: &ConvertConfig) -> Result<(), ConfigError> {
    let d = config.output.delimiter;
    if !d.is_ascii() || matches!(d, '"' | '\r' | '\n') {
        return Err(ConfigError::ValidationError(format!(
            "output.delimiter must be a single ASCII character other than a quote or line break, got {d:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SelectMode;
    use std::io::Write;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, ConvertConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[select]
mode = "exact"

[output]
delimiter = ";"
suppress_unchanged = false
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.select.mode, SelectMode::Exact);
        assert_eq!(config.output.delimiter, ';');
        assert!(!config.output.suppress_unchanged);
    }

    #[test]
    fn tab_delimiter() {
        let config = load_config_from_str("[output]\ndelimiter = \"\\t\"\n").unwrap();
        assert_eq!(config.output.delimiter, '\t');
    }

    #[test]
    fn quote_delimiter_rejected() {
        let err = load_config_from_str("[output]\ndelimiter = '\"'\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn non_ascii_delimiter_rejected() {
        let err = load_config_from_str("[output]\ndelimiter = \"§\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn multi_char_delimiter_is_parse_error() {
        let err = load_config_from_str("[output]\ndelimiter = \",,\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let err = load_config_from_str("[output]\ncolour = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn io_error_from_nonexistent_file() {
        let err = load_config(Path::new("/nonexistent/dir/vcd2csv.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn optional_config_defaults_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config(dir.path()).is_none());
        let config = load_optional_config(None, dir.path()).unwrap();
        assert_eq!(config, ConvertConfig::default());
    }

    #[test]
    fn optional_config_found_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        writeln!(f, "[select]\nmode = \"regex\"").unwrap();
        drop(f);

        let config = load_optional_config(None, dir.path()).unwrap();
        assert_eq!(config.select.mode, SelectMode::Regex);
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("other.toml");
        let err = load_optional_config(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
