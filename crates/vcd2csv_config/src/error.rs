//! Errors raised while reading `vcd2csv.toml`.

/// Why a `vcd2csv.toml` could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not valid TOML or has unknown keys.
    #[error("invalid vcd2csv.toml: {0}")]
    ParseError(String),

    /// A value parsed but is not usable.
    #[error("invalid configuration value: {0}")]
    ValidationError(String),
}
