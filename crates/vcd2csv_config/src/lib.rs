//! The optional `vcd2csv.toml` file.
//!
//! [`load_optional_config`] finds and parses the file into a [`ConvertConfig`];
//! [`resolve_options`] then lets command-line flags win and yields the
//! [`ResolvedOptions`] a conversion runs with.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    find_config, load_config, load_config_from_str, load_optional_config, CONFIG_FILE_NAME,
};
pub use resolve::{resolve_options, CliOverrides, ResolvedOptions};
pub use types::{ConvertConfig, OutputConfig, SelectConfig, SelectMode};
