//! Option resolution: merging the configuration file with command-line flags.

use crate::types::{ConvertConfig, SelectMode};

/// Settings given on the command line that override the configuration file.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides {
    /// `--exact` or `--regexp`, if either was given.
    pub mode: Option<SelectMode>,
}

/// The effective conversion options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOptions {
    /// Signal pattern match mode.
    pub mode: SelectMode,
    /// CSV field delimiter, validated to be ASCII.
    pub delimiter: u8,
    /// Drop CSV rows in which no selected signal changed.
    pub suppress_unchanged: bool,
}

/// Resolves the effective options; command-line flags win over the file.
pub fn resolve_options(config: &ConvertConfig, overrides: CliOverrides) -> ResolvedOptions {
    ResolvedOptions {
        mode: overrides.mode.unwrap_or(config.select.mode),
        // Validated by the loader; a default config is always `,`.
        delimiter: u8::try_from(config.output.delimiter).unwrap_or(b','),
        suppress_unchanged: config.output.suppress_unchanged,
    }
}
