//! Configuration types deserialized from `vcd2csv.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `vcd2csv.toml`.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    /// Signal selection settings.
    #[serde(default)]
    pub select: SelectConfig,
    /// Output rendering settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// How signal patterns on the command line are matched.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SelectConfig {
    /// Default match mode when neither `--exact` nor `--regexp` is given.
    #[serde(default)]
    pub mode: SelectMode,
}

/// Signal pattern match mode.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    /// The reference name contains the pattern.
    #[default]
    Substring,
    /// The reference name equals the pattern.
    Exact,
    /// The pattern is a regular expression searched in the reference name.
    #[serde(alias = "regexp")]
    Regex,
}

/// CSV output settings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Field delimiter. Must be a single ASCII character other than a quote or line break.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Drop rows in which no selected signal changed. On unless set to `false`.
    #[serde(default = "default_suppress_unchanged")]
    pub suppress_unchanged: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            suppress_unchanged: default_suppress_unchanged(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_suppress_unchanged() -> bool {
    true
}
