use serde::{Deserialize, Serialize};

/// How strictly header parameters are parsed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParameterCompliance {
    Strict,
    /// Accepts unquoted values containing spaces and tspecials up to the next `;`.
    #[default]
    Loose,
}

fn default_max_group_depth() -> usize {
    3
}

/// Knobs shared by every parser entry point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParserOptions {
    #[serde(default)]
    pub allow_addresses_without_domain: bool,
    #[serde(default = "default_max_group_depth")]
    pub max_address_group_depth: usize,
    #[serde(default)]
    pub parameter_compliance: ParameterCompliance,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_addresses_without_domain: false,
            max_address_group_depth: default_max_group_depth(),
            parameter_compliance: ParameterCompliance::default(),
        }
    }
}
