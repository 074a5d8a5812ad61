//! Generation bounds and named profiles.
//!
//! [`GenerationParameters`] is the bounds table controlling every random
//! count the synthesizer draws. Profiles are TOML files embedded in the
//! binary; fields a profile omits inherit the defaults below, so a profile
//! only spells out what it changes.

use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// Relative weights of the statement dispatch table.
///
/// The defaults reproduce the historical draw over `[0, 10)`: 0-1 loop,
/// 2-6 method call, 7 lambda, 8-9 branch. The split is tuned for realism
/// of the generated shape, not correctness; profiles may change it freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementWeights {
    pub loops: u32,
    pub calls: u32,
    pub lambdas: u32,
    pub branches: u32,
}

impl Default for StatementWeights {
    fn default() -> Self {
        Self {
            loops: 2,
            calls: 5,
            lambdas: 1,
            branches: 2,
        }
    }
}

impl StatementWeights {
    pub fn total(&self) -> u32 {
        self.loops + self.calls + self.lambdas + self.branches
    }
}

/// Bounds table for one generation run. All ranges are inclusive; a
/// maximum of 0 disables the construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Instance variables per class, `[min, max]`.
    pub instance_vars: (usize, usize),
    /// Methods per class, `[min, max]`.
    pub methods: (usize, usize),
    /// Maximum parameters per method.
    pub max_params: usize,
    /// Statements per method body, `[min, max]`.
    pub method_statements: (usize, usize),
    /// Maximum statements inside a loop body.
    pub max_blocks_in_loop: usize,
    /// Maximum statements inside an if branch.
    pub max_blocks_in_if: usize,
    /// Maximum statements inside an else branch.
    pub max_blocks_in_else: usize,
    /// Maximum statements inside a lambda body.
    pub max_blocks_in_lambda: usize,
    /// Maximum block nesting depth below the method body; at the cap,
    /// dispatch degrades to call statements only.
    pub max_block_depth: usize,
    /// Retry budget for every bounded random search.
    pub attempts: usize,
    /// Probability that a generated method declares a return type.
    pub return_probability: f64,
    pub weights: StatementWeights,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            instance_vars: (2, 5),
            methods: (2, 6),
            max_params: 3,
            method_statements: (2, 6),
            max_blocks_in_loop: 2,
            max_blocks_in_if: 2,
            max_blocks_in_else: 2,
            max_blocks_in_lambda: 1,
            max_block_depth: 3,
            attempts: 10,
            return_probability: 0.25,
            weights: StatementWeights::default(),
        }
    }
}

// Embedded profile TOML data (compiled into the binary).
static PROFILES: &[(&str, &str)] = &[
    ("minimal", include_str!("../profiles/minimal.toml")),
    ("default", include_str!("../profiles/default.toml")),
    ("large", include_str!("../profiles/large.toml")),
];

/// Names of the embedded profiles.
pub fn available_profiles() -> Vec<&'static str> {
    PROFILES.iter().map(|(name, _)| *name).collect()
}

/// Look up an embedded profile by name, or load one from a TOML file when
/// the argument contains `/` or ends with `.toml`.
pub fn get_profile(name_or_path: &str) -> Result<GenerationParameters, GenError> {
    if name_or_path.contains('/') || name_or_path.ends_with(".toml") {
        let content =
            std::fs::read_to_string(name_or_path).map_err(|e| GenError::ProfileParse {
                name: name_or_path.to_string(),
                message: e.to_string(),
            })?;
        return parse_profile(name_or_path, &content);
    }

    for (name, toml_str) in PROFILES {
        if *name == name_or_path {
            return parse_profile(name, toml_str);
        }
    }
    Err(GenError::UnknownProfile(name_or_path.to_string()))
}

fn parse_profile(name: &str, toml_str: &str) -> Result<GenerationParameters, GenError> {
    toml::from_str(toml_str).map_err(|e| GenError::ProfileParse {
        name: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_historical_table() {
        let w = StatementWeights::default();
        assert_eq!(w.total(), 10);
        assert_eq!((w.loops, w.calls, w.lambdas, w.branches), (2, 5, 1, 2));
    }

    #[test]
    fn every_embedded_profile_parses() {
        for name in available_profiles() {
            let profile = get_profile(name).unwrap();
            assert!(profile.attempts > 0, "profile {name} disables retries");
        }
    }

    #[test]
    fn unknown_profile_is_an_error() {
        match get_profile("nope") {
            Err(GenError::UnknownProfile(name)) => assert_eq!(name, "nope"),
            other => panic!("expected UnknownProfile, got {other:?}"),
        }
    }

    #[test]
    fn omitted_fields_inherit_defaults() {
        let parsed: GenerationParameters = toml::from_str("max_params = 1").unwrap();
        assert_eq!(parsed.max_params, 1);
        assert_eq!(parsed.attempts, GenerationParameters::default().attempts);
        assert_eq!(parsed.weights, StatementWeights::default());
    }

    #[test]
    fn minimal_profile_is_smaller_than_large() {
        let minimal = get_profile("minimal").unwrap();
        let large = get_profile("large").unwrap();
        assert!(minimal.methods.1 < large.methods.1);
        assert!(minimal.instance_vars.1 < large.instance_vars.1);
    }
}
