//! Model configuration: the tunable policies a specification carries.
//!
//! Everything here is a plain value with per-profile defaults. A TOML
//! fragment can override individual fields; unknown keys are rejected so
//! a typo never silently falls back to a default.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// How subsumption self-loops surface in hierarchy results.
///
/// Observed behavior differs across dialects once a cycle is asserted;
/// this is deliberately a policy flag rather than a universal rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    /// A node never appears among its own ancestors or descendants.
    Filtered,
    /// An explicitly asserted self-loop surfaces the node in its own
    /// indirect result; direct results still never contain it.
    AssertedSelf,
}

/// Errors raised while loading configuration overrides.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid model config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Policy switches consulted by the resolver and the hierarchy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct ModelConfig {
    /// Whether explicit class-equivalence assertions participate in
    /// hierarchy traversal. Off for the schema-only dialect, which
    /// ignores such assertions entirely.
    pub equivalent_class_feature: bool,

    /// Same switch for property equivalence.
    pub equivalent_property_feature: bool,

    /// Self-loop surfacing policy (see [`CyclePolicy`]).
    pub cycle_policy: CyclePolicy,

    /// Whether on-demand hierarchy walks report the universal class as
    /// the ancestor of last resort. Ignored when the personality posits
    /// no universal class, and in materialized-closure mode, where the
    /// stored edges are authoritative.
    pub surface_universal_top: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            equivalent_class_feature: true,
            equivalent_property_feature: true,
            cycle_policy: CyclePolicy::Filtered,
            surface_universal_top: true,
        }
    }
}

impl ModelConfig {
    /// The configuration each profile starts from.
    pub fn defaults_for(profile: Profile) -> Self {
        match profile {
            Profile::Rdfs => Self {
                equivalent_class_feature: false,
                equivalent_property_feature: false,
                cycle_policy: CyclePolicy::Filtered,
                surface_universal_top: false,
            },
            Profile::Owl1Full | Profile::Owl2Full => Self {
                cycle_policy: CyclePolicy::AssertedSelf,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Parse a full configuration from TOML text.
    ///
    /// Missing keys take the crate-wide defaults; unknown keys are an
    /// error.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rdfs_defaults_disable_equivalence_and_top() {
        let config = ModelConfig::defaults_for(Profile::Rdfs);
        assert!(!config.equivalent_class_feature);
        assert!(!config.surface_universal_top);
    }

    #[test]
    fn full_profiles_surface_asserted_self_loops() {
        let config = ModelConfig::defaults_for(Profile::Owl2Full);
        assert_eq!(config.cycle_policy, CyclePolicy::AssertedSelf);
        let config = ModelConfig::defaults_for(Profile::Owl2Dl);
        assert_eq!(config.cycle_policy, CyclePolicy::Filtered);
    }

    #[test]
    fn toml_overrides_parse() {
        let config = ModelConfig::from_toml_str(
            r#"
            equivalent-class-feature = false
            cycle-policy = "asserted-self"
            "#,
        )
        .expect("config must parse");
        assert!(!config.equivalent_class_feature);
        assert_eq!(config.cycle_policy, CyclePolicy::AssertedSelf);
        assert!(config.surface_universal_top, "unset keys keep defaults");
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = ModelConfig::from_toml_str("equivalent-class-featur = false")
            .expect_err("typo must be rejected");
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
