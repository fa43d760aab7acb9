//! Profiles: named configurations selecting a role registry variant.
//!
//! A profile is a value, not a subclass: switching profile over the same
//! graph yields a different, independently valid view with no mutation
//! anywhere. Two spec generations are covered, plus the schema-only
//! dialect.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ModelConfig;
use crate::personality::{
    Personality, owl1_dl_personality, owl1_full_personality, owl1_lite_personality,
    owl2_dl_personality, owl2_el_personality, owl2_full_personality, owl2_ql_personality,
    owl2_rl_personality, rdfs_personality,
};

/// The supported logical dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Schema vocabulary only: classes, generic properties, instances.
    Rdfs,

    /// First generation, restricted constructs and no punning at all.
    Owl1Lite,
    /// First generation, description-logic constraints.
    Owl1Dl,
    /// First generation, no constraints on role coexistence.
    Owl1Full,

    /// Second generation, existential-logic subset.
    Owl2El,
    /// Second generation, query-language subset.
    Owl2Ql,
    /// Second generation, rule-language subset.
    Owl2Rl,
    /// Second generation, description-logic constraints.
    Owl2Dl,
    /// Second generation, no constraints on role coexistence.
    Owl2Full,
}

impl Profile {
    pub const ALL: &'static [Profile] = &[
        Self::Rdfs,
        Self::Owl1Lite,
        Self::Owl1Dl,
        Self::Owl1Full,
        Self::Owl2El,
        Self::Owl2Ql,
        Self::Owl2Rl,
        Self::Owl2Dl,
        Self::Owl2Full,
    ];

    /// The role registry this profile wires in.
    pub fn personality(&self) -> &'static Personality {
        match self {
            Self::Rdfs => rdfs_personality(),
            Self::Owl1Lite => owl1_lite_personality(),
            Self::Owl1Dl => owl1_dl_personality(),
            Self::Owl1Full => owl1_full_personality(),
            Self::Owl2El => owl2_el_personality(),
            Self::Owl2Ql => owl2_ql_personality(),
            Self::Owl2Rl => owl2_rl_personality(),
            Self::Owl2Dl => owl2_dl_personality(),
            Self::Owl2Full => owl2_full_personality(),
        }
    }

    /// Whether this is one of the unconstrained (full) dialects.
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Owl1Full | Self::Owl2Full)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rdfs => "rdfs",
            Self::Owl1Lite => "owl1-lite",
            Self::Owl1Dl => "owl1-dl",
            Self::Owl1Full => "owl1-full",
            Self::Owl2El => "owl2-el",
            Self::Owl2Ql => "owl2-ql",
            Self::Owl2Rl => "owl2-rl",
            Self::Owl2Dl => "owl2-dl",
            Self::Owl2Full => "owl2-full",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rdfs" => Ok(Self::Rdfs),
            "owl1-lite" | "owl1_lite" => Ok(Self::Owl1Lite),
            "owl1-dl" | "owl1_dl" => Ok(Self::Owl1Dl),
            "owl1-full" | "owl1_full" => Ok(Self::Owl1Full),
            "owl2-el" | "owl2_el" => Ok(Self::Owl2El),
            "owl2-ql" | "owl2_ql" => Ok(Self::Owl2Ql),
            "owl2-rl" | "owl2_rl" => Ok(Self::Owl2Rl),
            "owl2-dl" | "owl2_dl" => Ok(Self::Owl2Dl),
            "owl2-full" | "owl2_full" => Ok(Self::Owl2Full),
            _ => Err(format!("unknown profile: {s}")),
        }
    }
}

/// An immutable profile-plus-configuration pair.
///
/// Construction-time parameter of every model view; changing it means
/// constructing a new view over the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub profile: Profile,
    pub config: ModelConfig,
}

impl Specification {
    /// A specification with the profile's default configuration.
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            config: ModelConfig::defaults_for(profile),
        }
    }

    pub fn with_config(profile: Profile, config: ModelConfig) -> Self {
        Self { profile, config }
    }

    pub fn personality(&self) -> &'static Personality {
        self.profile.personality()
    }
}
