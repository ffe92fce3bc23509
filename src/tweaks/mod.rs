// src/tweaks/mod.rs

pub mod definitions;
pub mod engine;

use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::{
    constants::DELETE_SENTINEL,
    utils::registry::{reg_add_command, RegValueType, RegistryTarget},
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TweakCategory {
    Privacy,
    Performance,
    Appearance,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// What a tweak falls back to on revert when no usable backup exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Remove the value entirely; Windows' own default is "not present".
    Delete,
    Value(String),
}

impl DefaultValue {
    /// Interprets a catalog default, where the delete sentinel means [`DefaultValue::Delete`].
    pub fn from_catalog(value: &str) -> Self {
        if value == DELETE_SENTINEL {
            DefaultValue::Delete
        } else {
            DefaultValue::Value(value.to_string())
        }
    }
}

/// A single catalog-defined registry change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tweak {
    /// Unique identifier for the tweak.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: TweakCategory,
    pub impact: Impact,
    /// Command line that applies the tweak.
    pub command: String,
    pub target: RegistryTarget,
    /// Type the tweak writes; also used when writing a default value back.
    pub value_type: RegValueType,
    /// Value the target holds once the tweak is applied.
    pub expected_value: &'static str,
    pub default_value: Option<DefaultValue>,
}

impl Tweak {
    /// Tweak that writes `expected_value` to `path\name` with `reg add`.
    #[allow(clippy::too_many_arguments)]
    pub fn registry(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        category: TweakCategory,
        impact: Impact,
        path: &str,
        value_name: &str,
        value_type: RegValueType,
        expected_value: &'static str,
    ) -> Self {
        let target = RegistryTarget::new(path, value_name);
        Self {
            id,
            name,
            description,
            category,
            impact,
            command: reg_add_command(&target, value_type, expected_value),
            target,
            value_type,
            expected_value,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(DefaultValue::from_catalog(value));
        self
    }

    /// Replaces the generated apply command, for tweaks that touch more than one value.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }
}

/// Every tweak, keyed by id in catalog order. Built once and never mutated.
pub static CATALOG: Lazy<IndexMap<&'static str, Tweak>> = Lazy::new(definitions::all_tweaks);

pub fn find_tweak(id: &str) -> Option<&'static Tweak> {
    CATALOG.get(id)
}

pub fn tweaks_in(category: TweakCategory) -> impl Iterator<Item = &'static Tweak> {
    CATALOG.values().filter(move |t| t.category == category)
}

/// UI-observed on/off state, kept apart from the immutable catalog.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TweakStates {
    enabled: HashMap<String, bool>,
}

impl TweakStates {
    pub fn set(&mut self, id: &str, enabled: bool) {
        self.enabled.insert(id.to_string(), enabled);
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.get(id).copied().unwrap_or(false)
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.values().filter(|v| **v).count()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let all = definitions::all_tweaks();
        let ids: HashSet<_> = all.values().map(|t| t.id).collect();
        assert_eq!(ids.len(), all.len());
        assert!(all.iter().all(|(key, t)| *key == t.id));
    }

    #[test]
    fn test_every_category_has_tweaks() {
        for category in TweakCategory::iter() {
            assert!(
                tweaks_in(category).count() > 0,
                "no tweaks in {}",
                category
            );
        }
    }

    #[test]
    fn test_default_sentinel() {
        assert_eq!(DefaultValue::from_catalog("DELETE"), DefaultValue::Delete);
        assert_eq!(
            DefaultValue::from_catalog("3"),
            DefaultValue::Value("3".to_string())
        );
        let feedback = find_tweak("feedback").unwrap();
        assert_eq!(feedback.default_value, Some(DefaultValue::Delete));
    }

    #[test]
    fn test_generated_command_writes_expected_value() {
        let tweak = find_tweak("telemetry-disable").unwrap();
        assert_eq!(
            tweak.command,
            "reg add \"HKLM\\SOFTWARE\\Policies\\Microsoft\\Windows\\DataCollection\" /v \"AllowTelemetry\" /t REG_DWORD /d \"0\" /f"
        );
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Privacy".parse::<TweakCategory>(), Ok(TweakCategory::Privacy));
        assert_eq!(TweakCategory::Network.as_ref(), "network");
    }

    #[test]
    fn test_states_default_to_disabled() {
        let mut states = TweakStates::default();
        assert!(!states.is_enabled("dark-mode"));
        states.set("dark-mode", true);
        assert!(states.is_enabled("dark-mode"));
        assert_eq!(states.enabled_count(), 1);
    }
}
