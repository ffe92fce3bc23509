// src/tweaks/definitions/mod.rs

use indexmap::IndexMap;

use super::Tweak;

pub mod appearance;
pub mod network;
pub mod performance;
pub mod privacy;

/// Builds the full catalog, in display order.
pub fn all_tweaks() -> IndexMap<&'static str, Tweak> {
    privacy::tweaks()
        .into_iter()
        .chain(performance::tweaks())
        .chain(appearance::tweaks())
        .chain(network::tweaks())
        .map(|tweak| (tweak.id, tweak))
        .collect()
}
