//! Read-only view of reachable targets for presentation layers

use super::edges::{is_declared, reachable_targets};
use super::FormatId;
use serde::Serialize;

/// One selectable conversion, as a format picker would show it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOption {
    pub from: FormatId,
    pub to: FormatId,
    pub label: String,
    pub description: String,
}

/// Derived index over the conversion graph
///
/// The graph never changes at runtime, so every query reads straight from
/// the static adjacency table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityIndex;

impl CapabilityIndex {
    pub fn new() -> Self {
        Self
    }

    /// Targets reachable from `source`, in declaration order
    pub fn list_reachable(&self, source: FormatId) -> &'static [FormatId] {
        reachable_targets(source)
    }

    pub fn is_reachable(&self, source: FormatId, target: FormatId) -> bool {
        is_declared(source, target)
    }

    /// Sources that declare an edge into `target`, in registry order
    pub fn sources_for(&self, target: FormatId) -> Vec<FormatId> {
        FormatId::ALL
            .into_iter()
            .filter(|source| is_declared(*source, target))
            .collect()
    }

    /// Picker entries for every target reachable from `source`
    pub fn options(&self, source: FormatId) -> Vec<ConversionOption> {
        let from = source.descriptor();
        self.list_reachable(source)
            .iter()
            .map(|target| {
                let to = target.descriptor();
                ConversionOption {
                    from: source,
                    to: *target,
                    label: format!("{} → {}", from.name, to.name),
                    description: format!(
                        "Convert {} to {}",
                        from.description.to_lowercase(),
                        to.description.to_lowercase()
                    ),
                }
            })
            .collect()
    }
}
