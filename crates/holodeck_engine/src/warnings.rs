//! Recovered-condition reporting
//!
//! Conditions the panel recovers from are recorded as warnings instead of
//! errors: they must be observable by the host shell but never interrupt
//! the frame loop or escape the panel that raised them.

/// A recovered condition observed inside a panel.
///
/// Warnings accumulate on the owning [`crate::panel::Panel`] and are
/// handed to the host via `drain_warnings()`. Every warning is also
/// emitted through `log::warn!` at the point it is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelWarning {
    /// A link referenced a node id not present in the registry; the link
    /// was skipped for this bind cycle.
    DanglingLink {
        /// Source node id of the skipped link
        source: String,
        /// Target node id of the skipped link
        target: String,
    },

    /// An emotion scalar arrived outside `[0, 1]` and was clamped.
    ScalarClamped {
        /// Name of the clamped field
        field: &'static str,
        /// Raw value as supplied by the snapshot, rendered to text so the
        /// warning stays `Eq`-comparable
        raw: String,
    },

    /// Deriving visual parameters for one entity failed; its last-known-
    /// good parameters were substituted and the rest of the frame
    /// proceeded.
    DerivationFault {
        /// Id of the entity whose derivation failed
        id: String,
        /// Human-readable cause
        reason: String,
    },

    /// The render surface could not be acquired; the panel is showing its
    /// static placeholder.
    ContextLost {
        /// Surface acquisition failure detail
        reason: String,
    },
}

impl std::fmt::Display for PanelWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingLink { source, target } => {
                write!(f, "dangling link {source} -> {target} skipped")
            }
            Self::ScalarClamped { field, raw } => {
                write!(f, "emotion scalar '{field}' value {raw} clamped into [0, 1]")
            }
            Self::DerivationFault { id, reason } => {
                write!(f, "animation derivation failed for '{id}': {reason}")
            }
            Self::ContextLost { reason } => {
                write!(f, "render context unavailable: {reason}")
            }
        }
    }
}
