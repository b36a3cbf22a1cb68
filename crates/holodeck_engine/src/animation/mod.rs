//! Deterministic animation derivation
//!
//! [`AnimationDriver::derive`] is a pure function from
//! `(entity, frame timing, highlight state)` to visual parameters. It
//! reads no clocks and keeps no hidden state, so identical inputs always
//! produce identical outputs and replays are reproducible in tests.
//!
//! Per-entity faults are isolated by [`FrameAnimator`]: a failed
//! derivation substitutes that entity's last-known-good parameters and
//! the remaining entities in the frame proceed untouched.

use std::collections::HashMap;

use thiserror::Error;

use crate::entity::{Entity, EntityCategory, EntityKey, EventStatus, PluginStatus};
use crate::foundation::math::{is_finite_vec, Vec3};
use crate::foundation::time::FrameTiming;
use crate::warnings::PanelWarning;

/// Orb scale gain applied along X per unit of stress
pub const ORB_STRESS_GAIN: f32 = 0.35;
/// Orb scale gain applied along Y per unit of focus
pub const ORB_FOCUS_GAIN: f32 = 0.25;
/// Orb scale gain applied along Z per unit of curiosity
pub const ORB_CURIOSITY_GAIN: f32 = 0.30;
/// Orb base spin in radians per second
pub const ORB_SPIN_BASE: f32 = 0.6;
/// Additional orb spin per unit of stress (radians per second)
pub const ORB_SPIN_STRESS_GAIN: f32 = 1.8;

/// Baseline color intensity for graph nodes
pub const NODE_INTENSITY_BASE: f32 = 0.2;
/// Color intensity for hovered or selected graph nodes
pub const NODE_INTENSITY_HIGHLIGHT: f32 = 1.5;

/// Plugin card spin in radians per second while not hovered
pub const CARD_SPIN_RATE: f32 = 0.9;
/// Uniform scale applied to a hovered plugin card
pub const CARD_HOVER_SCALE: f32 = 1.4;

/// Pulse amplitude for pending timeline events
const EVENT_PULSE_AMPLITUDE: f32 = 0.08;
/// Pulse frequency for pending timeline events (radians per second)
const EVENT_PULSE_RATE: f32 = 4.0;

/// Visual parameters derived for one entity for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualParams {
    /// Per-axis scale
    pub scale: Vec3,

    /// Color/emissive intensity
    pub color_intensity: f32,

    /// Rotation to apply this frame, in radians
    pub rotation_delta: f32,
}

impl Default for VisualParams {
    /// Neutral parameters, also used as the fallback before any
    /// last-known-good value exists for an entity
    fn default() -> Self {
        Self {
            scale: Vec3::new(1.0, 1.0, 1.0),
            color_intensity: NODE_INTENSITY_BASE,
            rotation_delta: 0.0,
        }
    }
}

/// Failure while deriving parameters for a single entity
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DerivationError {
    /// The entity carried a non-finite numeric field
    #[error("entity '{key}' contains a non-finite value")]
    NonFinite {
        /// Qualified identity of the offending entity
        key: EntityKey,
    },
}

/// Hover/selection view the driver consults for highlight rules.
///
/// Keys are category-qualified: hovering a node named `"orb"` does not
/// highlight the emotion orb.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightState<'a> {
    /// Key currently hovered, if any
    pub hovered: Option<&'a EntityKey>,
    /// Key currently selected, if any
    pub selected: Option<&'a EntityKey>,
}

fn key_matches(key: Option<&EntityKey>, category: EntityCategory, id: &str) -> bool {
    key.map_or(false, |k| k.category == category && k.id == id)
}

impl HighlightState<'_> {
    fn is_hovered(&self, category: EntityCategory, id: &str) -> bool {
        key_matches(self.hovered, category, id)
    }

    fn is_highlighted(&self, category: EntityCategory, id: &str) -> bool {
        key_matches(self.hovered, category, id) || key_matches(self.selected, category, id)
    }
}

/// Pure derivation of visual parameters from entity state
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationDriver;

impl AnimationDriver {
    /// Derive visual parameters for one entity.
    ///
    /// Deterministic: the same `(entity, timing, highlight)` triple
    /// always yields the same output.
    ///
    /// # Errors
    /// [`DerivationError::NonFinite`] when the entity carries corrupt
    /// numeric data; the caller substitutes last-known-good parameters.
    pub fn derive(
        entity: &Entity,
        timing: FrameTiming,
        highlight: HighlightState<'_>,
    ) -> Result<VisualParams, DerivationError> {
        match entity {
            Entity::Emotion(emotion) => {
                if !(emotion.stress.is_finite()
                    && emotion.focus.is_finite()
                    && emotion.curiosity.is_finite())
                {
                    return Err(DerivationError::NonFinite {
                        key: entity.key(),
                    });
                }
                let spin = ORB_SPIN_BASE + emotion.stress * ORB_SPIN_STRESS_GAIN;
                Ok(VisualParams {
                    scale: Vec3::new(
                        1.0 + emotion.stress * ORB_STRESS_GAIN,
                        1.0 + emotion.focus * ORB_FOCUS_GAIN,
                        1.0 + emotion.curiosity * ORB_CURIOSITY_GAIN,
                    ),
                    color_intensity: 0.6 + 0.4 * emotion.focus,
                    rotation_delta: spin * timing.delta,
                })
            }
            Entity::Node(node) => {
                if !is_finite_vec(&node.position) {
                    return Err(DerivationError::NonFinite {
                        key: entity.key(),
                    });
                }
                let intensity = if highlight.is_highlighted(EntityCategory::Node, &node.id) {
                    NODE_INTENSITY_HIGHLIGHT
                } else {
                    NODE_INTENSITY_BASE
                };
                Ok(VisualParams {
                    scale: Vec3::new(1.0, 1.0, 1.0),
                    color_intensity: intensity,
                    rotation_delta: 0.0,
                })
            }
            Entity::Plugin(plugin) => {
                let hovered = highlight.is_hovered(EntityCategory::Plugin, &plugin.id);
                let scale = if hovered { CARD_HOVER_SCALE } else { 1.0 };
                // Hover freezes the card so its face stays readable.
                let rotation_delta = if hovered {
                    0.0
                } else {
                    CARD_SPIN_RATE * timing.delta
                };
                let intensity = match plugin.status {
                    PluginStatus::Active => 1.0,
                    PluginStatus::Idle => 0.4,
                };
                Ok(VisualParams {
                    scale: Vec3::new(scale, scale, scale),
                    color_intensity: intensity,
                    rotation_delta,
                })
            }
            Entity::Event(event) => {
                let (intensity, pulse) = match event.status {
                    EventStatus::Success => (1.0, 0.0),
                    EventStatus::Failure => (0.8, 0.0),
                    EventStatus::Pending => {
                        (0.5, EVENT_PULSE_AMPLITUDE * (timing.elapsed * EVENT_PULSE_RATE).sin())
                    }
                };
                let scale = 1.0 + pulse;
                Ok(VisualParams {
                    scale: Vec3::new(scale, scale, scale),
                    color_intensity: intensity,
                    rotation_delta: 0.0,
                })
            }
            Entity::Link(_) => Ok(VisualParams {
                scale: Vec3::new(1.0, 1.0, 1.0),
                color_intensity: 0.3,
                rotation_delta: 0.0,
            }),
        }
    }
}

/// Frame-level animation pass with per-entity fault isolation.
///
/// Keeps each entity's last successfully derived parameters; when a
/// derivation fails, that entity falls back to its last-known-good
/// value (or neutral defaults) and a warning is recorded, while every
/// other entity in the frame is derived normally.
#[derive(Debug, Default)]
pub struct FrameAnimator {
    last_good: HashMap<EntityKey, VisualParams>,
}

impl FrameAnimator {
    /// Create an animator with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive parameters for every supplied entity.
    ///
    /// Returns a map from qualified entity key to parameters; failed
    /// derivations are reported through `warnings`.
    pub fn animate(
        &mut self,
        entities: &[Entity],
        timing: FrameTiming,
        highlight: HighlightState<'_>,
        warnings: &mut Vec<PanelWarning>,
    ) -> HashMap<EntityKey, VisualParams> {
        let mut params = HashMap::with_capacity(entities.len());
        for entity in entities {
            let key = entity.key();
            match AnimationDriver::derive(entity, timing, highlight) {
                Ok(derived) => {
                    self.last_good.insert(key.clone(), derived);
                    params.insert(key, derived);
                }
                Err(err) => {
                    log::warn!("animation derivation failed for '{}': {}", key, err);
                    warnings.push(PanelWarning::DerivationFault {
                        id: key.to_string(),
                        reason: err.to_string(),
                    });
                    let fallback = self.last_good.get(&key).copied().unwrap_or_default();
                    params.insert(key, fallback);
                }
            }
        }
        params
    }

    /// Drop history for entities that no longer exist
    pub fn prune(&mut self, exists: impl Fn(&EntityKey) -> bool) {
        self.last_good.retain(|key, _| exists(key));
    }
}
