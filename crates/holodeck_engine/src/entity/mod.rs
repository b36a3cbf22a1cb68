//! Visual entity model
//!
//! The typed entities tracked by each panel's registry: memory graph
//! nodes and links, the emotion orb state, timeline events, and plugin
//! cards. These are plain data — everything visual (color, scale,
//! rotation) is derived per frame by the animation driver.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{clamp_unit, Vec3};
use crate::warnings::PanelWarning;

/// Memory category of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Episodic memory (events the agent experienced)
    Episodic,
    /// Semantic memory (facts and concepts)
    Semantic,
    /// Procedural memory (skills and routines)
    Procedural,
}

impl NodeKind {
    /// Lowercase name used by overlays and logs
    pub fn label(self) -> &'static str {
        match self {
            Self::Episodic => "episodic",
            Self::Semantic => "semantic",
            Self::Procedural => "procedural",
        }
    }
}

/// A node in the memory graph, rendered as a colored sphere keyed by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique id within the node category
    pub id: String,

    /// Memory category
    pub kind: NodeKind,

    /// Position in scene space
    pub position: Vec3,

    /// Display label
    pub label: String,
}

/// A directed edge between two graph nodes.
///
/// Endpoints are resolved against the current node set at render/query
/// time, never at insert time, so nodes and links may arrive in any
/// order across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,
}

impl GraphLink {
    /// Create a link between two node ids
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Emotional state driving the orb panel; one instance per panel.
///
/// All three scalars live in `[0, 1]`. Use [`EmotionState::sanitized`]
/// when ingesting untrusted snapshot data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionState {
    /// Stress level
    pub stress: f32,
    /// Focus level
    pub focus: f32,
    /// Curiosity level
    pub curiosity: f32,
}

impl Default for EmotionState {
    fn default() -> Self {
        Self {
            stress: 0.0,
            focus: 0.5,
            curiosity: 0.5,
        }
    }
}

impl EmotionState {
    /// Clamp every scalar into `[0, 1]`, recording one warning per field
    /// that actually changed.
    pub fn sanitized(self, warnings: &mut Vec<PanelWarning>) -> Self {
        let mut clamp_field = |field: &'static str, raw: f32| {
            let clamped = clamp_unit(raw);
            if (clamped - raw).abs() > f32::EPSILON || !raw.is_finite() {
                log::warn!("emotion scalar '{}' out of range: {} -> {}", field, raw, clamped);
                warnings.push(PanelWarning::ScalarClamped {
                    field,
                    raw: format!("{raw}"),
                });
            }
            clamped
        };
        Self {
            stress: clamp_field("stress", self.stress),
            focus: clamp_field("focus", self.focus),
            curiosity: clamp_field("curiosity", self.curiosity),
        }
    }
}

/// Kind of a timeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A concrete task the agent executed
    Task,
    /// A reflection pass over prior work
    Reflection,
    /// A projected (future) step
    Projection,
}

/// Outcome of a timeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Completed successfully
    Success,
    /// Completed with failure
    Failure,
    /// Not yet resolved
    Pending,
}

/// One event on the task timeline, ordered by its time ordinal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Ordinal position in time; also the event's identity within the
    /// category (a later event with the same ordinal replaces it)
    pub time: u32,

    /// Event kind
    pub kind: EventKind,

    /// Display label
    pub label: String,

    /// Outcome status
    pub status: EventStatus,
}

/// Activity status of a plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginStatus {
    /// Plugin is actively handling work
    Active,
    /// Plugin is registered but idle
    Idle,
}

/// A plugin entry, rendered as a card in the rotating registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCard {
    /// Unique id within the plugin category
    pub id: String,

    /// Display name
    pub name: String,

    /// Activity status
    pub status: PluginStatus,

    /// Permissions granted to the plugin
    pub permissions: Vec<String>,

    /// Timestamp of last use, as supplied by the producer
    pub last_used: Option<String>,
}

/// Entity category discriminator used by generic registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityCategory {
    /// Memory graph nodes
    Node,
    /// Memory graph links
    Link,
    /// Emotion orb state
    Emotion,
    /// Timeline events
    Event,
    /// Plugin cards
    Plugin,
}

impl EntityCategory {
    /// Lowercase name used by qualified keys and logs
    pub fn label(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Link => "link",
            Self::Emotion => "emotion",
            Self::Event => "event",
            Self::Plugin => "plugin",
        }
    }
}

/// Category-qualified entity identity.
///
/// Ids are only unique within their category, so anything spanning
/// categories (animation parameter maps, pick targets, selection state)
/// keys by this pair. A node that happens to be named `"orb"` therefore
/// never collides with the emotion orb.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    /// Category the id belongs to
    pub category: EntityCategory,
    /// Id within that category
    pub id: String,
}

impl EntityKey {
    /// Key for a graph node
    pub fn node(id: impl Into<String>) -> Self {
        Self {
            category: EntityCategory::Node,
            id: id.into(),
        }
    }

    /// Key for a graph link, identified by its endpoint pair
    pub fn link(source: &str, target: &str) -> Self {
        Self {
            category: EntityCategory::Link,
            id: format!("{source}->{target}"),
        }
    }

    /// Key for the singleton emotion orb
    pub fn orb() -> Self {
        Self {
            category: EntityCategory::Emotion,
            id: ORB_ID.to_string(),
        }
    }

    /// Key for a timeline event
    pub fn event(time: u32) -> Self {
        Self {
            category: EntityCategory::Event,
            id: time.to_string(),
        }
    }

    /// Key for a plugin card
    pub fn plugin(id: impl Into<String>) -> Self {
        Self {
            category: EntityCategory::Plugin,
            id: id.into(),
        }
    }
}

// Ordered by id first so distance ties in picking break on the
// smallest id, with the category only as a final disambiguator.
impl Ord for EntityKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.category.cmp(&other.category))
    }
}

impl PartialOrd for EntityKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.category.label(), self.id)
    }
}

/// Any visualizable unit tracked by the registry
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// A memory graph node
    Node(GraphNode),
    /// A memory graph link
    Link(GraphLink),
    /// The emotion orb state
    Emotion(EmotionState),
    /// A timeline event
    Event(TimelineEvent),
    /// A plugin card
    Plugin(PluginCard),
}

impl Entity {
    /// Category this entity belongs to
    pub fn category(&self) -> EntityCategory {
        match self {
            Self::Node(_) => EntityCategory::Node,
            Self::Link(_) => EntityCategory::Link,
            Self::Emotion(_) => EntityCategory::Emotion,
            Self::Event(_) => EntityCategory::Event,
            Self::Plugin(_) => EntityCategory::Plugin,
        }
    }

    /// Category-qualified identity of the entity.
    ///
    /// Links are identified by their endpoint pair and the emotion state
    /// by a fixed singleton id.
    pub fn key(&self) -> EntityKey {
        match self {
            Self::Node(node) => EntityKey::node(&node.id),
            Self::Link(link) => EntityKey::link(&link.source, &link.target),
            Self::Emotion(_) => EntityKey::orb(),
            Self::Event(event) => EntityKey::event(event.time),
            Self::Plugin(plugin) => EntityKey::plugin(&plugin.id),
        }
    }
}

/// Singleton id under which the emotion orb is picked and selected
pub const ORB_ID: &str = "orb";
