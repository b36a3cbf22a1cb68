//! Data binding: the panel's only ingress boundary
//!
//! External producers hand the panel immutable [`StateSnapshot`]s at
//! whatever cadence suits them (timer, event push, manual call). Pushes
//! land on a queue and are drained exactly once per frame, before
//! animation derivation, so every rendered frame observes one consistent
//! entity set — never a half-applied snapshot.

use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::entity::{
    EmotionState, Entity, GraphLink, GraphNode, PluginCard, TimelineEvent,
};
use crate::registry::EntityRegistry;

/// Immutable, point-in-time bundle of agent state.
///
/// One array (or single record) per category. Binding replaces entities
/// wholesale by id: entities absent from the latest snapshot are removed
/// at the next bind cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Memory graph nodes
    #[serde(default)]
    pub nodes: Vec<GraphNode>,

    /// Memory graph links
    #[serde(default)]
    pub links: Vec<GraphLink>,

    /// Emotion orb state, if the producer supplies one
    #[serde(default)]
    pub emotion: Option<EmotionState>,

    /// Timeline events
    #[serde(default)]
    pub events: Vec<TimelineEvent>,

    /// Plugin registry cards
    #[serde(default)]
    pub plugins: Vec<PluginCard>,
}

struct QueueInner {
    pending: Mutex<VecDeque<StateSnapshot>>,
    closed: AtomicBool,
}

/// Single-consumer snapshot queue owned by a panel.
///
/// Producers push through cloned [`SnapshotSender`]s from any thread;
/// the panel drains once at the start of each frame. Closing the queue
/// (on panel disposal) makes every later push a silent discard.
pub struct SnapshotQueue {
    inner: Arc<QueueInner>,
}

impl Default for SnapshotQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotQueue {
    /// Create an empty, open queue
    pub fn new() -> Self {
        Self {
            inner: Arc::new(QueueInner {
                pending: Mutex::new(VecDeque::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Create a producer handle for this queue
    pub fn sender(&self) -> SnapshotSender {
        SnapshotSender {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Take every queued snapshot, in arrival order
    pub fn drain(&self) -> Vec<StateSnapshot> {
        let mut pending = self.inner.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.drain(..).collect()
    }

    /// Close the queue; pending snapshots are dropped and later pushes
    /// are discarded
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        let mut pending = self.inner.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.clear();
    }
}

impl std::fmt::Debug for SnapshotQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotQueue")
            .field("closed", &self.inner.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Cloneable, non-blocking producer handle
#[derive(Clone)]
pub struct SnapshotSender {
    inner: Arc<QueueInner>,
}

impl SnapshotSender {
    /// Enqueue a snapshot for the next bind cycle.
    ///
    /// Returns `false` when the owning panel has been disposed; the
    /// snapshot is discarded, never applied.
    pub fn push(&self, snapshot: StateSnapshot) -> bool {
        if self.inner.closed.load(Ordering::SeqCst) {
            log::trace!("snapshot discarded: panel disposed");
            return false;
        }
        let mut pending = self.inner.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.push_back(snapshot);
        true
    }
}

impl std::fmt::Debug for SnapshotSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotSender").finish_non_exhaustive()
    }
}

/// Apply one snapshot to a registry: upsert everything present, then
/// remove everything the snapshot no longer mentions.
pub fn apply(snapshot: &StateSnapshot, registry: &mut EntityRegistry) {
    let node_ids: BTreeSet<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
    let link_keys: BTreeSet<(&str, &str)> = snapshot
        .links
        .iter()
        .map(|l| (l.source.as_str(), l.target.as_str()))
        .collect();
    let event_times: BTreeSet<u32> = snapshot.events.iter().map(|e| e.time).collect();
    let plugin_ids: BTreeSet<&str> = snapshot.plugins.iter().map(|p| p.id.as_str()).collect();

    for node in &snapshot.nodes {
        registry.upsert(Entity::Node(node.clone()));
    }
    for link in &snapshot.links {
        registry.upsert(Entity::Link(link.clone()));
    }
    match snapshot.emotion {
        Some(emotion) => {
            registry.upsert(Entity::Emotion(emotion));
        }
        None => {
            registry.clear_emotion();
        }
    }
    for event in &snapshot.events {
        registry.upsert(Entity::Event(event.clone()));
    }
    for plugin in &snapshot.plugins {
        registry.upsert(Entity::Plugin(plugin.clone()));
    }

    registry.retain_nodes(|id| node_ids.contains(id));
    registry.retain_links(|source, target| link_keys.contains(&(source, target)));
    registry.retain_events(|time| event_times.contains(&time));
    registry.retain_plugins(|id| plugin_ids.contains(id));
}
