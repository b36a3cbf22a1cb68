//! Typed entity registry
//!
//! Per-category, id-keyed storage for one panel's entities. The registry
//! is rebuilt wholesale from snapshots (replace-by-id, no partial
//! patching) and is single-writer at the frame boundary: bind mutates
//! it, everything later in the frame only reads.
//!
//! Link endpoints are resolved lazily at query time against the current
//! node set, so nodes and links may arrive in any order across
//! snapshots. Unresolved links are skipped and reported, never raised as
//! errors.

use std::collections::BTreeMap;

use crate::entity::{
    EmotionState, Entity, EntityCategory, GraphLink, GraphNode, PluginCard, TimelineEvent,
};
use crate::warnings::PanelWarning;

/// A link whose endpoints were both found in the current node set
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLink<'a> {
    /// The link itself
    pub link: &'a GraphLink,
    /// Resolved source node
    pub source: &'a GraphNode,
    /// Resolved target node
    pub target: &'a GraphNode,
}

/// Outcome of one lazy link-resolution pass
#[derive(Debug, Default)]
pub struct LinkResolution<'a> {
    /// Links with both endpoints present
    pub resolved: Vec<ResolvedLink<'a>>,
    /// Links skipped because an endpoint id was missing
    pub dangling: Vec<&'a GraphLink>,
}

/// Typed store of visual entities for a single panel.
///
/// Maps are `BTreeMap`s so iteration order is deterministic — the same
/// registry content always yields the same draw and pick order.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    nodes: BTreeMap<String, GraphNode>,
    links: BTreeMap<(String, String), GraphLink>,
    emotion: Option<EmotionState>,
    events: BTreeMap<u32, TimelineEvent>,
    plugins: BTreeMap<String, PluginCard>,
    warnings: Vec<PanelWarning>,
    revision: u64,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity, keyed by its identity.
    ///
    /// Returns `true` when the stored state actually changed. A second
    /// upsert with identical content is a no-op (no revision bump, no
    /// change signal); a second upsert with the same id but different
    /// content replaces, never duplicates.
    pub fn upsert(&mut self, entity: Entity) -> bool {
        let changed = match entity {
            Entity::Node(node) => {
                self.nodes.insert(node.id.clone(), node.clone()) != Some(node)
            }
            Entity::Link(link) => {
                let key = (link.source.clone(), link.target.clone());
                self.links.insert(key, link.clone()) != Some(link)
            }
            Entity::Emotion(emotion) => {
                let sanitized = emotion.sanitized(&mut self.warnings);
                self.emotion.replace(sanitized) != Some(sanitized)
            }
            Entity::Event(event) => {
                self.events.insert(event.time, event.clone()) != Some(event)
            }
            Entity::Plugin(plugin) => {
                self.plugins.insert(plugin.id.clone(), plugin.clone()) != Some(plugin)
            }
        };
        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Remove a node by id
    pub fn remove_node(&mut self, id: &str) -> bool {
        let removed = self.nodes.remove(id).is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Remove a link by its endpoint pair
    pub fn remove_link(&mut self, source: &str, target: &str) -> bool {
        let removed = self
            .links
            .remove(&(source.to_string(), target.to_string()))
            .is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Remove a timeline event by its time ordinal
    pub fn remove_event(&mut self, time: u32) -> bool {
        let removed = self.events.remove(&time).is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Remove a plugin card by id
    pub fn remove_plugin(&mut self, id: &str) -> bool {
        let removed = self.plugins.remove(id).is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Clear the emotion state
    pub fn clear_emotion(&mut self) -> bool {
        let removed = self.emotion.take().is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// All entities in a category, in deterministic order
    pub fn all(&self, category: EntityCategory) -> Vec<Entity> {
        match category {
            EntityCategory::Node => self.nodes.values().cloned().map(Entity::Node).collect(),
            EntityCategory::Link => self.links.values().cloned().map(Entity::Link).collect(),
            EntityCategory::Emotion => self.emotion.iter().copied().map(Entity::Emotion).collect(),
            EntityCategory::Event => self.events.values().cloned().map(Entity::Event).collect(),
            EntityCategory::Plugin => self.plugins.values().cloned().map(Entity::Plugin).collect(),
        }
    }

    /// Entities across all categories matching a predicate
    pub fn query(&self, predicate: impl Fn(&Entity) -> bool) -> Vec<Entity> {
        let mut out = Vec::new();
        for category in [
            EntityCategory::Node,
            EntityCategory::Link,
            EntityCategory::Emotion,
            EntityCategory::Event,
            EntityCategory::Plugin,
        ] {
            out.extend(self.all(category).into_iter().filter(|e| predicate(e)));
        }
        out
    }

    /// Number of entities in a category
    pub fn count(&self, category: EntityCategory) -> usize {
        match category {
            EntityCategory::Node => self.nodes.len(),
            EntityCategory::Link => self.links.len(),
            EntityCategory::Emotion => usize::from(self.emotion.is_some()),
            EntityCategory::Event => self.events.len(),
            EntityCategory::Plugin => self.plugins.len(),
        }
    }

    /// Monotonic revision counter, bumped on every real change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Look up a plugin card by id
    pub fn plugin(&self, id: &str) -> Option<&PluginCard> {
        self.plugins.get(id)
    }

    /// Current emotion state, if any snapshot supplied one
    pub fn emotion(&self) -> Option<&EmotionState> {
        self.emotion.as_ref()
    }

    /// Nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Plugin cards in id order
    pub fn plugins(&self) -> impl Iterator<Item = &PluginCard> {
        self.plugins.values()
    }

    /// Timeline events in ascending time order
    pub fn events_ordered(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.values()
    }

    /// Resolve every link against the current node set.
    ///
    /// Dangling links are collected, not dropped from storage: the
    /// missing endpoint may arrive in a later snapshot.
    pub fn resolve_links(&self) -> LinkResolution<'_> {
        let mut resolution = LinkResolution::default();
        for link in self.links.values() {
            match (self.nodes.get(&link.source), self.nodes.get(&link.target)) {
                (Some(source), Some(target)) => resolution.resolved.push(ResolvedLink {
                    link,
                    source,
                    target,
                }),
                _ => resolution.dangling.push(link),
            }
        }
        resolution
    }

    /// Retain only nodes whose id satisfies the predicate
    pub fn retain_nodes(&mut self, keep: impl Fn(&str) -> bool) {
        let before = self.nodes.len();
        self.nodes.retain(|id, _| keep(id));
        if self.nodes.len() != before {
            self.revision += 1;
        }
    }

    /// Retain only links whose endpoint pair satisfies the predicate
    pub fn retain_links(&mut self, keep: impl Fn(&str, &str) -> bool) {
        let before = self.links.len();
        self.links.retain(|(source, target), _| keep(source, target));
        if self.links.len() != before {
            self.revision += 1;
        }
    }

    /// Retain only events whose time ordinal satisfies the predicate
    pub fn retain_events(&mut self, keep: impl Fn(u32) -> bool) {
        let before = self.events.len();
        self.events.retain(|time, _| keep(*time));
        if self.events.len() != before {
            self.revision += 1;
        }
    }

    /// Retain only plugins whose id satisfies the predicate
    pub fn retain_plugins(&mut self, keep: impl Fn(&str) -> bool) {
        let before = self.plugins.len();
        self.plugins.retain(|id, _| keep(id));
        if self.plugins.len() != before {
            self.revision += 1;
        }
    }

    /// Drain warnings recorded during upserts (scalar clamping)
    pub fn drain_warnings(&mut self) -> Vec<PanelWarning> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::NodeKind;
    use crate::foundation::math::Vec3;

    fn node(id: &str, kind: NodeKind) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            kind,
            position: Vec3::zeros(),
            label: id.to_string(),
        }
    }

    #[test]
    fn test_upsert_replaces_never_duplicates() {
        let mut registry = EntityRegistry::new();
        assert!(registry.upsert(Entity::Node(node("E1", NodeKind::Episodic))));
        assert!(registry.upsert(Entity::Node(node("E1", NodeKind::Semantic))));
        assert_eq!(registry.count(EntityCategory::Node), 1);
        assert_eq!(registry.node("E1").unwrap().kind, NodeKind::Semantic);
    }

    #[test]
    fn test_upsert_identical_content_is_silent() {
        let mut registry = EntityRegistry::new();
        registry.upsert(Entity::Node(node("E1", NodeKind::Episodic)));
        let revision = registry.revision();
        assert!(!registry.upsert(Entity::Node(node("E1", NodeKind::Episodic))));
        assert_eq!(registry.revision(), revision);
    }

    #[test]
    fn test_emotion_upsert_clamps_and_warns() {
        let mut registry = EntityRegistry::new();
        registry.upsert(Entity::Emotion(EmotionState {
            stress: 1.7,
            focus: 0.5,
            curiosity: -0.5,
        }));
        let emotion = *registry.emotion().unwrap();
        assert_eq!(emotion.stress, 1.0);
        assert_eq!(emotion.curiosity, 0.0);
        let warnings = registry.drain_warnings();
        assert_eq!(warnings.len(), 2);
        assert!(registry.drain_warnings().is_empty());
    }

    #[test]
    fn test_resolve_links_skips_dangling() {
        let mut registry = EntityRegistry::new();
        registry.upsert(Entity::Node(node("E1", NodeKind::Episodic)));
        registry.upsert(Entity::Node(node("S1", NodeKind::Semantic)));
        registry.upsert(Entity::Link(GraphLink::new("E1", "S1")));
        registry.upsert(Entity::Link(GraphLink::new("S1", "99")));

        let resolution = registry.resolve_links();
        assert_eq!(resolution.resolved.len(), 1);
        assert_eq!(resolution.resolved[0].source.id, "E1");
        assert_eq!(resolution.dangling.len(), 1);
        assert_eq!(resolution.dangling[0].target, "99");
        // Both nodes are untouched by the dangling link.
        assert_eq!(registry.count(EntityCategory::Node), 2);
    }

    #[test]
    fn test_dangling_link_resolves_once_node_arrives() {
        let mut registry = EntityRegistry::new();
        registry.upsert(Entity::Link(GraphLink::new("A", "B")));
        assert_eq!(registry.resolve_links().dangling.len(), 1);

        registry.upsert(Entity::Node(node("A", NodeKind::Episodic)));
        registry.upsert(Entity::Node(node("B", NodeKind::Procedural)));
        let resolution = registry.resolve_links();
        assert_eq!(resolution.resolved.len(), 1);
        assert!(resolution.dangling.is_empty());
    }

    #[test]
    fn test_events_ordered_ascending_regardless_of_insert_order() {
        let mut registry = EntityRegistry::new();
        for time in [1100_u32, 800, 1000, 900] {
            registry.upsert(Entity::Event(TimelineEvent {
                time,
                kind: crate::entity::EventKind::Task,
                label: format!("t{time}"),
                status: crate::entity::EventStatus::Pending,
            }));
        }
        let times: Vec<u32> = registry.events_ordered().map(|e| e.time).collect();
        assert_eq!(times, vec![800, 900, 1000, 1100]);
    }

    #[test]
    fn test_query_by_predicate() {
        let mut registry = EntityRegistry::new();
        registry.upsert(Entity::Node(node("E1", NodeKind::Episodic)));
        registry.upsert(Entity::Node(node("S1", NodeKind::Semantic)));
        let episodic = registry.query(|entity| {
            matches!(entity, Entity::Node(n) if n.kind == NodeKind::Episodic)
        });
        assert_eq!(episodic.len(), 1);
    }
}
