//! Panel lifecycle: mount, update, frame, dispose
//!
//! A [`Panel`] is one cockpit visualization instance (memory graph,
//! emotion orb, timeline, plugin registry) owning its own registry,
//! interaction controller, animator, clock, and scene. Panels share
//! nothing mutable: disposing or breaking one panel can never affect a
//! sibling.
//!
//! Each frame runs the fixed sequence **bind → animate → interact →
//! render**. Snapshots queued by producers are drained exactly once at
//! the start of the frame, so the rest of the frame observes one
//! consistent entity set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::animation::{FrameAnimator, HighlightState};
use crate::binding::{self, SnapshotQueue, SnapshotSender, StateSnapshot};
use crate::entity::{Entity, EntityCategory, EntityKey, ORB_ID};
use crate::foundation::math::Vec3;
use crate::foundation::time::FrameClock;
use crate::interaction::{HitVolume, InteractionController, PickTarget};
use crate::registry::EntityRegistry;
use crate::scene::{
    CameraConfig, DrawItem, DrawKind, OrbitCamera, RenderFrame, RenderSurface, SceneRuntime,
};
use crate::warnings::PanelWarning;

/// Pick radius for graph node spheres
const NODE_PICK_RADIUS: f32 = 0.35;
/// Pick radius for the emotion orb
const ORB_PICK_RADIUS: f32 = 1.0;
/// Half extents of a plugin card's hit box
const CARD_HALF_EXTENTS: Vec3 = Vec3::new(0.45, 0.6, 0.08);
/// Radius of the rotating plugin registry ring
const PLUGIN_RING_RADIUS: f32 = 3.0;
/// Horizontal spacing between timeline event markers
const TIMELINE_SPACING: f32 = 1.2;
/// Height of the timeline row
const TIMELINE_ROW_Y: f32 = -2.5;

/// Configuration for one panel instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Name used in logs
    pub name: String,

    /// Camera configuration
    pub camera: CameraConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            name: "panel".to_string(),
            camera: CameraConfig::default(),
        }
    }
}

/// Detail overlay content for the selected entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    /// Selected entity id
    pub id: String,
    /// Overlay title (entity label or name)
    pub title: String,
    /// Entity kind as lowercase text
    pub kind: String,
    /// Additional detail lines
    pub lines: Vec<String>,
}

/// One mounted cockpit panel.
pub struct Panel {
    name: String,
    registry: EntityRegistry,
    controller: InteractionController,
    animator: FrameAnimator,
    clock: FrameClock,
    scene: Option<SceneRuntime>,
    queue: SnapshotQueue,
    warnings: Vec<PanelWarning>,
    disposed: bool,
}

impl Panel {
    /// Mount a panel onto a render surface and bind its initial
    /// snapshot.
    ///
    /// Surface acquisition failure is fatal to this panel only: the
    /// panel comes up in placeholder mode with a
    /// [`PanelWarning::ContextLost`] recorded, and sibling panels are
    /// unaffected.
    pub fn mount(
        surface: Box<dyn RenderSurface>,
        initial_snapshot: StateSnapshot,
        config: PanelConfig,
    ) -> Self {
        let mut warnings = Vec::new();
        let scene = match SceneRuntime::initialize(surface, config.camera) {
            Ok(scene) => Some(scene),
            Err(err) => {
                log::warn!("panel '{}' falling back to placeholder: {}", config.name, err);
                warnings.push(PanelWarning::ContextLost {
                    reason: err.to_string(),
                });
                None
            }
        };

        let mut panel = Self {
            name: config.name,
            registry: EntityRegistry::new(),
            controller: InteractionController::new(),
            animator: FrameAnimator::new(),
            clock: FrameClock::new(),
            scene,
            queue: SnapshotQueue::new(),
            warnings,
            disposed: false,
        };
        panel.bind(&initial_snapshot);
        log::info!("panel '{}' mounted", panel.name);
        panel
    }

    /// Queue a snapshot for the next frame's bind cycle.
    ///
    /// Non-blocking for the producer. Returns `false` once the panel has
    /// been disposed; the snapshot is discarded.
    pub fn update(&self, snapshot: StateSnapshot) -> bool {
        self.queue.sender().push(snapshot)
    }

    /// Producer handle for asynchronous snapshot sources
    pub fn sender(&self) -> SnapshotSender {
        self.queue.sender()
    }

    /// Run one frame tick: bind → animate → interact → render.
    ///
    /// `delta_time` is the host frame delta in seconds. A disposed panel
    /// ignores the call.
    pub fn frame(&mut self, delta_time: f32) {
        if self.disposed {
            return;
        }
        self.clock.advance(delta_time);
        let timing = self.clock.timing();

        // Bind: drain queued snapshots exactly once, before derivation.
        let pending = self.queue.drain();
        let bound = !pending.is_empty();
        for snapshot in &pending {
            self.bind(snapshot);
        }
        if bound {
            // Selection referencing a vanished entity is cleared.
            let selectable = self.selectable_keys();
            self.controller.prune_missing(|key| selectable.contains(key));
            let keys = self.all_keys();
            self.animator.prune(|key| keys.contains(key));
        }

        // Animate: derive visual parameters from the previous frame's
        // interaction state, isolating per-entity faults.
        let entities = self.collect_entities();
        let hovered = self.controller.hovered().cloned();
        let selected = self.controller.selected().cloned();
        let highlight = HighlightState {
            hovered: hovered.as_ref(),
            selected: selected.as_ref(),
        };
        let params = self
            .animator
            .animate(&entities, timing, highlight, &mut self.warnings);

        // Interact: resolve the pointer against this frame's entities.
        if let Some(scene) = &self.scene {
            let targets = self.pick_targets();
            let camera = scene.camera().clone();
            self.controller
                .resolve(|x, y| camera.screen_to_world_ray(x, y), &targets);
        }

        // Render: resolve links lazily and present the frame.
        let resolution = self.registry.resolve_links();
        let mut frame = RenderFrame::default();
        for resolved in &resolution.resolved {
            let key = EntityKey::link(&resolved.link.source, &resolved.link.target);
            let item_params = params.get(&key).copied().unwrap_or_default();
            frame.items.push(DrawItem {
                id: key.id,
                kind: DrawKind::LinkLine {
                    end: resolved.target.position,
                },
                position: resolved.source.position,
                params: item_params,
            });
        }
        for node in self.registry.nodes() {
            frame.items.push(DrawItem {
                id: node.id.clone(),
                kind: DrawKind::NodeSphere(node.kind),
                position: node.position,
                params: params.get(&EntityKey::node(&node.id)).copied().unwrap_or_default(),
            });
        }
        if self.registry.emotion().is_some() {
            frame.items.push(DrawItem {
                id: ORB_ID.to_string(),
                kind: DrawKind::Orb,
                position: Vec3::zeros(),
                params: params.get(&EntityKey::orb()).copied().unwrap_or_default(),
            });
        }
        let event_count = self.registry.count(EntityCategory::Event);
        for (rank, event) in self.registry.events_ordered().enumerate() {
            frame.items.push(DrawItem {
                id: event.time.to_string(),
                kind: DrawKind::EventMarker,
                position: timeline_slot(rank, event_count),
                params: params.get(&EntityKey::event(event.time)).copied().unwrap_or_default(),
            });
        }
        let plugin_count = self.registry.count(EntityCategory::Plugin);
        for (index, plugin) in self.registry.plugins().enumerate() {
            frame.items.push(DrawItem {
                id: plugin.id.clone(),
                kind: DrawKind::PluginCard,
                position: plugin_ring_slot(index, plugin_count),
                params: params.get(&EntityKey::plugin(&plugin.id)).copied().unwrap_or_default(),
            });
        }

        if let Some(scene) = &mut self.scene {
            if let Err(err) = scene.tick(delta_time, &frame) {
                // A surface that stops presenting is treated like a lost
                // context: this panel drops to placeholder, siblings
                // keep running.
                log::warn!("panel '{}' lost its surface: {}", self.name, err);
                self.warnings.push(PanelWarning::ContextLost {
                    reason: err.to_string(),
                });
                if let Some(scene) = self.scene.take() {
                    scene.dispose();
                }
            }
        }
    }

    /// Stop the frame loop and release render resources.
    ///
    /// Idempotent. Snapshots queued after disposal are discarded, never
    /// applied.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.queue.close();
        self.clock.stop();
        if let Some(scene) = self.scene.take() {
            scene.dispose();
        }
        log::info!("panel '{}' disposed", self.name);
    }

    /// Whether the panel is showing its static placeholder
    pub fn is_placeholder(&self) -> bool {
        self.scene.is_none() && !self.disposed
    }

    /// Whether the panel has been disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The panel's entity registry
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// The panel's camera, when the scene is live
    pub fn camera_mut(&mut self) -> Option<&mut OrbitCamera> {
        self.scene.as_mut().map(SceneRuntime::camera_mut)
    }

    /// The panel's camera, read-only
    pub fn camera(&self) -> Option<&OrbitCamera> {
        self.scene.as_ref().map(SceneRuntime::camera)
    }

    /// Id currently hovered, if any (unique within its category)
    pub fn hovered_id(&self) -> Option<&str> {
        self.controller.hovered().map(|key| key.id.as_str())
    }

    /// Id currently selected, if any (unique within its category)
    pub fn selected_id(&self) -> Option<&str> {
        self.controller.selected().map(|key| key.id.as_str())
    }

    /// Qualified key currently selected, if any
    pub fn selected_key(&self) -> Option<&EntityKey> {
        self.controller.selected()
    }

    /// Pointer moved over the panel (NDC coordinates)
    pub fn pointer_moved(&mut self, ndc_x: f32, ndc_y: f32) {
        self.controller.pointer_moved(ndc_x, ndc_y);
    }

    /// Pointer left the panel
    pub fn pointer_exited(&mut self) {
        self.controller.pointer_exited();
    }

    /// Pointer clicked at its current position
    pub fn pointer_clicked(&mut self) {
        self.controller.pointer_clicked();
    }

    /// Close the detail overlay
    pub fn close_overlay(&mut self) {
        self.controller.close();
    }

    /// Detail overlay content for the current selection, if any.
    ///
    /// The lookup is category-directed, so a node that shares an id with
    /// a plugin (or with the orb) can never shadow it.
    pub fn overlay(&self) -> Option<OverlayContent> {
        let key = self.controller.selected()?;
        match key.category {
            EntityCategory::Node => {
                let node = self.registry.node(&key.id)?;
                Some(OverlayContent {
                    id: node.id.clone(),
                    title: node.label.clone(),
                    kind: node.kind.label().to_string(),
                    lines: vec![format!(
                        "position ({:.1}, {:.1}, {:.1})",
                        node.position.x, node.position.y, node.position.z
                    )],
                })
            }
            EntityCategory::Plugin => {
                let plugin = self.registry.plugin(&key.id)?;
                let mut lines = vec![format!("status: {:?}", plugin.status).to_lowercase()];
                if !plugin.permissions.is_empty() {
                    lines.push(format!("permissions: {}", plugin.permissions.join(", ")));
                }
                if let Some(last_used) = &plugin.last_used {
                    lines.push(format!("last used: {last_used}"));
                }
                Some(OverlayContent {
                    id: plugin.id.clone(),
                    title: plugin.name.clone(),
                    kind: "plugin".to_string(),
                    lines,
                })
            }
            EntityCategory::Emotion => {
                let emotion = self.registry.emotion()?;
                Some(OverlayContent {
                    id: ORB_ID.to_string(),
                    title: "Emotional State".to_string(),
                    kind: "orb".to_string(),
                    lines: vec![
                        format!("stress: {:.2}", emotion.stress),
                        format!("focus: {:.2}", emotion.focus),
                        format!("curiosity: {:.2}", emotion.curiosity),
                    ],
                })
            }
            EntityCategory::Link | EntityCategory::Event => None,
        }
    }

    /// Take the warnings recorded since the last drain
    pub fn drain_warnings(&mut self) -> Vec<PanelWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Apply one snapshot and record every condition recovered during
    /// ingestion, including links left dangling by this snapshot.
    fn bind(&mut self, snapshot: &StateSnapshot) {
        binding::apply(snapshot, &mut self.registry);
        self.warnings.extend(self.registry.drain_warnings());

        for link in &self.registry.resolve_links().dangling {
            log::warn!(
                "panel '{}': dangling link {} -> {} skipped",
                self.name,
                link.source,
                link.target
            );
            self.warnings.push(PanelWarning::DanglingLink {
                source: link.source.clone(),
                target: link.target.clone(),
            });
        }
    }

    /// Keys that can hold hover or selection
    fn selectable_keys(&self) -> BTreeSet<EntityKey> {
        let mut keys: BTreeSet<EntityKey> =
            self.registry.nodes().map(|n| EntityKey::node(&n.id)).collect();
        keys.extend(self.registry.plugins().map(|p| EntityKey::plugin(&p.id)));
        if self.registry.emotion().is_some() {
            keys.insert(EntityKey::orb());
        }
        keys
    }

    /// Keys across every category, for animator history pruning
    fn all_keys(&self) -> BTreeSet<EntityKey> {
        let mut keys = BTreeSet::new();
        for category in [
            EntityCategory::Node,
            EntityCategory::Link,
            EntityCategory::Emotion,
            EntityCategory::Event,
            EntityCategory::Plugin,
        ] {
            keys.extend(self.registry.all(category).iter().map(Entity::key));
        }
        keys
    }

    fn collect_entities(&self) -> Vec<Entity> {
        let mut entities = Vec::new();
        for category in [
            EntityCategory::Emotion,
            EntityCategory::Node,
            EntityCategory::Link,
            EntityCategory::Event,
            EntityCategory::Plugin,
        ] {
            entities.extend(self.registry.all(category));
        }
        entities
    }

    /// Hit volumes for this frame: spheres for nodes and the orb, boxes
    /// for plugin cards
    fn pick_targets(&self) -> Vec<PickTarget> {
        let mut targets = Vec::new();
        for node in self.registry.nodes() {
            targets.push(PickTarget {
                key: EntityKey::node(&node.id),
                volume: HitVolume::Sphere {
                    center: node.position,
                    radius: NODE_PICK_RADIUS,
                },
            });
        }
        if self.registry.emotion().is_some() {
            targets.push(PickTarget {
                key: EntityKey::orb(),
                volume: HitVolume::Sphere {
                    center: Vec3::zeros(),
                    radius: ORB_PICK_RADIUS,
                },
            });
        }
        let plugin_count = self.registry.count(EntityCategory::Plugin);
        for (index, plugin) in self.registry.plugins().enumerate() {
            targets.push(PickTarget {
                key: EntityKey::plugin(&plugin.id),
                volume: HitVolume::Box {
                    center: plugin_ring_slot(index, plugin_count),
                    half_extents: CARD_HALF_EXTENTS,
                },
            });
        }
        targets
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("name", &self.name)
            .field("disposed", &self.disposed)
            .field("placeholder", &self.is_placeholder())
            .finish_non_exhaustive()
    }
}

/// Position of a plugin card on the rotating registry ring
fn plugin_ring_slot(index: usize, count: usize) -> Vec3 {
    if count == 0 {
        return Vec3::zeros();
    }
    let angle = std::f32::consts::TAU * index as f32 / count as f32;
    Vec3::new(
        PLUGIN_RING_RADIUS * angle.cos(),
        0.0,
        PLUGIN_RING_RADIUS * angle.sin(),
    )
}

/// Position of a timeline event marker; rank is ascending time order
fn timeline_slot(rank: usize, count: usize) -> Vec3 {
    let centered = rank as f32 - (count.saturating_sub(1)) as f32 / 2.0;
    Vec3::new(centered * TIMELINE_SPACING, TIMELINE_ROW_Y, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{
        EmotionState, EventKind, EventStatus, GraphLink, GraphNode, NodeKind, PluginCard,
        PluginStatus, TimelineEvent,
    };
    use crate::scene::{HeadlessSurface, LightingRig, SceneError};
    use std::sync::{Arc, Mutex};

    const DT: f32 = 1.0 / 60.0;

    /// Surface that shares its presented frames with the test body.
    #[derive(Default)]
    struct RecordingSurface {
        last_frame: Arc<Mutex<Option<RenderFrame>>>,
    }

    impl RenderSurface for RecordingSurface {
        fn acquire(&mut self) -> Result<(), SceneError> {
            Ok(())
        }

        fn present(
            &mut self,
            frame: &RenderFrame,
            _lighting: &LightingRig,
        ) -> Result<(), SceneError> {
            *self.last_frame.lock().unwrap() = Some(frame.clone());
            Ok(())
        }

        fn release(&mut self) {}
    }

    fn node(id: &str, kind: NodeKind, x: f32) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            kind,
            position: Vec3::new(x, 0.0, 0.0),
            label: id.to_string(),
        }
    }

    fn memory_snapshot() -> StateSnapshot {
        StateSnapshot {
            nodes: vec![
                node("E1", NodeKind::Episodic, 0.0),
                node("S1", NodeKind::Semantic, 2.0),
                node("P1", NodeKind::Procedural, -2.0),
            ],
            links: vec![GraphLink::new("E1", "S1")],
            ..StateSnapshot::default()
        }
    }

    fn mounted(snapshot: StateSnapshot) -> Panel {
        Panel::mount(
            Box::new(HeadlessSurface::new()),
            snapshot,
            PanelConfig::default(),
        )
    }

    /// Point the pointer at a scene-space position via the live camera.
    fn aim_at(panel: &mut Panel, position: Vec3) {
        let (x, y) = panel.camera().unwrap().world_to_ndc(position).unwrap();
        panel.pointer_moved(x, y);
    }

    #[test]
    fn test_mount_binds_initial_snapshot() {
        let panel = mounted(memory_snapshot());
        assert_eq!(panel.registry().count(EntityCategory::Node), 3);
        assert_eq!(panel.registry().count(EntityCategory::Link), 1);
        assert!(!panel.is_placeholder());
    }

    #[test]
    fn test_end_to_end_select_and_close() {
        let mut panel = mounted(memory_snapshot());
        panel.frame(DT);

        aim_at(&mut panel, Vec3::zeros()); // E1
        panel.pointer_clicked();
        panel.frame(DT);
        assert_eq!(panel.selected_id(), Some("E1"));

        let overlay = panel.overlay().unwrap();
        assert_eq!(overlay.title, "E1");
        assert_eq!(overlay.kind, "episodic");

        panel.close_overlay();
        assert_eq!(panel.selected_id(), None);
        assert!(panel.overlay().is_none());

        // The pointer is still over E1, so the next frame resumes hover.
        panel.frame(DT);
        assert_eq!(panel.hovered_id(), Some("E1"));
    }

    #[test]
    fn test_click_b_while_a_selected_hands_over_directly() {
        let mut panel = mounted(memory_snapshot());
        panel.frame(DT);

        aim_at(&mut panel, Vec3::zeros()); // E1
        panel.pointer_clicked();
        panel.frame(DT);
        assert_eq!(panel.selected_id(), Some("E1"));

        aim_at(&mut panel, Vec3::new(2.0, 0.0, 0.0)); // S1
        panel.pointer_clicked();
        panel.frame(DT);
        assert_eq!(panel.selected_id(), Some("S1"));
    }

    #[test]
    fn test_dangling_link_recorded_and_nodes_kept() {
        let snapshot = StateSnapshot {
            nodes: vec![
                node("E1", NodeKind::Episodic, 0.0),
                node("S1", NodeKind::Semantic, 2.0),
            ],
            links: vec![GraphLink::new("E1", "S1"), GraphLink::new("S1", "99")],
            ..StateSnapshot::default()
        };
        let mut panel = mounted(snapshot);
        panel.frame(DT);

        assert_eq!(panel.registry().count(EntityCategory::Node), 2);
        let resolution = panel.registry().resolve_links();
        assert_eq!(resolution.resolved.len(), 1);

        let warnings = panel.drain_warnings();
        assert!(warnings.iter().any(|w| matches!(
            w,
            PanelWarning::DanglingLink { target, .. } if target == "99"
        )));
    }

    #[test]
    fn test_selection_cleared_when_entity_disappears() {
        let mut panel = mounted(memory_snapshot());
        panel.frame(DT);

        aim_at(&mut panel, Vec3::zeros()); // E1
        panel.pointer_clicked();
        panel.frame(DT);
        assert_eq!(panel.selected_id(), Some("E1"));

        // E1 is absent from the next snapshot.
        panel.update(StateSnapshot {
            nodes: vec![node("S1", NodeKind::Semantic, 2.0)],
            ..StateSnapshot::default()
        });
        panel.pointer_exited();
        panel.frame(DT);
        assert_eq!(panel.selected_id(), None);
        assert!(panel.registry().node("E1").is_none());
    }

    #[test]
    fn test_timeline_markers_ascend_with_time() {
        let last_frame = Arc::new(Mutex::new(None));
        let surface = RecordingSurface {
            last_frame: Arc::clone(&last_frame),
        };
        // Shuffled input order; layout must follow time order.
        let snapshot = StateSnapshot {
            events: vec![
                TimelineEvent {
                    time: 1000,
                    kind: EventKind::Reflection,
                    label: "review".to_string(),
                    status: EventStatus::Success,
                },
                TimelineEvent {
                    time: 800,
                    kind: EventKind::Task,
                    label: "boot".to_string(),
                    status: EventStatus::Success,
                },
                TimelineEvent {
                    time: 1100,
                    kind: EventKind::Projection,
                    label: "plan".to_string(),
                    status: EventStatus::Pending,
                },
                TimelineEvent {
                    time: 900,
                    kind: EventKind::Task,
                    label: "fetch".to_string(),
                    status: EventStatus::Failure,
                },
            ],
            ..StateSnapshot::default()
        };
        let mut panel = Panel::mount(Box::new(surface), snapshot, PanelConfig::default());
        panel.frame(DT);

        let frame = last_frame.lock().unwrap().clone().unwrap();
        let markers: Vec<(String, f32)> = frame
            .items
            .iter()
            .filter(|item| item.kind == DrawKind::EventMarker)
            .map(|item| (item.id.clone(), item.position.x))
            .collect();
        let ids: Vec<&str> = markers.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["800", "900", "1000", "1100"]);
        for pair in markers.windows(2) {
            assert!(pair[0].1 < pair[1].1);
        }
    }

    #[test]
    fn test_placeholder_mode_on_context_failure() {
        let mut panel = Panel::mount(
            Box::new(HeadlessSurface::failing()),
            memory_snapshot(),
            PanelConfig::default(),
        );
        assert!(panel.is_placeholder());
        let warnings = panel.drain_warnings();
        assert!(warnings
            .iter()
            .any(|w| matches!(w, PanelWarning::ContextLost { .. })));

        // The panel still binds and animates without a surface.
        panel.frame(DT);
        assert_eq!(panel.registry().count(EntityCategory::Node), 3);
        assert!(panel.camera().is_none());
    }

    #[test]
    fn test_updates_after_dispose_are_discarded() {
        let mut panel = mounted(memory_snapshot());
        let sender = panel.sender();
        panel.dispose();

        assert!(!panel.update(StateSnapshot::default()));
        assert!(!sender.push(StateSnapshot::default()));

        // A frame after disposal is a no-op, not a panic.
        panel.frame(DT);
        assert!(panel.is_disposed());
    }

    #[test]
    fn test_double_dispose_is_idempotent() {
        let mut panel = mounted(memory_snapshot());
        panel.dispose();
        panel.dispose();
        assert!(panel.is_disposed());
    }

    #[test]
    fn test_orb_overlay_reports_emotions() {
        let snapshot = StateSnapshot {
            emotion: Some(EmotionState {
                stress: 0.3,
                focus: 0.9,
                curiosity: 0.1,
            }),
            ..StateSnapshot::default()
        };
        let mut panel = mounted(snapshot);
        panel.frame(DT);

        aim_at(&mut panel, Vec3::zeros());
        panel.pointer_clicked();
        panel.frame(DT);

        let overlay = panel.overlay().unwrap();
        assert_eq!(overlay.kind, "orb");
        assert!(overlay.lines.iter().any(|l| l.contains("focus: 0.90")));
    }

    #[test]
    fn test_node_named_orb_does_not_shadow_orb() {
        // Ids are only unique per category: a node called "orb" must stay
        // a separate entity from the emotion orb in picking, selection,
        // and the overlay.
        let snapshot = StateSnapshot {
            nodes: vec![node("orb", NodeKind::Semantic, 2.0)],
            emotion: Some(EmotionState::default()),
            ..StateSnapshot::default()
        };
        let mut panel = mounted(snapshot);
        panel.frame(DT);

        aim_at(&mut panel, Vec3::zeros()); // the orb sits at the origin
        panel.pointer_clicked();
        panel.frame(DT);
        assert_eq!(panel.selected_key(), Some(&EntityKey::orb()));
        assert_eq!(panel.overlay().unwrap().kind, "orb");

        aim_at(&mut panel, Vec3::new(2.0, 0.0, 0.0));
        panel.pointer_clicked();
        panel.frame(DT);
        assert_eq!(panel.selected_key(), Some(&EntityKey::node("orb")));
        assert_eq!(panel.overlay().unwrap().kind, "semantic");
    }

    #[test]
    fn test_plugin_card_pick_and_hover() {
        let snapshot = StateSnapshot {
            plugins: vec![PluginCard {
                id: "search".to_string(),
                name: "Search".to_string(),
                status: PluginStatus::Active,
                permissions: vec!["net".to_string()],
                last_used: None,
            }],
            ..StateSnapshot::default()
        };
        let mut panel = mounted(snapshot);
        panel.frame(DT);

        // A single card sits at angle zero on the ring.
        aim_at(&mut panel, plugin_ring_slot(0, 1));
        panel.frame(DT);
        assert_eq!(panel.hovered_id(), Some("search"));
    }

    #[test]
    fn test_panels_do_not_share_selection() {
        let mut left = mounted(memory_snapshot());
        let mut right = mounted(memory_snapshot());
        left.frame(DT);
        right.frame(DT);

        aim_at(&mut left, Vec3::zeros());
        left.pointer_clicked();
        left.frame(DT);

        assert_eq!(left.selected_id(), Some("E1"));
        assert_eq!(right.selected_id(), None);
    }
}
