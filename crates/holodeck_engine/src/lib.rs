//! # Holodeck Engine
//!
//! Rendering and interaction substrate for the agent cockpit dashboard.
//! Each dashboard panel (memory graph, emotion orb, task timeline,
//! plugin registry) is an independent [`panel::Panel`] that owns its own
//! scene, entity registry, and selection state.
//!
//! ## Features
//!
//! - **Snapshot Binding**: immutable agent-state snapshots are queued by
//!   external producers and drained exactly once per frame
//! - **Typed Entity Registry**: per-category id-keyed storage with lazy
//!   link resolution
//! - **Deterministic Animation**: pure derivation of visual parameters
//!   from entity state and frame timing
//! - **Pointer Interaction**: explicit hover/select state machine with
//!   ray picking against per-kind hit volumes
//! - **Panel Isolation**: no shared mutable state between panels; a
//!   failed panel degrades to a placeholder without touching siblings
//!
//! ## Quick Start
//!
//! ```rust
//! use holodeck_engine::prelude::*;
//!
//! let snapshot = StateSnapshot::default();
//! let surface = Box::new(HeadlessSurface::new());
//! let mut panel = Panel::mount(surface, snapshot, PanelConfig::default());
//!
//! // In the host's frame callback:
//! panel.frame(1.0 / 60.0);
//!
//! panel.dispose();
//! ```

pub mod animation;
pub mod binding;
pub mod entity;
pub mod foundation;
pub mod interaction;
pub mod panel;
pub mod registry;
pub mod scene;

mod warnings;

pub use warnings::PanelWarning;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{AnimationDriver, VisualParams},
        binding::{SnapshotSender, StateSnapshot},
        entity::{
            EmotionState, EntityKey, EventKind, EventStatus, GraphLink, GraphNode, NodeKind,
            PluginCard, PluginStatus, TimelineEvent,
        },
        foundation::{
            math::Vec3,
            time::{FrameClock, FrameTiming},
        },
        interaction::{InteractionController, SelectionPhase},
        panel::{OverlayContent, Panel, PanelConfig},
        registry::EntityRegistry,
        scene::{CameraConfig, HeadlessSurface, RenderSurface, SceneError, SceneRuntime},
        PanelWarning,
    };
}
