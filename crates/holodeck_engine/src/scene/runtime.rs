//! Scene runtime and render surface boundary
//!
//! [`SceneRuntime`] owns the acquired render surface, the orbit camera,
//! and the lighting rig for one panel. Acquisition is scoped: release is
//! guaranteed on every exit path because it runs in `Drop`, whether the
//! panel is disposed explicitly or unwound by a panic elsewhere in the
//! frame.

use thiserror::Error;

use super::camera::{CameraConfig, OrbitCamera};
use crate::animation::VisualParams;
use crate::entity::NodeKind;
use crate::foundation::math::Vec3;

/// Scene-level errors
#[derive(Debug, Error)]
pub enum SceneError {
    /// The render surface could not be acquired. Fatal to the owning
    /// panel only; the panel degrades to a static placeholder and
    /// sibling panels are unaffected.
    #[error("render context unavailable: {0}")]
    ContextUnavailable(String),

    /// Presenting a frame failed after successful acquisition
    #[error("frame presentation failed: {0}")]
    PresentFailed(String),
}

/// What a draw item represents, so a backend can choose geometry
#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
    /// Memory graph node sphere, colored by kind
    NodeSphere(NodeKind),
    /// Line from this item's position to `end`
    LinkLine {
        /// Line endpoint in scene space
        end: Vec3,
    },
    /// The emotion orb
    Orb,
    /// A timeline event marker
    EventMarker,
    /// A plugin registry card
    PluginCard,
}

/// One renderable entity with its derived visual parameters
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Entity id within its category (the kind supplies the category)
    pub id: String,
    /// Geometry discriminator
    pub kind: DrawKind,
    /// Position in scene space
    pub position: Vec3,
    /// Visual parameters derived for this frame
    pub params: VisualParams,
}

/// Everything a surface needs to present one frame
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    /// Draw items in draw order
    pub items: Vec<DrawItem>,
}

/// Fixed key-plus-ambient lighting for a panel scene
#[derive(Debug, Clone)]
pub struct LightingRig {
    /// Ambient intensity in `[0, 1]`
    pub ambient: f32,
    /// Key light direction (normalized)
    pub key_direction: Vec3,
    /// Key light intensity
    pub key_intensity: f32,
}

impl Default for LightingRig {
    fn default() -> Self {
        Self {
            ambient: 0.25,
            key_direction: Vec3::new(-0.5, -1.0, -0.3).normalize(),
            key_intensity: 0.9,
        }
    }
}

/// Boundary to the hosting render target.
///
/// The engine never talks to a GPU or DOM directly; the hosting shell
/// supplies a surface and the runtime drives it. Implementations must
/// make `release` idempotent.
pub trait RenderSurface {
    /// Acquire the underlying render context.
    ///
    /// # Errors
    /// [`SceneError::ContextUnavailable`] when the context cannot be
    /// created; the panel then falls back to a static placeholder.
    fn acquire(&mut self) -> Result<(), SceneError>;

    /// Present one frame.
    ///
    /// # Errors
    /// [`SceneError::PresentFailed`] when the surface rejected the frame.
    fn present(&mut self, frame: &RenderFrame, lighting: &LightingRig) -> Result<(), SceneError>;

    /// Release the underlying render context (idempotent)
    fn release(&mut self);
}

/// In-memory surface used by tests and headless demos.
///
/// Records what was presented so tests can assert on draw output without
/// any real render context.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    fail_acquire: bool,
    acquired: bool,
    released: bool,
    frames_presented: u64,
    last_frame: Option<RenderFrame>,
}

impl HeadlessSurface {
    /// Create a surface that acquires successfully
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface whose acquisition always fails, for exercising
    /// the placeholder fallback path
    pub fn failing() -> Self {
        Self {
            fail_acquire: true,
            ..Self::default()
        }
    }

    /// Number of frames presented so far
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// The most recently presented frame
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    /// Whether `release` has run
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl RenderSurface for HeadlessSurface {
    fn acquire(&mut self) -> Result<(), SceneError> {
        if self.fail_acquire {
            return Err(SceneError::ContextUnavailable(
                "headless surface configured to fail".to_string(),
            ));
        }
        self.acquired = true;
        Ok(())
    }

    fn present(&mut self, frame: &RenderFrame, _lighting: &LightingRig) -> Result<(), SceneError> {
        if !self.acquired {
            return Err(SceneError::PresentFailed("surface not acquired".to_string()));
        }
        self.frames_presented += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn release(&mut self) {
        self.acquired = false;
        self.released = true;
    }
}

/// Owns the render surface, camera, and lighting for one panel.
pub struct SceneRuntime {
    surface: Box<dyn RenderSurface>,
    camera: OrbitCamera,
    lighting: LightingRig,
    frames_rendered: u64,
    released: bool,
}

impl SceneRuntime {
    /// Acquire the surface and build the scene.
    ///
    /// # Errors
    /// Propagates [`SceneError::ContextUnavailable`] from the surface;
    /// the surface is handed back released.
    pub fn initialize(
        mut surface: Box<dyn RenderSurface>,
        camera_config: CameraConfig,
    ) -> Result<Self, SceneError> {
        surface.acquire()?;
        log::info!("scene runtime initialized");
        Ok(Self {
            surface,
            camera: OrbitCamera::new(camera_config),
            lighting: LightingRig::default(),
            frames_rendered: 0,
            released: false,
        })
    }

    /// The panel's camera
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Mutable access to the camera for orbit/pan/zoom input
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// The panel's lighting rig
    pub fn lighting(&self) -> &LightingRig {
        &self.lighting
    }

    /// Number of frames rendered so far
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Advance camera inertia and present one frame.
    ///
    /// # Errors
    /// [`SceneError::PresentFailed`] from the surface; the caller decides
    /// whether to keep the panel live.
    pub fn tick(&mut self, delta_time: f32, frame: &RenderFrame) -> Result<(), SceneError> {
        self.camera.update(delta_time);
        self.surface.present(frame, &self.lighting)?;
        self.frames_rendered += 1;
        Ok(())
    }

    /// Release render resources and consume the runtime
    pub fn dispose(mut self) {
        self.release_surface();
    }

    fn release_surface(&mut self) {
        if !self.released {
            self.surface.release();
            self.released = true;
            log::info!("scene runtime released after {} frames", self.frames_rendered);
        }
    }
}

impl Drop for SceneRuntime {
    fn drop(&mut self) {
        self.release_surface();
    }
}

impl std::fmt::Debug for SceneRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRuntime")
            .field("frames_rendered", &self.frames_rendered)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}
