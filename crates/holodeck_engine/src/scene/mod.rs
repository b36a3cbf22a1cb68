//! Scene runtime: render surface, camera, lighting, and the frame tick

mod camera;
mod runtime;

pub use camera::{CameraConfig, OrbitCamera};
pub use runtime::{
    DrawItem, DrawKind, HeadlessSurface, LightingRig, RenderFrame, RenderSurface, SceneError,
    SceneRuntime,
};
