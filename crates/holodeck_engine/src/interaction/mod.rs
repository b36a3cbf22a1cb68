//! Pointer interaction: picking and the hover/select state machine

mod controller;
mod picking;

pub use controller::{InteractionController, PointerEvent, SelectionPhase};
pub use picking::{pick, HitVolume, PickHit, PickTarget, PointerState, Ray};
