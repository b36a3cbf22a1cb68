//! Hover/select state machine
//!
//! Pointer interaction is modeled as an explicit state machine so it is
//! testable without any rendering surface: raw pointer data becomes
//! [`PointerEvent`]s, events drive [`SelectionPhase`] transitions, and
//! the presentation layer only ever reads the resulting
//! hovered/selected key pair.

use super::picking::{pick, PickTarget, PointerState, Ray};
use crate::entity::EntityKey;

/// Interaction state of one panel.
///
/// Exactly one phase is active; `Selected` holds until an explicit close
/// action or until the selected entity disappears from the registry.
/// Phases carry category-qualified keys, since ids are only unique
/// within their category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPhase {
    /// No entity hovered or selected
    Idle,
    /// Pointer resting on an entity
    Hovering(EntityKey),
    /// Entity selected; detail overlay is showing
    Selected(EntityKey),
}

/// Pointer-derived events consumed by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    /// Pointer entered an entity's hit volume
    Enter(EntityKey),
    /// Pointer left an entity's hit volume
    Leave(EntityKey),
    /// Entity was clicked
    Click(EntityKey),
    /// The detail overlay's close action was triggered
    Close,
}

/// Pointer-driven interaction controller for a single panel.
///
/// Owns the panel's pointer state and selection phase. Per panel
/// instance, never shared: clicking a node in one panel must not affect
/// any other panel.
#[derive(Debug, Default)]
pub struct InteractionController {
    phase: SelectionPhase,
    pointer: PointerState,
}

impl Default for SelectionPhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl InteractionController {
    /// Create a controller in the idle phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> &SelectionPhase {
        &self.phase
    }

    /// Key currently hovered, if any
    pub fn hovered(&self) -> Option<&EntityKey> {
        match &self.phase {
            SelectionPhase::Hovering(key) => Some(key),
            _ => None,
        }
    }

    /// Key currently selected, if any
    pub fn selected(&self) -> Option<&EntityKey> {
        match &self.phase {
            SelectionPhase::Selected(key) => Some(key),
            _ => None,
        }
    }

    /// Feed a pointer move from the hosting shell (NDC coordinates)
    pub fn pointer_moved(&mut self, ndc_x: f32, ndc_y: f32) {
        self.pointer.moved_to(ndc_x, ndc_y);
    }

    /// Feed a pointer-left-panel notification from the hosting shell
    pub fn pointer_exited(&mut self) {
        self.pointer.exited();
        if let SelectionPhase::Hovering(key) = self.phase.clone() {
            self.apply(PointerEvent::Leave(key));
        }
    }

    /// Feed a click at the current pointer position
    pub fn pointer_clicked(&mut self) {
        self.pointer.click();
    }

    /// Feed the overlay close action
    pub fn close(&mut self) {
        self.apply(PointerEvent::Close);
    }

    /// Apply one event to the state machine.
    ///
    /// Transition table:
    /// - `Enter(key)`: `Idle -> Hovering(key)`; `Hovering(_) -> Hovering(key)`
    /// - `Leave(key)`: `Hovering(key) -> Idle`; no-op on mismatch
    /// - `Click(key)`: any state `-> Selected(key)`, never routing through
    ///   `Idle`
    /// - `Close`: `Selected(_) -> Idle`
    pub fn apply(&mut self, event: PointerEvent) {
        self.phase = match (self.phase.clone(), event) {
            (SelectionPhase::Idle | SelectionPhase::Hovering(_), PointerEvent::Enter(key)) => {
                SelectionPhase::Hovering(key)
            }
            (SelectionPhase::Hovering(current), PointerEvent::Leave(key)) if current == key => {
                SelectionPhase::Idle
            }
            (_, PointerEvent::Click(key)) => {
                log::trace!("selection -> '{}'", key);
                SelectionPhase::Selected(key)
            }
            (SelectionPhase::Selected(_), PointerEvent::Close) => SelectionPhase::Idle,
            (phase, _) => phase, // Everything else is a no-op
        };
    }

    /// Resolve the pointer against this frame's pick targets.
    ///
    /// Projects the pointer into scene space with `make_ray`, runs the
    /// pick test, and feeds the resulting events into the state machine.
    /// A pick miss is not an error: it withholds the `Enter`/`Click`
    /// event (and ends any current hover).
    pub fn resolve(&mut self, make_ray: impl Fn(f32, f32) -> Ray, targets: &[PickTarget]) {
        if !self.pointer.inside {
            self.pointer.clear_frame_flags();
            return;
        }

        let ray = make_ray(self.pointer.ndc_x, self.pointer.ndc_y);
        let hit = pick(&ray, targets);

        if self.pointer.clicked {
            if let Some(hit) = &hit {
                self.apply(PointerEvent::Click(hit.key.clone()));
            }
            // A clicked miss deliberately leaves the phase untouched.
        } else {
            match (&hit, self.phase.clone()) {
                (Some(hit), _) => self.apply(PointerEvent::Enter(hit.key.clone())),
                (None, SelectionPhase::Hovering(current)) => {
                    self.apply(PointerEvent::Leave(current));
                }
                (None, _) => {}
            }
        }

        self.pointer.clear_frame_flags();
    }

    /// Clear hover/selection whose referenced entity no longer exists
    pub fn prune_missing(&mut self, exists: impl Fn(&EntityKey) -> bool) {
        let stale = match &self.phase {
            SelectionPhase::Hovering(key) | SelectionPhase::Selected(key) => !exists(key),
            SelectionPhase::Idle => false,
        };
        if stale {
            log::trace!("selection target vanished, returning to idle");
            self.phase = SelectionPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::interaction::picking::HitVolume;

    fn key(id: &str) -> EntityKey {
        EntityKey::node(id)
    }

    fn enter(id: &str) -> PointerEvent {
        PointerEvent::Enter(key(id))
    }

    fn leave(id: &str) -> PointerEvent {
        PointerEvent::Leave(key(id))
    }

    fn click(id: &str) -> PointerEvent {
        PointerEvent::Click(key(id))
    }

    #[test]
    fn test_hover_transitions() {
        let mut controller = InteractionController::new();
        controller.apply(enter("E1"));
        assert_eq!(controller.hovered(), Some(&key("E1")));

        // Hover hand-over without passing through idle.
        controller.apply(enter("S1"));
        assert_eq!(controller.hovered(), Some(&key("S1")));

        controller.apply(leave("S1"));
        assert_eq!(controller.phase(), &SelectionPhase::Idle);
    }

    #[test]
    fn test_mismatched_leave_is_noop() {
        let mut controller = InteractionController::new();
        controller.apply(enter("E1"));
        controller.apply(leave("S1"));
        assert_eq!(controller.hovered(), Some(&key("E1")));
    }

    #[test]
    fn test_leave_for_same_id_in_other_category_is_noop() {
        // Leave events are keyed; a plugin named "E1" leaving must not
        // end the hover on node "E1".
        let mut controller = InteractionController::new();
        controller.apply(enter("E1"));
        controller.apply(PointerEvent::Leave(EntityKey::plugin("E1")));
        assert_eq!(controller.hovered(), Some(&key("E1")));
    }

    #[test]
    fn test_click_transitions_directly_from_any_state() {
        let mut controller = InteractionController::new();
        controller.apply(click("E1"));
        assert_eq!(controller.selected(), Some(&key("E1")));

        // Click(B) while Selected(A) goes straight to Selected(B).
        controller.apply(click("S1"));
        assert_eq!(controller.selected(), Some(&key("S1")));
        assert_eq!(controller.hovered(), None);
    }

    #[test]
    fn test_at_most_one_selection() {
        let mut controller = InteractionController::new();
        for id in ["E1", "S1", "P1", "E1"] {
            controller.apply(click(id));
            assert_eq!(controller.selected(), Some(&key(id)));
            assert!(controller.hovered().is_none());
        }
    }

    #[test]
    fn test_close_returns_to_idle() {
        let mut controller = InteractionController::new();
        controller.apply(click("E1"));
        controller.apply(PointerEvent::Close);
        assert_eq!(controller.phase(), &SelectionPhase::Idle);

        // Close in idle stays idle.
        controller.apply(PointerEvent::Close);
        assert_eq!(controller.phase(), &SelectionPhase::Idle);
    }

    #[test]
    fn test_hover_events_ignored_while_selected() {
        let mut controller = InteractionController::new();
        controller.apply(click("E1"));
        controller.apply(enter("S1"));
        assert_eq!(controller.selected(), Some(&key("E1")));
        assert_eq!(controller.hovered(), None);
    }

    #[test]
    fn test_prune_missing_clears_stale_selection() {
        let mut controller = InteractionController::new();
        controller.apply(click("E1"));
        controller.prune_missing(|k| k.id == "S1");
        assert_eq!(controller.phase(), &SelectionPhase::Idle);
    }

    fn straight_ray(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 10.0), Vec3::new(0.0, 0.0, -1.0))
    }

    fn target(id: &str, x: f32) -> PickTarget {
        PickTarget {
            key: key(id),
            volume: HitVolume::Sphere {
                center: Vec3::new(x, 0.0, 0.0),
                radius: 0.4,
            },
        }
    }

    #[test]
    fn test_resolve_hover_then_click() {
        let mut controller = InteractionController::new();
        let targets = vec![target("E1", 0.0), target("S1", 2.0)];

        controller.pointer_moved(0.0, 0.0);
        controller.resolve(straight_ray, &targets);
        assert_eq!(controller.hovered(), Some(&key("E1")));

        controller.pointer_clicked();
        controller.resolve(straight_ray, &targets);
        assert_eq!(controller.selected(), Some(&key("E1")));
    }

    #[test]
    fn test_resolve_miss_ends_hover_but_not_selection() {
        let mut controller = InteractionController::new();
        let targets = vec![target("E1", 0.0)];

        controller.pointer_moved(0.0, 0.0);
        controller.resolve(straight_ray, &targets);
        assert_eq!(controller.hovered(), Some(&key("E1")));

        // Move into empty space: hover ends.
        controller.pointer_moved(5.0, 5.0);
        controller.resolve(straight_ray, &targets);
        assert_eq!(controller.phase(), &SelectionPhase::Idle);

        // Select, then click into empty space: selection survives.
        controller.pointer_moved(0.0, 0.0);
        controller.pointer_clicked();
        controller.resolve(straight_ray, &targets);
        assert_eq!(controller.selected(), Some(&key("E1")));

        controller.pointer_moved(5.0, 5.0);
        controller.pointer_clicked();
        controller.resolve(straight_ray, &targets);
        assert_eq!(controller.selected(), Some(&key("E1")));
    }
}
